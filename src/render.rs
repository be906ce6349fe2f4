use crate::schema::{AnalyzedTable, ChatMessage, LiquidityRatio};

pub const COLUMN_HEADERS: [&str; 6] = [
    "Line item",
    "Prior year",
    "Current year",
    "Growth (%)",
    "Prior-year share (%)",
    "Current-year share (%)",
];

/// Formats a value with thousands separators and no decimals (`1,234,568`).
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if grouped == "0" {
        return grouped;
    }
    format!("{}{}", sign, grouped)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}x", value)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Markdown pipe table of the analyzed statement, as sent to the model.
pub fn to_markdown(table: &AnalyzedTable) -> String {
    let mut output = String::new();

    output.push_str(&format!("| {} |\n", COLUMN_HEADERS.join(" | ")));
    output.push_str(&format!(
        "|{}\n",
        COLUMN_HEADERS
            .iter()
            .enumerate()
            .map(|(i, _)| if i == 0 { ":---|" } else { "---:|" })
            .collect::<String>()
    ));

    for row in &table.rows {
        output.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} |\n",
            escape_cell(&row.label),
            row.prior_value,
            row.current_value,
            row.growth_pct,
            row.prior_share,
            row.current_share
        ));
    }

    output
}

/// Fixed-width table for terminal display.
pub fn to_text_table(table: &AnalyzedTable) -> String {
    let cells: Vec<[String; 6]> = table
        .rows
        .iter()
        .map(|row| {
            [
                row.label.clone(),
                format_amount(row.prior_value),
                format_amount(row.current_value),
                format_percent(row.growth_pct),
                format_percent(row.prior_share),
                format_percent(row.current_share),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = COLUMN_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let pad = |text: &str, width: usize, left: bool| {
        let fill = " ".repeat(width.saturating_sub(text.chars().count()));
        if left {
            format!("{}{}", text, fill)
        } else {
            format!("{}{}", fill, text)
        }
    };

    let mut output = String::new();
    let header: Vec<String> = COLUMN_HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i], i == 0))
        .collect();
    output.push_str(&header.join("  "));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    output.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], i == 0))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    }

    output
}

pub fn liquidity_summary(ratio: &LiquidityRatio) -> String {
    format!(
        "Current ratio (prior year):   {}\nCurrent ratio (current year): {} ({:+.2})\n",
        format_ratio(ratio.prior),
        format_ratio(ratio.current),
        ratio.delta()
    )
}

pub fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
