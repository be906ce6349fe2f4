// Prompt templates for the narrative summary and the Q&A chat.

pub const SUMMARY_INSTRUCTIONS: &str = r#"
You are a professional financial analyst. Based on the financial indicators below, write an objective, concise assessment (about 3-4 paragraphs) of the company's financial position.

Focus on:
- growth rates of the main line items,
- changes in the asset structure (each item's share of total assets),
- the current ratio (short-term assets / short-term liabilities).

Answer in the language used by the line item labels.
"#;

pub const CHAT_INSTRUCTIONS: &str = r#"
You are an AI assistant specialised in financial statement analysis. Using the financial statement data provided below, answer the user's question accurately and concisely. If the data does not contain the answer, say so instead of guessing.
"#;

pub fn summary_prompt(table_markdown: &str) -> String {
    format!(
        "{}\nRaw data and indicators:\n{}",
        SUMMARY_INSTRUCTIONS.trim_start(),
        table_markdown
    )
}

/// The whole table is embedded on every turn; earlier turns are not resent.
pub fn chat_prompt(table_markdown: &str, question: &str) -> String {
    format!(
        "{}\n**Financial statement data:**\n{}\n---\n**User question:**\n{}\n",
        CHAT_INSTRUCTIONS.trim_start(),
        table_markdown,
        question
    )
}
