use clap::{Parser, Subcommand};
use financial_ratio_analyst::llm::{ChatAssistant, Conversation, GeminiClient, Narrator};
use financial_ratio_analyst::render::{liquidity_summary, to_text_table, transcript};
use financial_ratio_analyst::{Analysis, AnalysisError, Analyzer, Result, Settings};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ratio-analyst")]
#[command(about = "Growth, asset-structure and current-ratio analysis of a two-year financial statement")]
#[command(long_about = "Reads a three-column statement (line item | prior year | current year),
computes growth and share of total assets for every row plus the current ratio,
and can ask Gemini for a written assessment or answer questions about it.

The first row of the sheet is treated as a header. The statement must contain a
'TỔNG CỘNG TÀI SẢN' (total assets) row.

EXAMPLES:
  ratio-analyst analyze statement.xlsx
  ratio-analyst analyze statement.csv --json
  ratio-analyst summarize statement.xlsx
  ratio-analyst chat statement.xlsx --secrets secrets.toml")]
#[command(version)]
struct Cli {
    /// TOML settings file (model, base_url, [secrets])
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model identifier
    #[arg(long, global = true, env = "RATIO_ANALYST_MODEL")]
    model: Option<String>,

    /// Name of the API key variable / secrets entry [default: GEMINI_API_KEY]
    #[arg(long, global = true)]
    api_key_env: Option<String>,

    /// TOML secrets file consulted when the key is not in the environment
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ratio table and the current ratio
    Analyze {
        /// Statement file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the model for a short written assessment
    Summarize {
        /// Statement file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
    },

    /// Interactive questions about the statement
    Chat {
        /// Statement file (.xlsx, .xls, .ods or .csv)
        file: PathBuf,
    },
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(model) = &self.model {
            settings.model = model.clone();
        }

        if let Some(key_name) = &self.api_key_env {
            settings.secrets.key_name = key_name.clone();
        }

        if let Some(path) = &self.secrets {
            settings.secrets.secrets_file = Some(path.clone());
        }

        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financial_ratio_analyst=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;

    match &cli.command {
        Commands::Analyze { file, json } => {
            let analysis = load(file)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }

        Commands::Summarize { file } => {
            let analysis = load(file)?;
            let narrator = Narrator::new(GeminiClient::new(&settings));

            println!("Sending the statement to {} ...\n", settings.model);
            println!("{}", narrator.summarize(&analysis.table).await);
        }

        Commands::Chat { file } => {
            let analysis = load(file)?;
            chat(&settings, &analysis).await?;
        }
    }

    Ok(())
}

/// Reads and analyzes a statement, turning loading failures into the two
/// messages the user sees: a data-structure problem or a generic read failure.
fn load(path: &Path) -> Result<Analysis> {
    Analyzer::new().analyze_file(path).map_err(|e| match e {
        shape @ AnalysisError::DataShape(_) => shape,
        other => AnalysisError::Spreadsheet(format!(
            "Could not read or process '{}': {}. Check the file format and contents.",
            path.display(),
            other
        )),
    })
}

fn print_analysis(analysis: &Analysis) {
    println!("Growth and asset structure\n");
    println!("{}", to_text_table(&analysis.table));

    println!("Basic ratios\n");
    match &analysis.liquidity {
        Some(ratio) => println!("{}", liquidity_summary(ratio)),
        None => println!("Current ratio: N/A\n"),
    }

    for warning in &analysis.warnings {
        eprintln!("⚠️  {}", warning);
    }
}

async fn chat(settings: &Settings, analysis: &Analysis) -> Result<()> {
    let assistant = ChatAssistant::new(GeminiClient::new(settings));
    let mut conversation = Conversation::new();

    println!("{}", transcript(conversation.messages()));
    println!("Type 'quit' to exit.");
    println!("------------------------------------------------------------------");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let question = line.trim();

        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        if question.is_empty() {
            continue;
        }

        match assistant.ask(&mut conversation, &analysis.table, question).await {
            Ok(reply) => {
                println!("\n[{}] {}\n", reply.role, reply.content);
                println!("------------------------------------------------------------------");
            }
            Err(e) => eprintln!("❌ {}", e),
        }
    }

    Ok(())
}
