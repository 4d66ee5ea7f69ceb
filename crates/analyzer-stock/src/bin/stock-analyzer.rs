//! AI Powered Stock Analyzer CLI
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//!
//! # One-shot analysis
//! cargo run --bin stock-analyzer -p analyzer-stock -- analyze AAPL
//!
//! # Interactive dashboard
//! cargo run --bin stock-analyzer -p analyzer-stock
//! ```

use analyzer_stock::dashboard::{Stage, status_block};
use analyzer_stock::{AnalysisOptions, AnalysisView, AnalyzerConfig, Command, Dashboard, Tab};
use analyzer_utils::{LogFormat, init_tracing_with};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "stock-analyzer")]
#[command(version, about = "AI powered stock analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    groq_api_key: Option<String>,

    /// Chat-completion endpoint base URL
    #[arg(long, env = "GROQ_API_BASE", global = true)]
    api_base: Option<String>,

    /// Report model
    #[arg(long, env = "STOCK_ANALYZER_MODEL", global = true)]
    model: Option<String>,

    /// Sampling temperature for the report
    #[arg(long, env = "STOCK_ANALYZER_TEMPERATURE", global = true)]
    temperature: Option<f32>,

    /// Cap on report tokens
    #[arg(long, global = true)]
    max_tokens: Option<usize>,

    /// Price history range (1mo, 6mo, 1y, 5y, ytd, max, ...)
    #[arg(long, global = true)]
    range: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one ticker and print the dashboard
    Analyze {
        /// Ticker symbol, e.g. AAPL, MSFT, RELIANCE.NS, BHP.AX
        ticker: String,

        /// Only show these tabs (overview, price, financials, web)
        #[arg(long = "tab")]
        tabs: Vec<Tab>,

        /// Skip the AI report
        #[arg(long)]
        no_report: bool,

        /// Append the full raw stock info
        #[arg(long)]
        raw: bool,

        /// Print the analysis as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the configuration status
    Status,
    /// Interactive dashboard (default)
    Interactive {
        /// Skip the AI report
        #[arg(long)]
        no_report: bool,
    },
}

impl Cli {
    fn config(&self) -> anyhow::Result<AnalyzerConfig> {
        let mut builder = AnalyzerConfig::builder();
        if let Some(key) = &self.groq_api_key {
            builder = builder.groq_api_key(key.clone());
        }
        if let Some(base) = &self.api_base {
            builder = builder.groq_api_base(base.clone());
        }
        if let Some(model) = &self.model {
            builder = builder.model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(range) = &self.range {
            builder = builder.history_range(range.clone());
        }
        Ok(builder.with_env().build()?)
    }
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                 📈 AI Powered Stock Analyzer                 ║
║                                                              ║
║  Enter a ticker (AAPL, MSFT, RELIANCE.NS, BHP.AX) to begin.  ║
║  /tab <name>  /raw  /status  /help  /exit                    ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

async fn run_analysis(
    dashboard: &Dashboard,
    ticker: &str,
    options: &AnalysisOptions,
) -> Option<AnalysisView> {
    let announce = |stage: &Stage| eprintln!("{stage}");
    match dashboard.analyze_with_progress(ticker, options, announce).await {
        Ok(view) => Some(view),
        Err(e) => {
            eprintln!("❌ Error: {}", e.user_message());
            None
        }
    }
}

async fn interactive(dashboard: &Dashboard, options: &AnalysisOptions) -> anyhow::Result<()> {
    print_banner();
    println!("{}", status_block(dashboard.config()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last_view: Option<AnalysisView> = None;

    loop {
        print!("ticker> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("❌ Error: {e}\n");
                continue;
            }
        };

        match command {
            Command::Analyze { symbol } => {
                if let Some(view) = run_analysis(dashboard, &symbol, options).await {
                    println!("{}", view.render(&[], false));
                    last_view = Some(view);
                }
            }
            Command::ShowTab { tab } => match &last_view {
                Some(view) => println!("{}", view.render_tab(tab)),
                None => println!("Enter a stock ticker first to analyze it.\n"),
            },
            Command::Raw => match &last_view {
                Some(view) => println!("{}", view.render_raw()),
                None => println!("Enter a stock ticker first to analyze it.\n"),
            },
            Command::Status => println!("{}", status_block(dashboard.config())),
            Command::Help => println!("{}", Command::help_text()),
            Command::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing_with(format, None);

    let config = cli.config()?;

    match cli.command.unwrap_or(Commands::Interactive { no_report: false }) {
        Commands::Status => {
            println!("{}", status_block(&config));
        }
        Commands::Analyze {
            ticker,
            tabs,
            no_report,
            raw,
            json,
        } => {
            let dashboard = Dashboard::from_config(config)?;
            let options = AnalysisOptions {
                generate_report: !no_report,
            };
            let Some(view) = run_analysis(&dashboard, &ticker, &options).await else {
                return Ok(ExitCode::FAILURE);
            };
            if json {
                println!("{}", view.to_json()?);
            } else {
                println!("{}", view.render(&tabs, raw));
            }
        }
        Commands::Interactive { no_report } => {
            let dashboard = Dashboard::from_config(config)?;
            let options = AnalysisOptions {
                generate_report: !no_report,
            };
            interactive(&dashboard, &options).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
