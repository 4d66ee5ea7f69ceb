//! Command parsing for the interactive dashboard

use crate::dashboard::Tab;
use crate::error::{Result, StockError};

/// Parsed line of REPL input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run an analysis; a bare ticker means the same
    Analyze { symbol: String },
    /// Show one tab of the last analysis again
    ShowTab { tab: Tab },
    /// Show the raw profile of the last analysis
    Raw,
    /// Show the configuration block
    Status,
    Help,
    Exit,
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(StockError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Analyze {
                symbol: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(StockError::CommandError("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "analyze" | "a" => {
                let symbol = args.first().ok_or_else(|| {
                    StockError::CommandError("Missing symbol for analyze command".to_string())
                })?;
                Ok(Command::Analyze {
                    symbol: (*symbol).to_string(),
                })
            }
            "tab" | "t" => {
                let name = args.first().ok_or_else(|| {
                    StockError::CommandError("Missing tab name for tab command".to_string())
                })?;
                Ok(Command::ShowTab { tab: name.parse()? })
            }
            "raw" | "r" => Ok(Command::Raw),
            "status" | "s" => Ok(Command::Status),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(StockError::CommandError(format!(
                "Unknown command: /{other}. Type /help for available commands"
            ))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Analyzer Commands
=======================

  <TICKER>              Analyze a ticker (e.g. AAPL, MSFT, RELIANCE.NS, BHP.AX)
  /analyze <TICKER>     Same as typing the ticker
  /tab <name>           Show a tab of the last analysis again
                        (overview, price, financials, web)
  /raw                  Show the full raw stock info of the last analysis
  /status               Show the configuration status
  /help                 Show this help
  /exit                 Exit

Aliases: /a = /analyze   /t = /tab   /r = /raw   /q = /exit
"
    }
}
