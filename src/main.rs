//! # Gullak CLI
//!
//! Entry point for the piggy-bank savings client. The `demo` subcommand
//! runs the full scripted session against a simulated wallet; the
//! conversion subcommands expose the fixed-point unit converter.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gullak::demo;
use gullak::flow::{ApprovalPrompt, AutoApprove};
use gullak::units;
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "gullak")]
#[command(about = "Piggy-bank savings client with an in-page wallet bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted end-to-end session against a simulated wallet
    Demo {
        /// Ask before destructive actions instead of auto-approving
        #[arg(long)]
        interactive: bool,
    },
    /// Convert a display amount to raw ledger units
    ToRaw {
        /// Amount in the decimal display unit
        amount: f64,
    },
    /// Convert a raw ledger amount to the display unit
    ToDisplay {
        /// Amount in raw ledger units
        raw: u64,
    },
}

/// Confirmation prompt reading y/n from stdin
pub struct StdinPrompt;

impl ApprovalPrompt for StdinPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { interactive } => {
            let prompt: Box<dyn ApprovalPrompt> = if interactive {
                Box::new(StdinPrompt)
            } else {
                Box::new(AutoApprove)
            };
            demo::run_demo(prompt).await?;
        }
        Commands::ToRaw { amount } => {
            println!("{}", units::to_raw(amount));
        }
        Commands::ToDisplay { raw } => {
            println!("{}", units::to_display(raw));
        }
    }

    Ok(())
}
