use std::process::Command;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for mazescape")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run fmt, clippy, tests and doc in order
    Check,
    /// Check formatting
    Fmt,
    /// Lint all targets with warnings denied
    Clippy,
    /// Run all unit tests
    Test,
    /// Run the regeneration benchmark
    Bench,
    /// Build rustdoc for the workspace
    Doc,
}

impl Commands {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Commands::Check => &[],
            Commands::Fmt => &["fmt", "--all", "--", "--check"],
            Commands::Clippy => &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            Commands::Test => &["test", "--workspace"],
            Commands::Bench => &["bench", "-p", "mazescape-sync", "--bench", "bench_regenerate"],
            Commands::Doc => &["doc", "--workspace", "--no-deps"],
        }
    }
}

fn cargo(task: Commands) -> Result<()> {
    let args = task.cargo_args();
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {} failed ({status})", args[0]);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for task in [Commands::Fmt, Commands::Clippy, Commands::Test, Commands::Doc] {
                cargo(task)?;
            }
        }
        task => cargo(task)?,
    }

    Ok(())
}
