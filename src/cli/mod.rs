pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "noteful")]
#[command(about = "Noteful API - multi-tenant notes, folders and tags over REST")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default when no command is given)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create database tables and indexes if missing")]
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config().clone();

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        None => commands::serve::handle(Default::default(), config).await,
        Some(Commands::Migrate) => commands::migrate::handle(config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::parse_from(["noteful", "serve", "--port", "9090", "--memory"]);
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(9090));
                assert!(args.memory);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn bare_invocation_serves() {
        let cli = Cli::parse_from(["noteful"]);
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn migrate_accepts_json_output() {
        let cli = Cli::parse_from(["noteful", "migrate", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Migrate)));
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
    }
}
