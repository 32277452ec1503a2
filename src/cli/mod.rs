pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(about = "Marketplace CLI - operator tooling for the Marketplace API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a session token for a user id")]
    Token(commands::token::TokenArgs),

    #[command(about = "Apply pending database migrations")]
    Migrate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command_with_ttl() {
        let cli = Cli::try_parse_from(["marketplace", "--json", "token", "user-1", "--ttl-minutes", "5"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.user_id, "user-1");
                assert_eq!(args.ttl_minutes, Some(5));
            }
            Commands::Migrate => panic!("expected token command"),
        }
    }

    #[test]
    fn token_command_requires_user_id() {
        assert!(Cli::try_parse_from(["marketplace", "token"]).is_err());
    }
}
