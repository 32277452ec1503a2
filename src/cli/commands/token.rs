use chrono::Duration;
use clap::Args;
use serde_json::json;

use crate::auth::generate_session_token_with_ttl;
use crate::cli::{utils, OutputFormat};
use crate::config;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(help = "User id to place in the token subject")]
    pub user_id: String,

    #[arg(long, help = "Token lifetime in minutes (defaults to AUTH_TOKEN_TTL_MINUTES)")]
    pub ttl_minutes: Option<i64>,
}

pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let ttl_minutes = args.ttl_minutes.unwrap_or(security.token_ttl_minutes);
    if ttl_minutes <= 0 {
        anyhow::bail!("--ttl-minutes must be positive");
    }

    let token = generate_session_token_with_ttl(security, &args.user_id, Duration::minutes(ttl_minutes))?;

    match output_format {
        OutputFormat::Json => utils::output_success(
            &output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "user_id": args.user_id,
                "expires_in_minutes": ttl_minutes,
            })),
        ),
        // Bare token so it can be captured with $(marketplace token ...)
        OutputFormat::Text => {
            println!("{token}");
            Ok(())
        }
    }
}
