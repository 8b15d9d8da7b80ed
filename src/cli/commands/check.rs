//! `check` command
//!
//! Runs the plugin through the host and reports the validated
//! configuration, or the validation failure.

use serde_json::json;

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::cli::commands::Session;
use crate::error::EnvSchemaError;

/// Validate the environment and print the result.
///
/// # Errors
///
/// Returns the validation error when the environment is rejected, or any
/// schema file or environment loading error.
pub async fn run(args: &CheckArgs) -> Result<(), EnvSchemaError> {
    let session = match Session::start(&args.env).await {
        Ok(session) => session,
        Err(e) => return Err(report_failure(args, e)),
    };
    if let Err(e) = session.import().await {
        return Err(report_failure(args, e));
    }

    let config = session.plugin.validated().await.unwrap_or_default();
    match args.format {
        OutputFormat::Human => {
            let count = config.as_object().map_or(0, serde_json::Map::len);
            println!(
                "environment is valid (mode: {}, {count} variables)",
                args.env.mode
            );
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({ "valid": true, "mode": args.env.mode, "config": config })
            );
        }
    }
    Ok(())
}

/// In JSON mode, reports any failure on stdout before it propagates.
fn report_failure(args: &CheckArgs, err: EnvSchemaError) -> EnvSchemaError {
    if args.format == OutputFormat::Json {
        println!(
            "{}",
            json!({
                "valid": false,
                "mode": args.env.mode,
                "error": err.to_string(),
                "exit_code": err.exit_code(),
            })
        );
    }
    err
}
