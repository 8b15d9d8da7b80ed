//! `completions` command

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::EnvSchemaError;

/// Print or write a completion script for `envschema`.
///
/// # Errors
///
/// Returns an I/O error if the output file cannot be written.
pub async fn run(args: &CompletionsArgs) -> Result<(), EnvSchemaError> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    let mut script = Vec::new();
    clap_complete::generate(args.shell, &mut cmd, bin_name, &mut script);

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &script).await?;
            tracing::info!(shell = ?args.shell, output = %path.display(), "completions written");
        }
        None => print!("{}", String::from_utf8_lossy(&script)),
    }
    Ok(())
}
