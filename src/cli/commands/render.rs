//! `render` command
//!
//! Emits the virtual module source, e.g. to check it into a build or to
//! feed a bundler without plugin support.

use crate::cli::args::RenderArgs;
use crate::cli::commands::Session;
use crate::error::EnvSchemaError;

/// Print or write the module source.
///
/// # Errors
///
/// Returns the validation error when the environment is rejected, any
/// schema file or environment loading error, or an I/O error writing the
/// output file.
pub async fn run(args: &RenderArgs) -> Result<(), EnvSchemaError> {
    let session = Session::start(&args.env).await?;
    let source = session.import().await?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, format!("{source}\n")).await?;
            tracing::info!(output = %path.display(), bytes = source.len() + 1, "module written");
        }
        None => println!("{source}"),
    }
    Ok(())
}
