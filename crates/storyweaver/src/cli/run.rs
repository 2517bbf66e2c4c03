//! Story creation command handler.

use super::Cli;
use std::path::PathBuf;
use storyweaver::{Credentials, Settings, StoryweaverResult, creator_from_settings};
use tracing::{info, instrument};

/// Create one storybook as described by the command line.
///
/// Settings and credentials are resolved before the configuration file is
/// read, so a missing API key fails without touching the services.
///
/// Returns the directory the book was written to.
#[instrument(skip(cli), fields(config = %cli.config.display()))]
pub async fn run_story(cli: &Cli) -> StoryweaverResult<PathBuf> {
    let mut settings = Settings::load(cli.settings.as_deref())?;
    if let Some(output) = &cli.output {
        settings = settings.with_output_dir(output);
    }

    let credentials = Credentials::from_env()?;
    let creator = creator_from_settings(&settings, &credentials)?;

    let book = creator.create_from_file(&cli.config).await?;
    info!(
        directory = %book.directory().display(),
        title = %book.manifest().title(),
        pages = book.manifest().page_count(),
        "Storybook complete"
    );

    Ok(book.directory().clone())
}
