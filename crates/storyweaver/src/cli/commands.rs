//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Storyweaver - generate an illustrated children's storybook
#[derive(Parser, Debug)]
#[command(name = "storyweaver")]
#[command(about = "Generate an illustrated children's storybook from a JSON story description", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the story configuration JSON file
    #[arg(long, default_value = "story_config.json")]
    pub config: PathBuf,

    /// Parent directory for the generated book (overrides settings)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Settings file applied over the defaults
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
