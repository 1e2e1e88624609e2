// Command line arguments
use crate::infrastructure::config::{ASSET_DIR, BRANDING_CONFIG_PATH};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate and apply the HaLOS branding for Homarr
#[derive(Parser, Debug)]
#[command(name = "homarr-branding")]
#[command(about = "Validate and apply the HaLOS branding for Homarr", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Branding document to read
    #[arg(long, global = true, default_value = BRANDING_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory that relative asset paths are resolved against
    #[arg(long, global = true, default_value = ASSET_DIR)]
    pub asset_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Parse and validate the branding document
    Validate {
        /// Also check that the logo and favicon are installed
        #[arg(long)]
        check_assets: bool,

        /// Also check that the cockpit tile target answers
        #[arg(long)]
        probe: bool,
    },

    /// Print the normalized document as JSON
    Show,

    /// Print the onboarding plan as JSON
    Plan,

    /// Run the onboarding plan against the dashboard
    Apply,
}
