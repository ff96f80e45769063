use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use zip_reconcile_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "zip-reconcile")]
#[command(about = "Merge two per-user PDF archives into one deduplicated archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two archives, write the merged archive and a JSON report
    Compare(CompareArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Archive with files named USERNAME_CODE.pdf
    pub archive_a: PathBuf,
    /// Archive with folders named USERNAME(NUMBER) NAME
    pub archive_b: PathBuf,
    /// Directory the merged archive and report are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Also write the merged file list as CSV
    #[arg(long)]
    pub csv: bool,
    /// Print the full response envelope (base64 archive + summary) as JSON
    #[arg(long)]
    pub json: bool,
    /// Group output members by their source folder
    #[arg(long)]
    pub preserve_folders: bool,
    /// Store output members uncompressed
    #[arg(long)]
    pub store: bool,
    /// Maximum nested archive depth to expand
    #[arg(long)]
    pub nested_depth: Option<usize>,
}

impl CompareArgs {
    /// Command line flags win over Config.toml and the environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if self.preserve_folders {
            config.preserve_folders = true;
        }
        if self.store {
            config.compress_output = false;
        }
        if let Some(depth) = self.nested_depth {
            config.nested_archive_depth = depth;
        }
    }
}
