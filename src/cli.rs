use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tootprune::config::{MaxAge, PurgeSettings};

#[derive(Parser, Debug)]
#[command(name = "tootprune", version)]
#[command(about = "Delete old posts and favourites from a Mastodon account", long_about = None)]
pub struct Cli {
    /// Path to the settings file (default: tootprune.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reduce output to warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete posts (and optionally favourites) older than the maximum age
    Purge(PurgeArgs),
    /// Check the access token and show the account it belongs to
    Whoami,
}

#[derive(clap::Args, Debug)]
pub struct PurgeArgs {
    /// Max age of posts to keep, e.g. "6 months" (hours, days, weeks, months, years)
    #[arg(long)]
    pub max_age: Option<MaxAge>,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Purge favourites in addition to posts
    #[arg(long)]
    pub favourites: bool,
}

impl PurgeArgs {
    /// Flags win over the settings file
    pub fn apply(&self, settings: &mut PurgeSettings) {
        if let Some(max_age) = self.max_age {
            settings.max_age = Some(max_age);
        }
        settings.dry_run |= self.dry_run;
        settings.favourites |= self.favourites;
    }
}
