use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed tar.gz snapshots of a directory tree
#[derive(Parser, Debug)]
#[command(name = "pumkin", version, about = "pumkin snapshot CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Initialize a repository (<path>/.pumkin with an images directory)
    Create { path: PathBuf },
    /// Archive the tree, publish the image and append its id to COMMITS
    Sync { path: PathBuf },
    /// Print recorded image ids, oldest first
    Log {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Re-hash every image and check history against published images
    Verify {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
}
