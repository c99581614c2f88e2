use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kindling::assets::AssetKind;

/// Kindling - resolve and generate cluster bootstrap assets
#[derive(Parser, Debug)]
#[command(name = "kindling")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./kindling.toml, then the user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an asset and write its files
    Create {
        /// Asset to create (install-config, admin-kubeconfig, kubelet-kubeconfig,
        /// manifests, bootstrap-ignition)
        target: AssetKind,

        /// Asset directory: persisted state is read from and output written to it
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Also write the files of every dependency
        #[arg(long)]
        subtree: bool,

        /// Resolve independent assets concurrently
        #[arg(long)]
        parallel: bool,
    },
}
