use crate::commands::{instance_array, os_asset, os_template, secret};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "metalcloud-cli")]
#[command(
    author,
    version,
    about = "Command line client for the Metal Cloud bare metal API"
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Configuration file (defaults to ~/.metalcloud/config.toml)
    #[clap(long, global = true, env = "METALCLOUD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list, edit and delete instance arrays
    #[command(name = "instance-array", visible_alias = "ia")]
    InstanceArray {
        #[command(subcommand)]
        command: instance_array::InstanceArrayCommand,
    },

    /// Manage OS templates
    #[command(name = "os-template", visible_alias = "template")]
    OsTemplate {
        #[command(subcommand)]
        command: os_template::OsTemplateCommand,
    },

    /// Manage OS assets (files deployed with OS templates)
    #[command(name = "os-asset", visible_alias = "asset")]
    OsAsset {
        #[command(subcommand)]
        command: os_asset::OsAssetCommand,
    },

    /// Manage secrets
    Secret {
        #[command(subcommand)]
        command: secret::SecretCommand,
    },
}
