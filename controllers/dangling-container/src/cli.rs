//! Command line arguments.
//!
//! Every flag can also be supplied through the environment, which is how the
//! DaemonSet manifest passes the node name (downward API) and the mode.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Default location of the mounted configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/config/config.yaml";

#[derive(Parser, Debug)]
#[command(name = "dangling-container-controller", version, about)]
pub struct Cli {
    /// Absolute path to the kubeconfig file, used when not running in-cluster
    #[arg(long, env = "KUBECONFIG", default_value_os_t = default_kubeconfig())]
    pub kubeconfig: PathBuf,

    /// Kubeconfig context to use
    #[arg(long, env = "KUBE_CONTEXT")]
    pub context: Option<String>,

    /// Name of the node this agent runs on
    #[arg(long, env = "NODE")]
    pub node: String,

    /// Report dangling containers, or stop them
    #[arg(long, env = "MODE", value_enum, default_value_t = Mode::Watch)]
    pub mode: Mode,

    /// Path to the YAML configuration file
    #[arg(long = "config", env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: PathBuf,
}

/// What to do with a dangling container.
#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum Mode {
    /// Only report
    #[default]
    Watch,
    /// Stop the container
    Remove,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Watch => f.write_str("watch"),
            Mode::Remove => f.write_str("remove"),
        }
    }
}

fn default_kubeconfig() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".kube").join("config"))
        .unwrap_or_default()
}
