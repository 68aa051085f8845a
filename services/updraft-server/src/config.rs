//! Server configuration from flags and environment

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default name of the asset id mapping file inside the asset directory.
pub const DEFAULT_ASSET_IDS_FILE: &str = "assets_index.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "updraft-server")]
#[command(about = "App version status and asset freshness API")]
#[command(version = updraft_core::VERSION)]
pub struct ServerConfig {
    /// Interface to listen on
    #[arg(long, env = "UPDRAFT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Version policy table, rewritten by config updates
    #[arg(long, env = "UPDRAFT_POLICY_FILE", default_value = "versions_status.json")]
    pub policy_file: PathBuf,

    /// Root of the served asset tree
    #[arg(long, env = "UPDRAFT_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Asset id to relative path mapping [default: <assets-dir>/assets_index.json]
    #[arg(long, env = "UPDRAFT_ASSET_IDS_FILE")]
    pub asset_ids_file: Option<PathBuf>,

    /// File holding the deployed build id [default: crate version]
    #[arg(long, env = "UPDRAFT_VERSION_FILE")]
    pub version_file: Option<PathBuf>,

    /// Shared secret for the config routes; unset rejects every token
    #[arg(long, env = "CONFIG_SECRET", hide_env_values = true)]
    pub config_secret: Option<String>,
}

impl ServerConfig {
    pub fn asset_ids_file(&self) -> PathBuf {
        self.asset_ids_file
            .clone()
            .unwrap_or_else(|| self.assets_dir.join(DEFAULT_ASSET_IDS_FILE))
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
