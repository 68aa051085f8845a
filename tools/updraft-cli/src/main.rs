use anyhow::{bail, Context};
use asset_index::{digest::content_version_of_file, AssetIndex};
use clap::{Parser, Subcommand};
use policy_engine::PolicyEngine;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

const DEFAULT_IDS_FILE: &str = "assets_index.json";

#[derive(Parser)]
#[command(name = "updraft")]
#[command(about = "Updraft CLI - Version policy and asset tooling")]
#[command(version = updraft_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a client version against a local policy file
    Status {
        #[arg(long, default_value = "versions_status.json")]
        policy_file: PathBuf,
        /// Use the V2 rules and report update availability
        #[arg(long)]
        v2: bool,
        platform: String,
        version: String,
    },
    /// Build the asset index and print it
    Index {
        #[arg(long, default_value = "assets")]
        assets_dir: PathBuf,
        /// Defaults to `<assets-dir>/assets_index.json`
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },
    /// Print the content version of each file
    Hash {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Read or replace a platform policy on a running server
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Fetch the current policy
    Get {
        #[command(flatten)]
        remote: Remote,
        platform: String,
    },
    /// Replace the policy with a JSON document (stdin when no file is given)
    Push {
        #[command(flatten)]
        remote: Remote,
        platform: String,
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Remote {
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,
    #[arg(long, env = "CONFIG_SECRET", hide_env_values = true)]
    token: String,
}

impl Remote {
    fn config_url(&self, platform: &str) -> String {
        format!("{}/v1/{}/config", self.url.trim_end_matches('/'), platform)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status {
            policy_file,
            v2,
            platform,
            version,
        } => handle_status(&policy_file, v2, &platform, &version),
        Commands::Index {
            assets_dir,
            ids_file,
        } => handle_index(&assets_dir, ids_file),
        Commands::Hash { files } => handle_hash(&files),
        Commands::Config { action } => handle_config_action(action).await,
    }
}

fn handle_status(policy_file: &Path, v2: bool, platform: &str, version: &str) -> anyhow::Result<()> {
    let engine = PolicyEngine::open(policy_file)
        .with_context(|| format!("loading {}", policy_file.display()))?;
    let report = if v2 {
        serde_json::to_string(&engine.status_v2(platform, version)?)?
    } else {
        serde_json::to_string(&engine.status_v1(platform, version)?)?
    };
    println!("{report}");
    Ok(())
}

fn handle_index(assets_dir: &Path, ids_file: Option<PathBuf>) -> anyhow::Result<()> {
    let ids_file = ids_file.unwrap_or_else(|| assets_dir.join(DEFAULT_IDS_FILE));
    let index = AssetIndex::build_from_ids_file(assets_dir, &ids_file)
        .with_context(|| format!("indexing {}", assets_dir.display()))?;
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}

fn handle_hash(files: &[PathBuf]) -> anyhow::Result<()> {
    for file in files {
        let version = content_version_of_file(file)
            .with_context(|| format!("reading {}", file.display()))?;
        println!("{}  {}", version, file.display());
    }
    Ok(())
}

async fn handle_config_action(action: ConfigAction) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = match action {
        ConfigAction::Get { remote, platform } => {
            client
                .get(remote.config_url(&platform))
                .header(reqwest::header::AUTHORIZATION, remote.authorization())
                .send()
                .await?
        }
        ConfigAction::Push {
            remote,
            platform,
            file,
        } => {
            let payload = read_payload(file.as_deref())?;
            client
                .post(remote.config_url(&platform))
                .header(reqwest::header::AUTHORIZATION, remote.authorization())
                .json(&payload)
                .send()
                .await?
        }
    };

    let status = response.status();
    let body: Value = response.json().await.context("decoding server response")?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    if !status.is_success() {
        bail!("server answered {status}");
    }
    Ok(())
}

fn read_payload(file: Option<&Path>) -> anyhow::Result<Value> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    serde_json::from_str(&raw).context("policy document is not valid JSON")
}
