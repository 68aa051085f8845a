//! Liveness and uptime metadata

use crate::state::AppState;
use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use policy_engine::PolicyEngineStats;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use sysinfo::System;
use tracing::{instrument, warn};

const UNAVAILABLE: &str = "n/a";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub hostname: String,
    pub version: String,
    pub loadavg: Value,
    pub uptime: String,
    pub sys_uptime: String,
    pub policies: PolicyEngineStats,
    pub assets: usize,
}

#[instrument(skip(state))]
pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthReport> {
    let app_uptime = (Utc::now() - state.started_at)
        .to_std()
        .unwrap_or(Duration::ZERO);

    Json(HealthReport {
        hostname: System::host_name().unwrap_or_else(|| UNAVAILABLE.to_string()),
        version: state.version.to_string(),
        loadavg: load_average(),
        uptime: format_uptime(app_uptime),
        sys_uptime: match System::uptime() {
            0 => UNAVAILABLE.to_string(),
            secs => format_uptime(Duration::from_secs(secs)),
        },
        policies: state.engine.get_stats(),
        assets: state.assets.len(),
    })
}

/// Trimmed contents of the deploy's version file, or the crate version when
/// there is none.
pub fn deploy_version(version_file: Option<&Path>) -> String {
    let Some(path) = version_file else {
        return updraft_core::VERSION.to_string();
    };
    match fs::read_to_string(path) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
        Ok(_) => updraft_core::VERSION.to_string(),
        Err(e) => {
            warn!("Cannot read version file {}: {}", path.display(), e);
            updraft_core::VERSION.to_string()
        }
    }
}

fn load_average() -> Value {
    if cfg!(windows) {
        return json!(UNAVAILABLE);
    }
    let load = System::load_average();
    json!([load.one, load.five, load.fifteen])
}

/// `"[D day(s), ]H:MM:SS"`
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_version_prefers_the_version_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("version.txt");
        fs::write(&path, "2024.05.1-abc123\n").unwrap();
        assert_eq!(deploy_version(Some(path.as_path())), "2024.05.1-abc123");
    }

    #[test]
    fn deploy_version_falls_back_to_crate_version() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(deploy_version(None), updraft_core::VERSION);
        assert_eq!(
            deploy_version(Some(dir.path().join("version.txt").as_path())),
            updraft_core::VERSION
        );
        let blank = dir.path().join("blank.txt");
        fs::write(&blank, "  \n").unwrap();
        assert_eq!(deploy_version(Some(blank.as_path())), updraft_core::VERSION);
    }

    #[test]
    fn formats_like_a_clock() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_uptime(Duration::from_secs(3_725)), "1:02:05");
        assert_eq!(format_uptime(Duration::from_secs(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_uptime(Duration::from_secs(3 * 86_400)), "3 days, 0:00:00");
    }
}
