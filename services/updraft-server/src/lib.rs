//! # Updraft Server
//!
//! HTTP surface over the policy engine and the asset index.

pub mod access_log;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod routes;
pub mod state;

use anyhow::Context;
use asset_index::AssetIndex;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use policy_engine::PolicyEngine;
use tracing::info;
use updraft_core::endpoints;

pub use config::ServerConfig;
pub use state::AppState;

/// Full route table with auth on the config routes only.
pub fn router(state: AppState) -> Router {
    let config_routes = Router::new()
        .route(
            endpoints::V1_CONFIG,
            get(routes::get_config).post(routes::post_config),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .route(endpoints::HEALTHCHECK, get(health::healthcheck))
        .route(endpoints::V1_STATUS, get(routes::status_v1))
        .route(endpoints::V2_STATUS, get(routes::status_v2))
        .route(endpoints::V1_CHECK_ASSETS, post(routes::check_assets_updates))
        .route(
            endpoints::V1_CHECK_ASSETS_LEGACY,
            post(routes::check_assets_updates),
        )
        .route(endpoints::V1_ASSET, get(routes::get_asset))
        .merge(config_routes)
        .fallback(routes::not_found)
        .layer(from_fn(access_log::access_log))
        .with_state(state)
}

/// Load the policy table and build the asset index; either failure is fatal.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let engine = PolicyEngine::open(&config.policy_file)
        .with_context(|| format!("loading policy file {}", config.policy_file.display()))?;

    let ids_file = config.asset_ids_file();
    let assets = AssetIndex::build_from_ids_file(&config.assets_dir, &ids_file)
        .with_context(|| format!("indexing assets under {}", config.assets_dir.display()))?;
    info!("Asset index ready with {} asset(s)", assets.len());

    if config.config_secret.is_none() {
        info!("CONFIG_SECRET is not set; config routes will reject every request");
    }

    let version = health::deploy_version(config.version_file.as_deref());
    Ok(AppState::new(engine, assets, config.config_secret.clone()).with_version(version))
}
