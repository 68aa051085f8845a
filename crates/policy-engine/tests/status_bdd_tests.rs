//! BDD tests for the status evaluator and policy store

use cucumber::{given, then, when, World};
use policy_engine::{load, PolicyEngine, StatusV2, UpdraftError, VersionStatus};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct StatusWorld {
    dir: TempDir,
    policies: Map<String, Value>,
    engine: Option<PolicyEngine>,
    last_status: Option<StatusV2>,
    last_error: Option<UpdraftError>,
}

impl StatusWorld {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
            policies: Map::new(),
            engine: None,
            last_status: None,
            last_error: None,
        }
    }

    fn policy_path(&self) -> PathBuf {
        self.dir.path().join("versions_status.json")
    }

    /// The engine is opened lazily so every Given step lands in the file first.
    fn engine(&mut self) -> &PolicyEngine {
        if self.engine.is_none() {
            let path = self.policy_path();
            std::fs::write(&path, Value::Object(self.policies.clone()).to_string())
                .expect("write policy file");
            self.engine = Some(PolicyEngine::open(&path).expect("open policy file"));
        }
        self.engine.as_ref().expect("engine opened above")
    }

    fn record(&mut self, result: policy_engine::Result<StatusV2>) {
        match result {
            Ok(status) => {
                self.last_status = Some(status);
                self.last_error = None;
            }
            Err(err) => {
                self.last_status = None;
                self.last_error = Some(err);
            }
        }
    }
}

#[given(
    expr = "an ios policy with minimal version {string}, force update {string}, latest version {string} and force off {string}"
)]
fn given_ios_policy(
    world: &mut StatusWorld,
    minimal: String,
    force_update: String,
    latest: String,
    force_off: String,
) {
    world.policies.insert(
        "ios".to_string(),
        json!({
            "minimal_actual_version": minimal,
            "force_update": [force_update],
            "latest_version": latest,
            "force_off": [force_off]
        }),
    );
}

#[given(expr = "an android policy with minimal version {string}")]
fn given_android_policy(world: &mut StatusWorld, minimal: String) {
    world.policies.insert(
        "android".to_string(),
        json!({ "minimal_actual_version": minimal, "force_update": [] }),
    );
}

#[when(expr = "I check the v1 status of {string} version {string}")]
fn when_check_v1(world: &mut StatusWorld, platform: String, version: String) {
    let result = world.engine().status_v1(&platform, &version).map(|v1| StatusV2 {
        status: v1.status,
        update_available: false,
    });
    world.record(result);
}

#[when(expr = "I check the v2 status of {string} version {string}")]
fn when_check_v2(world: &mut StatusWorld, platform: String, version: String) {
    let result = world.engine().status_v2(&platform, &version);
    world.record(result);
}

#[when(expr = "I update the ios policy to minimal version {string} and latest version {string}")]
fn when_update_ios(world: &mut StatusWorld, minimal: String, latest: String) {
    world
        .engine()
        .update_config(
            "ios",
            json!({
                "minimal_actual_version": minimal,
                "force_update": [],
                "latest_version": latest,
                "force_off": []
            }),
        )
        .expect("update should be accepted");
}

#[then(expr = "the status should be {string}")]
fn then_status_should_be(world: &mut StatusWorld, expected: String) {
    let status = world.last_status.expect("No status recorded");
    let expected: VersionStatus =
        serde_json::from_value(Value::String(expected)).expect("known status name");
    assert_eq!(status.status, expected);
}

#[then(expr = "an update should be available")]
fn then_update_available(world: &mut StatusWorld) {
    assert!(world.last_status.expect("No status recorded").update_available);
}

#[then(expr = "an update should be not available")]
fn then_update_not_available(world: &mut StatusWorld) {
    assert!(!world.last_status.expect("No status recorded").update_available);
}

#[then(expr = "I should get a {string} error")]
fn then_should_get_error(world: &mut StatusWorld, code: String) {
    let error = world.last_error.as_ref().expect("No error recorded");
    assert_eq!(error.code(), code, "unexpected error: {error}");
}

#[then(expr = "the policy file should match the in-memory table")]
fn then_file_matches_memory(world: &mut StatusWorld) {
    let on_disk = load(&world.policy_path()).expect("policy file should load");
    assert_eq!(on_disk, *world.engine().snapshot());
}

#[tokio::main]
async fn main() {
    StatusWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
