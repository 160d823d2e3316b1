//! Local run of the validator loop against an in-process ledger.
//!
//! Usage: `vigil-demo [config.toml]`. `VIGIL_*` variables override the file.
//! Exits non-zero on configuration or registration failure.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use test_fixtures::{peers_of, EchoReward, MockEndpoint, MockLedger, MockTransport, PeerBehavior};
use vigil_core::config::VigilConfig;
use vigil_runloop::{Collaborators, RunLoopController};
use vigil_storage::StateStore;

const DEMO_PEERS: usize = 8;

/// Same layering as `VigilConfig::load`, with a demo identity filled in
/// before validation.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<VigilConfig> {
    let mut config = match path {
        Some(path) => VigilConfig::from_file(&path)?,
        None => VigilConfig::default(),
    };
    if config.identity.is_empty() {
        config.identity = "demo-validator".to_string();
    }
    config.apply_overrides(std::env::vars())?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(path)?;
    vigil_observability::init_tracing(&config.observability);

    let mut ids = vec![config.identity.clone()];
    ids.extend((0..DEMO_PEERS).map(|i| format!("peer-{i}")));
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();

    let ledger = Arc::new(
        MockLedger::new(peers_of(&refs)).with_auto_advance(config.runloop.epoch_length),
    );
    let transport = Arc::new(MockTransport::new());
    transport.script("peer-0", PeerBehavior::Silent);
    transport.script(
        "peer-1",
        PeerBehavior::Echo {
            delay: Duration::from_millis(20),
        },
    );
    transport.script("peer-2", PeerBehavior::Fail("connection refused".to_string()));

    let store = StateStore::from_config(&config.storage).context("opening state store")?;
    let collaborators = Collaborators::new(
        ledger.clone(),
        ledger,
        transport,
        Arc::new(EchoReward),
    )
    .with_store(Arc::new(store))
    .with_endpoint(Arc::new(MockEndpoint::new()));

    let mut controller = RunLoopController::new(config, collaborators);
    controller
        .run_until_interrupted()
        .context("running validator loop")?;

    let status = controller.status();
    info!(step = status.step, height = status.height, "final status");
    Ok(())
}
