//! # Relay Runtime
//!
//! Runs one message router per simulated window.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `WR_*` environment variables
//! 2. Initialize logging (stderr)
//! 3. Load the topology (`WR_TOPOLOGY`, or the built-in demo)
//! 4. Feed newline-delimited `InboundEvent`s from stdin into the event loop
//! 5. On end of input, drain the queue and print a JSON report to stdout
//!
//! ## Input Format
//!
//! ```text
//! {"from": "widget", "to": "top", "message": {"type": "postrobot_message_request", ...}}
//! ```

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use relay_runtime::{EventLoop, InboundEvent, RuntimeConfig, Topology};

/// Load the topology file, falling back to the demo topology.
async fn load_topology(config: &RuntimeConfig) -> Result<Topology> {
    let Some(path) = &config.topology else {
        warn!("WR_TOPOLOGY not set, using demo topology");
        return Ok(Topology::demo());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read topology {}", path.display()))?;
    Topology::from_json(&raw).with_context(|| format!("Invalid topology {}", path.display()))
}

/// Forward stdin lines to the event loop until end of input.
async fn read_events(tx: mpsc::Sender<InboundEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<InboundEvent>(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(line = line_no, error = %e, "Skipping malformed input line"),
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;

    // Initialize logging; stdout is reserved for the report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let topology = load_topology(&config).await?;
    info!(
        windows = topology.windows.len(),
        mock_mode = config.router.mock_mode,
        replay_capacity = ?config.router.replay_capacity,
        "Starting relay runtime"
    );

    let event_loop = EventLoop::from_topology(topology, config.router.clone())?;
    let journal = event_loop.journal().clone();

    let (tx, rx) = mpsc::channel(256);
    let reader = tokio::spawn(read_events(tx));
    let stats = event_loop.run(rx).await;
    reader.await??;

    info!(
        processed = stats.processed,
        dispatched = stats.dispatched,
        forwarded = stats.forwarded,
        rejected = stats.rejected,
        "Input exhausted"
    );

    let report = serde_json::json!({
        "stats": stats,
        "handled": journal.entries(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
