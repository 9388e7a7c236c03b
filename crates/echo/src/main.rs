// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hub-echo: request/reply over a simulated peer, correlated with a
//! session hub.
//!
//! Each request opens a session, travels to the peer with the session id,
//! and the caller waits on the hub until the peer's reply is routed back.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod peer;

use clap::Parser;
use sessionhub::{HubConfig, SessionHub};
use std::time::Duration;
use tracing::{info, warn};

use crate::peer::{spawn_peer, spawn_reply_router, EchoClient};

#[derive(Debug, Parser)]
#[command(name = "hub-echo", version, about = "Correlate simulated peer replies through a session hub")]
struct Args {
    /// Number of concurrent requests to send
    #[arg(long, default_value_t = 3)]
    requests: usize,

    /// How long the peer takes to reply, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// How long each caller waits for its reply, in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging();

    let config = HubConfig::from_env()?;
    info!(?config, "starting session hub");
    let hub = SessionHub::new(config);

    let (requests, replies) = spawn_peer(Duration::from_millis(args.delay_ms));
    let router = spawn_reply_router(hub.clone(), replies);
    let client = EchoClient::new(hub.clone(), requests, Duration::from_millis(args.timeout_ms));

    let calls: Vec<_> = (0..args.requests)
        .map(|n| {
            let client = client.clone();
            tokio::spawn(async move { (n, client.call(format!("ping {n}")).await) })
        })
        .collect();
    // Dropping the last request sender lets the peer and router wind down
    drop(client);

    let mut failures = 0;
    for call in calls {
        let (n, result) = call.await?;
        match result {
            Ok(reply) => println!("request {n}: {reply}"),
            Err(e) => {
                warn!(request = n, error = %e, "request failed");
                println!("request {n}: error: {e}");
                failures += 1;
            }
        }
    }

    router.await?;
    hub.stop_sweeper().await;
    info!(requests = args.requests, failures, "done");

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
