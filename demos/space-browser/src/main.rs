//! Space browser demo
//!
//! Walks a root space flow through a typical session: join an unjoined
//! space, open a room and start a call, look at the members, then leave.
//! Prints the recorded navigation, the flow's timeline and its schematic.
//!
//! Usage: `space-browser-demo [config.toml]`, `RUST_LOG` and
//! `SPACEFLOW_LAYOUT` are honored.

use anyhow::Context as _;
use async_trait::async_trait;
use spaceflow::prelude::*;
use spaceflow::test::{RecordingIndicators, RecordingNavigationStack};
use spaceflow::{core::SpaceServiceError, telemetry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Homeserver stand-in with a bit of latency.
struct SimulatedHomeserver {
    latency: Duration,
}

#[async_trait]
impl SpaceService for SimulatedHomeserver {
    async fn join_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError> {
        tokio::time::sleep(self.latency).await;
        tracing::info!(space = %space.id(), "Homeserver accepted join");
        Ok(())
    }

    async fn leave_space(&self, space: &SpaceHandle) -> Result<(), SpaceServiceError> {
        tokio::time::sleep(self.latency).await;
        tracing::info!(space = %space.id(), "Homeserver accepted leave");
        Ok(())
    }
}

/// Pump the tree until `done` holds.
async fn settle_until(
    flow: &mut SpaceFlowCoordinator,
    env: &FlowEnvironment,
    done: impl Fn(&SpaceFlowState) -> bool,
) -> anyhow::Result<()> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            flow.process_pending();
            if done(flow.state()) {
                break;
            }
            env.notified().await;
        }
    })
    .await
    .with_context(|| format!("flow stuck in {:?}", flow.state()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => FlowConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => FlowConfig::default(),
    }
    .with_env_overrides()?;
    tracing::info!(?config, "Starting space browser");

    let nav = Arc::new(RecordingNavigationStack::new());
    let env = FlowEnvironment::new(
        nav.clone(),
        Arc::new(SimulatedHomeserver {
            latency: Duration::from_millis(40),
        }),
        Arc::new(RecordingIndicators::new()),
        config,
    );
    let (app_tx, mut app_rx) = mpsc::unbounded_channel::<FlowAction>();

    let space = SpaceHandle::new("!rust:example.org", "Rust Community");
    let mut flow = SpaceFlowCoordinator::new(
        env.clone(),
        SpaceEntryPoint::JoinSpace(space),
        Presentation::Root,
        Arc::new(app_tx),
    );
    flow.start(false);

    println!("=== Join ===");
    nav.send_to_root(ScreenAction::Join);
    settle_until(&mut flow, &env, |s| s.is_browsing()).await?;
    println!("joined, now in {}", flow.state().name());

    println!("\n=== Room and call ===");
    let lobby = RoomId::new("!lobby:example.org");
    nav.send_to_root(ScreenAction::SelectRoom(lobby.clone()));
    settle_until(&mut flow, &env, |s| {
        matches!(s, SpaceFlowState::RoomFlow { .. })
    })
    .await?;
    match flow.active_child() {
        Some((ChildKind::Room, target)) => println!("room flow open for {target}"),
        other => anyhow::bail!("expected a room flow, found {other:?}"),
    }
    let room_screen = ScreenKind::Room {
        room_id: lobby.clone(),
    };
    if env.config.layout == spaceflow::core::NavigationLayout::Split {
        nav.send_to_detail(ScreenAction::StartCall(lobby));
    } else {
        nav.send_to_top(ScreenAction::StartCall(lobby));
    }
    flow.process_pending();
    while let Ok(action) = app_rx.try_recv() {
        println!("app asked to handle: {action:?}");
    }
    flow.handle_app_route(&AppRoute::Settings, true);
    println!(
        "closed {}, back to {}",
        room_screen.name(),
        flow.state().name()
    );

    println!("\n=== Members ===");
    nav.send_to_root(ScreenAction::DisplayMembers);
    settle_until(&mut flow, &env, |s| {
        matches!(s, SpaceFlowState::MembersFlow { .. })
    })
    .await?;
    nav.simulate_user_pop();
    settle_until(&mut flow, &env, |s| s.is_browsing()).await?;
    println!("members closed, back to {}", flow.state().name());

    println!("\n=== Leave ===");
    nav.send_to_root(ScreenAction::Leave);
    tokio::time::timeout(Duration::from_secs(5), flow.run())
        .await
        .context("leaving took too long")?;
    while let Ok(action) = app_rx.try_recv() {
        println!("app asked to handle: {action:?}");
    }

    println!("\n=== Navigation ===");
    for op in nav.ops() {
        println!("{op:?}");
    }

    println!("\n=== Timeline ===");
    for entry in flow.timeline().entries() {
        println!(
            "#{:<2} {:<14} --{:<16}--> {:<14} ({})",
            entry.sequence, entry.from, entry.event, entry.to, entry.row
        );
    }

    println!("\n=== Schematic (JSON) ===");
    println!(
        "{}",
        serde_json::to_string_pretty(&SpaceFlowCoordinator::schematic())?
    );

    Ok(())
}
