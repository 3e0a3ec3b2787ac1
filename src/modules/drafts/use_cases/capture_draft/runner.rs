// Wires the capture agent to its triggers.
//
// Purpose
// - Wait for the editor to appear, initialize once, then run the three independent producers:
//   debounced input, the periodic save timer and the periodic sweep timer.
//
// Responsibilities
// - Only the last input within the debounce window triggers a save.
// - Timers never coordinate with each other; the save-gate is the only duplicate guard.

use crate::modules::drafts::core::ports::{EditorSource, InputEvent};
use crate::modules::drafts::core::save_gate::SaveGate;
use crate::modules::drafts::use_cases::capture_draft::agent::CaptureAgent;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub save_interval: Duration,
    pub debounce: Duration,
    pub sweep_interval: Duration,
    pub min_save_gap: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            save_interval: Duration::from_millis(7_000),
            debounce: Duration::from_millis(1_500),
            sweep_interval: Duration::from_millis(10_000),
            min_save_gap: Duration::from_millis(5_000),
        }
    }
}

impl AutosaveConfig {
    pub fn save_gate(&self) -> SaveGate {
        SaveGate::new(i64::try_from(self.min_save_gap.as_millis()).unwrap_or(i64::MAX))
    }
}

/// The running trigger tasks of an active agent.
pub struct CaptureHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl CaptureHandle {
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Waits for the editor, then restores and starts the triggers.
/// Returns `None` when the source ends before an editor appears.
pub async fn detect_editor<S: EditorSource>(
    agent: Arc<CaptureAgent>,
    mut source: S,
    config: AutosaveConfig,
) -> Option<CaptureHandle> {
    let Some(attached) = source.editor_appeared().await else {
        warn!("editor source closed before an editor appeared");
        return None;
    };
    drop(source);

    agent.attach(attached.editor).await;
    let restored = agent.restore_latest().await;
    info!(branch = %restored.branch, versions = restored.versions, "autosave active");

    let tasks = vec![
        tokio::spawn(debounce_input(
            agent.clone(),
            attached.input_events,
            config.debounce,
        )),
        tokio::spawn(periodic_save(agent.clone(), config.save_interval)),
        tokio::spawn(periodic_sweep(agent, config.sweep_interval)),
    ];
    Some(CaptureHandle { tasks })
}

async fn debounce_input(
    agent: Arc<CaptureAgent>,
    mut input_events: mpsc::UnboundedReceiver<InputEvent>,
    debounce: Duration,
) {
    let mut deadline: Option<Instant> = None;
    loop {
        tokio::select! {
            event = input_events.recv() => match event {
                Some(InputEvent) => deadline = Some(Instant::now() + debounce),
                None => break,
            },
            _ = wait_until(deadline) => {
                deadline = None;
                agent.save_snapshot().await;
            }
        }
    }
    // Input stopped; a pending save still fires.
    if let Some(deadline) = deadline {
        sleep_until(deadline).await;
        agent.save_snapshot().await;
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

async fn periodic_save(agent: Arc<CaptureAgent>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        agent.save_snapshot().await;
    }
}

async fn periodic_sweep(agent: Arc<CaptureAgent>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        agent.sweep_all_branches().await;
    }
}
