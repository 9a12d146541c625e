//! Cosmetic progress shown while a run is in flight. The animation runs on
//! its own timer schedule; completion is driven only by the orchestration.

use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::{
    brief::Brief,
    content::GeneratedContent,
    events::RunEvent,
    orchestrator::{GenerationMode, Orchestrator},
};

pub struct Step {
    pub label: &'static str,
    pub duration: Duration,
}

pub const STEPS: [Step; 5] = [
    Step { label: "Analyzing your brand...", duration: Duration::from_millis(1500) },
    Step { label: "Generating blog content...", duration: Duration::from_millis(2000) },
    Step { label: "Creating images...", duration: Duration::from_millis(1800) },
    Step { label: "Extracting keywords...", duration: Duration::from_millis(1200) },
    Step { label: "Optimizing for SEO...", duration: Duration::from_millis(1000) },
];

pub const TICKS_PER_STEP: u32 = 20;

/// Displayed percentage at `tick` (0..=TICKS_PER_STEP) of step `step`.
pub fn percent_at(step: usize, tick: u32) -> f32 {
    let span = 100.0 / STEPS.len() as f32;
    let tick = tick.min(TICKS_PER_STEP);
    step as f32 * span + span * tick as f32 / TICKS_PER_STEP as f32
}

/// Ticks fire every `duration / TICKS_PER_STEP`, so step `i` starts exactly
/// when step `i - 1` has used up its duration. A final 100% tick closes it.
async fn animate(run_id: String, token: CancellationToken, events: broadcast::Sender<RunEvent>) {
    let progress = |step: usize, tick: u32| RunEvent::Progress {
        run_id: run_id.clone(),
        step,
        label: STEPS[step].label,
        percent: percent_at(step, tick),
    };
    for (i, step) in STEPS.iter().enumerate() {
        let tick_len = step.duration / TICKS_PER_STEP;
        for tick in 0..TICKS_PER_STEP {
            let _ = events.send(progress(i, tick));
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(tick_len) => {}
            }
        }
    }
    let _ = events.send(progress(STEPS.len() - 1, TICKS_PER_STEP));
}

/// One in-flight run: the animation plus the orchestration call. Dropping or
/// cancelling it stops pending ticks and discards the result.
pub struct Presenter {
    run_id: String,
    cancel: CancellationToken,
    run: Option<JoinHandle<()>>,
}

impl Presenter {
    pub fn start<F>(
        orchestrator: Arc<Orchestrator>,
        brief: Brief,
        mode: GenerationMode,
        events: broadcast::Sender<RunEvent>,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(GeneratedContent) + Send + 'static,
    {
        let run_id = format!("run-{}", Uuid::new_v4());
        let cancel = CancellationToken::new();
        let animation = cancel.child_token();

        let _ = events.send(RunEvent::Started {
            run_id: run_id.clone(),
            brand: brief.brand_name.clone(),
        });
        tokio::spawn(animate(run_id.clone(), animation.clone(), events.clone()));

        let run = tokio::spawn({
            let cancel = cancel.clone();
            let run_id = run_id.clone();
            async move {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    res = orchestrator.run_detailed(&brief, mode) => Some(res),
                };
                animation.cancel();
                match outcome {
                    Some((content, source)) if !cancel.is_cancelled() => {
                        on_complete(content);
                        let _ = events.send(RunEvent::completed(&run_id, source));
                    }
                    _ => {
                        debug!(%run_id, "run cancelled, result discarded");
                        let _ = events.send(RunEvent::Cancelled { run_id });
                    }
                }
            }
        });

        Self { run_id, cancel, run: Some(run) }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Waits until the run has either delivered its result or been torn down.
    pub async fn join(&mut self) {
        if let Some(handle) = self.run.take() {
            if let Err(e) = handle.await {
                debug!(run_id = %self.run_id, error = %e, "presenter task ended abnormally");
            }
        }
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
