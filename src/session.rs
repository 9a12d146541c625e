use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use tracing::{info, warn};

use crate::{
    brief::{Brief, BriefError},
    content::{export_filename, GeneratedContent},
    events::RunEvent,
    orchestrator::{GenerationMode, Orchestrator},
    progress::Presenter,
    prompts::EnglishVariant,
    providers::{with_timeout, ContentProvider, ProviderError},
};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("nothing has been generated yet")]
    NoContent,
    #[error("no provider configured or no API key set")]
    NoProvider,
    #[error("transform failed, please try again: {0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for TransformError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::MissingCredential { .. } => Self::NoProvider,
            e => Self::Provider(e),
        }
    }
}

pub struct Export {
    pub filename: String,
    pub text: String,
}

/// One user's working state: the current brief, at most one run in flight
/// and the last result.
pub struct Session {
    orchestrator: Arc<Orchestrator>,
    events: broadcast::Sender<RunEvent>,
    presenter: Option<Presenter>,
    result: Option<oneshot::Receiver<GeneratedContent>>,
    brief: Option<Brief>,
    mode: GenerationMode,
    content: Option<GeneratedContent>,
}

impl Session {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            orchestrator,
            events,
            presenter: None,
            result: None,
            brief: None,
            mode: GenerationMode::Provider,
            content: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.events.subscribe()
    }

    pub fn brief(&self) -> Option<&Brief> {
        self.brief.as_ref()
    }

    pub fn content(&self) -> Option<&GeneratedContent> {
        self.content.as_ref()
    }

    /// Validates the brief and starts a fresh run, tearing down any run
    /// still in flight.
    pub fn submit(&mut self, brief: Brief, mode: GenerationMode) -> Result<&str, BriefError> {
        let brief = brief.validated()?;
        if let Some(prev) = self.presenter.take() {
            prev.cancel();
        }

        // Replacing the receiver drops whatever the previous run might still send.
        let (tx, rx) = oneshot::channel();
        self.result = Some(rx);
        let presenter = Presenter::start(
            self.orchestrator.clone(),
            brief.clone(),
            mode,
            self.events.clone(),
            move |content| {
                let _ = tx.send(content);
            },
        );
        info!(
            run_id = presenter.run_id(),
            brand = %brief.brand_name,
            tone = %brief.tone,
            "run started"
        );
        self.brief = Some(brief);
        self.mode = mode;
        Ok(self.presenter.insert(presenter).run_id())
    }

    /// Starts a new run from the current brief with only the tone changed.
    pub fn regenerate_with_tone(&mut self, tone: &str) -> Result<&str, BriefError> {
        let brief = self.brief.as_ref().ok_or(BriefError::Missing("brief"))?.with_tone(tone);
        let mode = self.mode;
        self.submit(brief, mode)
    }

    /// Waits for the current run's result and makes it the session content.
    /// Returns `None` when no run is pending or the run ended without one.
    pub async fn wait_for_content(&mut self) -> Option<&GeneratedContent> {
        let rx = self.result.take()?;
        let received = rx.await;
        if let Some(mut p) = self.presenter.take() {
            p.join().await;
        }
        match received {
            Ok(content) => {
                self.content = Some(content);
                self.content.as_ref()
            }
            Err(_) => {
                warn!("run ended without producing content");
                None
            }
        }
    }

    fn transform_provider(&self) -> Result<&Arc<dyn ContentProvider>, TransformError> {
        self.orchestrator
            .provider()
            .filter(|p| p.has_credential())
            .ok_or(TransformError::NoProvider)
    }

    pub async fn localize(&self, variant: EnglishVariant) -> Result<String, TransformError> {
        let content = self.content.as_ref().ok_or(TransformError::NoContent)?;
        let provider = self.transform_provider()?;
        with_timeout(self.orchestrator.timeout(), provider.localize_content(&content.body, variant))
            .await
            .map_err(|e| {
                warn!(%variant, error = %e, "localization failed");
                e.into()
            })
    }

    pub async fn humanize(&self) -> Result<String, TransformError> {
        let content = self.content.as_ref().ok_or(TransformError::NoContent)?;
        let provider = self.transform_provider()?;
        with_timeout(self.orchestrator.timeout(), provider.humanize_content(&content.body))
            .await
            .map_err(|e| {
                warn!(error = %e, "humanize failed");
                e.into()
            })
    }

    pub fn export(&self) -> Option<Export> {
        let content = self.content.as_ref()?;
        let brief = self.brief.as_ref()?;
        Some(Export { filename: export_filename(&brief.brand_name), text: content.export_text() })
    }
}
