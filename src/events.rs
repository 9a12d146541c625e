use serde::Serialize;

use crate::orchestrator::ContentSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    Started { run_id: String, brand: String },
    Progress { run_id: String, step: usize, label: &'static str, percent: f32 },
    Completed { run_id: String, from_template: bool },
    Cancelled { run_id: String },
}

impl RunEvent {
    pub fn run_id(&self) -> &str {
        match self {
            Self::Started { run_id, .. }
            | Self::Progress { run_id, .. }
            | Self::Completed { run_id, .. }
            | Self::Cancelled { run_id } => run_id,
        }
    }

    pub(crate) fn completed(run_id: &str, source: ContentSource) -> Self {
        Self::Completed {
            run_id: run_id.to_string(),
            from_template: source == ContentSource::Template,
        }
    }
}
