//! Brand content briefs in, blog posts with SEO metadata and images out.
//!
//! [`orchestrator::Orchestrator`] drives a [`providers::ContentProvider`]
//! and falls back to [`templates::generate`] whenever the provider path
//! fails, so a run always produces content.

pub mod brief;
pub mod claude;
pub mod config;
pub mod content;
pub mod deepseek;
pub mod events;
pub mod io;
pub mod orchestrator;
pub mod progress;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod templates;

pub use brief::Brief;
pub use content::GeneratedContent;
pub use orchestrator::{ContentSource, GenerationMode, Orchestrator};
pub use providers::{ContentProvider, ProviderError};
pub use session::Session;
