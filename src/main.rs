use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use brandgen::{
    config::{AppCfg, ProviderKind},
    events::RunEvent,
    io::save_export,
    prompts::EnglishVariant,
    Brief, GenerationMode, Orchestrator, Session,
};

#[derive(Parser)]
#[command(name = "brandgen", version, about = "Generate brand blog content from a brief")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a blog post, SEO metadata and images for a brief
    Generate {
        /// Brief as YAML or JSON
        #[arg(long)]
        brief: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        provider: Option<ProviderKind>,
        /// Used for this run only, never written anywhere
        #[arg(long)]
        api_key: Option<String>,
        /// Skip the provider and use template content
        #[arg(long)]
        no_ai: bool,
        /// Override the brief's tone
        #[arg(long)]
        tone: Option<String>,
        /// After the first result, run again with this tone
        #[arg(long)]
        regenerate: Option<String>,
        #[arg(long, value_enum)]
        localize: Option<EnglishVariant>,
        #[arg(long)]
        humanize: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        no_save: bool,
        #[arg(long)]
        quiet: bool,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brandgen=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn spawn_progress(mut rx: broadcast::Receiver<RunEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos:>3}% {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        loop {
            match rx.recv().await {
                Ok(RunEvent::Started { brand, .. }) => {
                    bar.reset();
                    bar.set_message(format!("Creating content for {brand}"));
                }
                Ok(RunEvent::Progress { label, percent, .. }) => {
                    bar.set_position(percent.round() as u64);
                    bar.set_message(label);
                }
                Ok(RunEvent::Completed { from_template, .. }) => {
                    bar.set_position(100);
                    bar.finish_with_message(if from_template {
                        "Done (template content)"
                    } else {
                        "Done"
                    });
                }
                Ok(RunEvent::Cancelled { .. }) => bar.set_message("Cancelled"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let Cmd::Generate {
        brief,
        config,
        provider,
        api_key,
        no_ai,
        tone,
        regenerate,
        localize,
        humanize,
        out_dir,
        no_save,
        quiet,
    } = Cli::parse().cmd;

    let mut cfg = match &config {
        Some(path) => AppCfg::load(path).await?,
        None => AppCfg::default(),
    }
    .apply_env();
    if let Some(kind) = provider {
        cfg.provider.kind = kind;
    }
    if let Some(dir) = out_dir {
        cfg.out_dir = dir;
    }

    let txt = tokio::fs::read_to_string(&brief)
        .await
        .with_context(|| format!("Failed to read brief: {}", brief.display()))?;
    let mut brief: Brief = serde_yaml::from_str(&txt).context("Failed to parse brief")?;
    if let Some(t) = tone {
        brief = brief.with_tone(t);
    }

    let key = cfg.provider.resolve_key(api_key);
    if key.is_none() && !no_ai {
        tracing::warn!(env = cfg.provider.key_env(), "no API key found, using template content");
    }
    let orchestrator = Orchestrator::new(Some(cfg.provider.build(key))).with_timeout(cfg.timeout());
    let mut session = Session::new(Arc::new(orchestrator));
    let mode = if no_ai { GenerationMode::Template } else { GenerationMode::Provider };

    let progress = (!quiet).then(|| spawn_progress(session.subscribe()));

    session.submit(brief, mode)?;
    session.wait_for_content().await.context("run ended without content")?;
    if let Some(t) = regenerate {
        session.regenerate_with_tone(&t)?;
        session.wait_for_content().await.context("regeneration ended without content")?;
    }

    let export = session.export().context("no content to export")?;
    println!("{}", export.text);

    if let Some(variant) = localize {
        match session.localize(variant).await {
            Ok(text) => println!("\n--- {variant} English ---\n{text}"),
            Err(e) => eprintln!("Localization failed: {e}"),
        }
    }
    if humanize {
        match session.humanize().await {
            Ok(text) => println!("\n--- Humanized ---\n{text}"),
            Err(e) => eprintln!("Humanize failed: {e}"),
        }
    }

    if !no_save {
        let path = save_export(&cfg.out_dir, &export).await?;
        eprintln!("Saved {}", path.display());
    }

    drop(session);
    if let Some(handle) = progress {
        let _ = handle.await;
    }
    Ok(())
}
