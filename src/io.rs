use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

use crate::session::Export;

/// Writes the export next to its siblings in `out_dir`, via a temp file and
/// rename so a reader never sees a half-written document.
pub async fn save_export(out_dir: &Path, export: &Export) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let path = out_dir.join(&export.filename);
    let tmp = out_dir.join(format!("{}.tmp", export.filename));
    {
        let mut f = fs::File::create(&tmp).await?;
        f.write_all(export.text.as_bytes()).await?;
        f.write_all(b"\n").await?;
        let _ = f.sync_all().await; // best-effort
    }
    fs::rename(&tmp, &path).await?;
    tracing::info!(path = %path.display(), bytes = export.text.len(), "export written");
    Ok(path)
}
