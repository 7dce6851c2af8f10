use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::api_client::ApiClient;

/// Downloads a generated asset (image or PDF) into `dir`, keeping the server's file name.
pub async fn save_asset(client: &ApiClient, path: &str, dir: &Path) -> Result<PathBuf> {
    let url = client.asset_url(path)?;
    let file_name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(sanitize_file_name)
        .filter(|name| !name.is_empty())
        .with_context(|| format!("Cannot derive a file name from '{path}'"))?;

    let bytes = client.download(path).await?;

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let target = dir.join(file_name);
    tokio::fs::write(&target, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;

    info!("Saved {} bytes to {}", bytes.len(), target.display());
    Ok(target)
}

/// Strips path separators, NUL bytes and parent references from a server-supplied name.
fn sanitize_file_name(raw: &str) -> String {
    raw.replace(['/', '\\', '\0'], "").replace("..", "")
}
