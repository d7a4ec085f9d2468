//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the parent directory of the document store file exists; warn when
/// the store file itself is missing (a fresh empty one gets created).
pub async fn ensure_store_dir(store_path: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(store_path).await.is_err() {
        warn!(%store_path, "document store file not found; starting with an empty store");
    }
    if let Some(parent) = std::path::Path::new(store_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
