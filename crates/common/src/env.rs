//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// `frontend_dir` is optional (static assets), every entry of `writable_dirs`
/// is created when missing.
pub async fn ensure_env(frontend_dir: &str, writable_dirs: &[&str]) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    for dir in writable_dirs {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_missing_writable_dirs() {
        let base = std::env::temp_dir().join(format!("dealership-env-{}", std::process::id()));
        let uploads = base.join("uploads");
        let uploads_str = uploads.to_string_lossy().to_string();
        ensure_env("/definitely/not/here", &[uploads_str.as_str()]).await.unwrap();
        assert!(uploads.is_dir());
        let _ = std::fs::remove_dir_all(&base);
    }
}
