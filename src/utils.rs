use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "will_it_rain";

/// `<system cache dir>/will_it_rain/raw`, or `None` where the platform has no cache directory.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join(CACHE_DIR_NAME).join("raw"))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        ensure_cache_dir_exists(&target).await.unwrap();
        assert!(target.is_dir());
        // Idempotent.
        ensure_cache_dir_exists(&target).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_file_in_the_way() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_cache_dir_exists(file.path()).await.is_err());
    }
}
