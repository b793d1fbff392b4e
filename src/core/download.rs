//! Saving remote media (posters, gallery photos) to disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::api::{ApiError, FestApi};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download failed: {0}")]
    Api(#[from] ApiError),

    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch `url` and write it to `dir/file_name`, creating `dir` if needed.
/// Returns the written path.
pub async fn save_media(
    api: &dyn FestApi,
    url: &str,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, DownloadError> {
    let bytes = api.download(url.to_string()).await?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| DownloadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(file_name);
    if let Err(source) = tokio::fs::write(&path, &bytes).await {
        return Err(DownloadError::Io { path, source });
    }

    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::MockFestApi;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_save_media_writes_file() {
        let mut api = MockFestApi::new();
        api.expect_download()
            .with(eq("http://x/media/p.png".to_string()))
            .returning(|_| Ok(vec![0x89, b'P', b'N', b'G']));

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("posters");
        let path = save_media(&api, "http://x/media/p.png", &target, "result-poster-a.png")
            .await
            .unwrap();

        assert_eq!(path, target.join("result-poster-a.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_failed_fetch_writes_nothing() {
        let mut api = MockFestApi::new();
        api.expect_download().returning(|_| {
            Err(ApiError::Status {
                status: 404,
                body: String::new(),
            })
        });

        let dir = tempfile::tempdir().unwrap();
        let err = save_media(&api, "http://x/missing.png", dir.path(), "a.png")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Api(_)));
        assert!(!dir.path().join("a.png").exists());
    }
}
