//! Local cache of the precomputed artifacts.
//!
//! Each artifact is cached in the data directory under its file name and
//! downloaded only when that file is absent. Downloads stream into a
//! `.part` file that is renamed into place once complete, so an interrupted
//! download is retried on the next start instead of being loaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client as HttpClient;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

/// One artifact: its cache file name and where to fetch it from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub url: Option<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// Fetch-once store rooted at a data directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    data_dir: PathBuf,
    http_client: HttpClient,
}

impl ArtifactStore {
    /// Create a store whose downloads are bounded by `timeout`
    pub fn new(data_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("Building download client")?;
        Ok(Self {
            data_dir: data_dir.into(),
            http_client,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.data_dir.join(&artifact.name)
    }

    /// Make sure every artifact is cached, downloading the missing ones
    pub async fn ensure_all(&self, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            paths.push(self.ensure(artifact).await?);
        }
        Ok(paths)
    }

    /// Return the cached path of an artifact, downloading it first if absent
    #[instrument(skip(self), fields(name = %artifact.name))]
    pub async fn ensure(&self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.path_for(artifact);

        if fs::try_exists(&path)
            .await
            .with_context(|| format!("Checking for {}", path.display()))?
        {
            info!(path = %path.display(), "Artifact already cached");
            return Ok(path);
        }

        let url = artifact.url.as_deref().ok_or_else(|| {
            anyhow!(
                "Artifact {} is missing and no download URL is configured",
                path.display()
            )
        })?;

        info!(url = %url, "Downloading artifact");
        self.download(url, &path)
            .await
            .with_context(|| format!("Downloading {} from {}", artifact.name, url))?;
        info!(path = %path.display(), "Artifact downloaded");

        Ok(path)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Creating {}", self.data_dir.display()))?;

        let mut response = self.http_client.get(url).send().await?.error_for_status()?;

        let partial = partial_path(dest);
        let result = async {
            let mut file = fs::File::create(&partial).await?;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            fs::rename(&partial, dest).await?;
            Ok::<_, anyhow::Error>(())
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&partial).await;
        }
        result
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one fixed HTTP response to every connection
    async fn start_file_server(status: &'static str, body: &'static str) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), handle)
    }

    fn store(dir: &Path) -> ArtifactStore {
        ArtifactStore::new(dir, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_cached_artifact_is_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie_list.dat"), "cached").unwrap();

        // The URL is unroutable; touching it would fail the test
        let artifact = Artifact::new("movie_list.dat", Some("http://127.0.0.1:1/x".to_string()));
        let path = store(dir.path()).ensure(&artifact).await.unwrap();

        assert_eq!(path, dir.path().join("movie_list.dat"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_missing_artifact_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new("similarity.json", None);

        let err = store(dir.path()).ensure(&artifact).await.unwrap_err();
        assert!(err.to_string().contains("no download URL"));
    }

    #[tokio::test]
    async fn test_missing_artifact_is_downloaded() {
        let (base, handle) = start_file_server("200 OK", "[[1.0]]").await;
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested");

        let artifact = Artifact::new("similarity.json", Some(format!("{}/similarity.json", base)));
        let path = store(&data_dir).ensure(&artifact).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[[1.0]]");
        assert!(!partial_path(&path).exists());

        handle.abort();
    }

    #[tokio::test]
    async fn test_failed_download_leaves_nothing_behind() {
        let (base, handle) = start_file_server("404 Not Found", "").await;
        let dir = tempfile::tempdir().unwrap();

        let artifact = Artifact::new("similarity.json", Some(format!("{}/gone", base)));
        let store = store(dir.path());
        assert!(store.ensure(&artifact).await.is_err());

        let path = store.path_for(&artifact);
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());

        handle.abort();
    }

    #[tokio::test]
    async fn test_ensure_all_returns_paths_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "1").unwrap();
        std::fs::write(dir.path().join("b"), "2").unwrap();

        let paths = store(dir.path())
            .ensure_all(&[Artifact::new("a", None), Artifact::new("b", None)])
            .await
            .unwrap();
        assert_eq!(paths, vec![dir.path().join("a"), dir.path().join("b")]);
    }
}
