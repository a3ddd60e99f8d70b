//! PNG summary artifact for Orbis.
//!
//! [`PngSummary`] implements [`SummaryArtifact`]: it renders the summary with
//! an embedded bitmap font and writes it to a fixed path. The HTTP layer
//! serves that file back with [`load`].

mod error;
pub mod font;
pub mod format;
pub mod render;

use std::{
  io::Write as _,
  path::{Path, PathBuf},
};

use orbis_core::summary::{Summary, SummaryArtifact};
use tracing::info;

pub use error::{Error, Result};
pub use format::format_gdp;
pub use render::render;

/// Renders summaries to a PNG file at a fixed path.
#[derive(Debug, Clone)]
pub struct PngSummary {
  path: PathBuf,
}

impl PngSummary {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl SummaryArtifact for PngSummary {
  type Error = Error;

  async fn generate(&self, summary: &Summary) -> Result<()> {
    let bytes = render(summary)?;
    persist(&bytes, &self.path).await?;
    info!(path = %self.path.display(), bytes = bytes.len(), "summary image written");
    Ok(())
  }
}

/// Write `bytes` to `path`, creating parent directories as needed.
///
/// Each call writes its own uniquely named temp file in the target directory
/// and renames it into place. Concurrent writers never share a temp file, and
/// a reader sees one complete image or another.
pub async fn persist(bytes: &[u8], path: &Path) -> Result<()> {
  let dir = match path.parent() {
    Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
    _ => PathBuf::from("."),
  };
  tokio::fs::create_dir_all(&dir).await?;

  let bytes = bytes.to_vec();
  let path = path.to_path_buf();
  tokio::task::spawn_blocking(move || -> Result<()> {
    let mut tmp = tempfile::Builder::new()
      .prefix(".summary-")
      .suffix(".png.tmp")
      .tempfile_in(&dir)?;
    tmp.write_all(&bytes)?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
  })
  .await?
}

pub async fn exists(path: &Path) -> bool {
  tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Read the image at `path`, or `None` if it has never been generated.
pub async fn load(path: &Path) -> Result<Option<Vec<u8>>> {
  match tokio::fs::read(path).await {
    Ok(bytes) => Ok(Some(bytes)),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use orbis_core::summary::GdpRank;

  use super::*;

  fn summary() -> Summary {
    Summary {
      total_countries:   2,
      top_by_gdp:        vec![
        GdpRank { name: "Canada".into(), estimated_gdp: 3.1e12 },
        GdpRank { name: "Côte d'Ivoire".into(), estimated_gdp: 8.4e10 },
      ],
      last_refreshed_at: Utc::now(),
    }
  }

  #[tokio::test]
  async fn generate_writes_png_into_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("summary.png");
    let artifact = PngSummary::new(&path);

    assert!(!exists(&path).await);
    artifact.generate(&summary()).await.unwrap();
    assert!(exists(&path).await);

    let bytes = load(&path).await.unwrap().unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    assert_eq!(entries(path.parent().unwrap()), ["summary.png"]);
  }

  fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  #[tokio::test]
  async fn load_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load(&dir.path().join("nope.png")).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn persist_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.png");

    persist(b"first", &path).await.unwrap();
    persist(b"second", &path).await.unwrap();
    assert_eq!(load(&path).await.unwrap().unwrap(), b"second");
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_writers_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.png");

    for _ in 0..10 {
      let mut writers = tokio::task::JoinSet::new();
      for _ in 0..8 {
        let artifact = PngSummary::new(&path);
        writers.spawn(async move { artifact.generate(&summary()).await });
      }
      while let Some(result) = writers.join_next().await {
        result.unwrap().unwrap();
      }
    }

    let bytes = load(&path).await.unwrap().unwrap();
    assert!(image::load_from_memory(&bytes).is_ok());
    assert_eq!(entries(dir.path()), ["summary.png"]);
  }

  #[tokio::test]
  async fn unwritable_destination_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    tokio::fs::write(&blocker, b"x").await.unwrap();

    let artifact = PngSummary::new(blocker.join("summary.png"));
    assert!(artifact.generate(&summary()).await.is_err());
  }
}
