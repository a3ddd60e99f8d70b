//! Error type for `orbis-summary`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("image encode error: {0}")]
  Image(#[from] image::ImageError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("writer task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
