use thiserror::Error;

/// Everything that can go wrong while configuring, persisting, or running a
/// network. Shape mismatches between matrices are deliberately *not* here:
/// those are invariant violations (programmer errors) and panic instead.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network has not been built; call build() before predict/train/save")]
    NotBuilt,

    #[error("a network needs at least two layer sizes, got {0}")]
    TooFewLayers(usize),

    #[error("not a model file: bad magic tag (expected \"NNB1\")")]
    BadMagic,

    #[error("unsupported model format version {0}")]
    UnsupportedVersion(u32),

    #[error("model file ended unexpectedly")]
    Truncated,

    #[error("malformed model file: {0}")]
    MalformedModel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
