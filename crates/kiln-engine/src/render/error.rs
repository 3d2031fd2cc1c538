use thiserror::Error;

/// Why a frame buffer cannot be rendered to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameBufferError {
    #[error("frame buffer has incomplete attachment")]
    IncompleteAttachment,

    #[error("frame buffer has incomplete dimensions")]
    IncompleteDimensions,

    #[error("frame buffer has missing attachment")]
    MissingAttachment,

    #[error("frame buffer configuration is unsupported")]
    Unsupported,

    #[error("no frame buffer bound")]
    NotBound,
}
