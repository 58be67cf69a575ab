use crate::foundation::error::PageResult;
use crate::synth::request::GenerationRequest;

/// Failure reported by an image service for one submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("transient service failure: {0}")]
    Transient(String),
}

/// Remote (or fake) text-to-image backend.
///
/// `submit` returns encoded image bytes; an empty vector means the service
/// answered but produced no image. Implementations are called from a worker
/// thread per attempt, so they must be shareable.
pub trait ImageService: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap local check run once before the first submission, e.g. credential presence.
    fn preflight(&self) -> PageResult<()> {
        Ok(())
    }

    fn submit(&self, request: &GenerationRequest) -> Result<Vec<u8>, ServiceError>;
}
