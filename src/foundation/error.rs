pub type PageResult<T> = Result<T, PageError>;

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("assembly error on page {ordinal}: {reason}")]
    Assembly { ordinal: usize, reason: String },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("run cancelled after {completed} completed page(s)")]
    Cancelled { completed: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn assembly(ordinal: usize, reason: impl Into<String>) -> Self {
        Self::Assembly {
            ordinal,
            reason: reason.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// True for failures that must stop the run before any page work starts.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
