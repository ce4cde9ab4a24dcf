use thiserror::Error;

/// Errors raised while validating parameters, rendering or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid color `{0}`: expected six hex digits")]
    InvalidColor(String),
    #[error("render was superseded by a newer request")]
    Superseded,
    #[error("failed to export image: {0}")]
    Export(#[from] image::ImageError),
}

impl RenderError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
