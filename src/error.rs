//! Structured error types for flipview.
//!
//! Every failure is scoped to the viewer session that produced it. The
//! `Display` text of the session-fatal variants doubles as the message shown
//! inside the broken container.

/// All errors that can occur while configuring, loading and rendering a flipbook.
#[derive(Debug, thiserror::Error)]
pub enum FlipviewError {
    /// The container's configuration payload is missing, malformed or invalid.
    #[error("Error reading viewer configuration: {0}")]
    Config(String),

    /// Document fetch or parse failure. Fatal to one viewer session.
    #[error("Error loading PDF: {0}")]
    Load(String),

    /// Rendering a single page failed. Other pages and the document stay usable.
    #[error("Error rendering page {page}: {message}")]
    Render { page: u32, message: String },

    /// The flip widget could not be constructed. Fatal to one viewer session.
    #[error("Error initializing viewer: {0}")]
    Init(String),

    /// The container was torn down while its initialization was in flight.
    #[error("Initialization cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlipviewError>;

impl FlipviewError {
    /// Whether this error should be surfaced inside the viewer's container.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl From<serde_json::Error> for FlipviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<FlipviewError> for wasm_bindgen::JsValue {
    fn from(e: FlipviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            FlipviewError::Load("404".to_string()).to_string(),
            "Error loading PDF: 404"
        );
        assert_eq!(
            FlipviewError::Init("no widget".to_string()).to_string(),
            "Error initializing viewer: no widget"
        );
        assert_eq!(
            FlipviewError::Render {
                page: 3,
                message: "bad stream".to_string()
            }
            .to_string(),
            "Error rendering page 3: bad stream"
        );
    }

    #[test]
    fn test_cancelled_is_silent() {
        assert!(!FlipviewError::Cancelled.is_user_visible());
        assert!(FlipviewError::Config("x".to_string()).is_user_visible());
    }

    #[test]
    fn test_json_errors_become_config_errors() {
        let err = serde_json::from_str::<u32>("nope").map_err(FlipviewError::from);
        assert!(matches!(err, Err(FlipviewError::Config(_))));
    }
}
