//! Contract of the external flip-animation widget.

/// Navigation operations a constructed widget supports.
///
/// Captured once when the widget is built instead of probing on every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavCapabilities {
    pub flip_forward: bool,
    pub flip_back: bool,
}

impl NavCapabilities {
    #[must_use]
    pub fn all() -> Self {
        Self {
            flip_forward: true,
            flip_back: true,
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// A constructed flip widget.
///
/// `flip_forward`/`flip_back` are only called when the matching capability is set.
pub trait FlipWidget {
    fn capabilities(&self) -> NavCapabilities;

    /// Advance one spread (or page in single layout).
    fn flip_forward(&self);

    /// Go back one spread (or page in single layout).
    fn flip_back(&self);
}
