//! The crate-wide error enum and its conversions.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Error type returned by every fallible operation in the crate.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context setup failed (adapter, device, or surface).
    Gpu(RenderContextError),
    /// Character asset could not be loaded or understood.
    AssetLoad(String),
    /// Backdrop image bytes did not decode.
    ImageDecode(String),
    /// Underlying filesystem or stream failure.
    Io(std::io::Error),
    /// Preset TOML could not be parsed or rendered.
    OptionsParse(String),
    /// Window creation or event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::AssetLoad(msg) => write!(f, "asset load error: {msg}"),
            Self::ImageDecode(msg) => write!(f, "image decode error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ViewerError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<gltf::Error> for ViewerError {
    fn from(e: gltf::Error) -> Self {
        Self::AssetLoad(e.to_string())
    }
}

impl From<image::ImageError> for ViewerError {
    fn from(e: image::ImageError) -> Self {
        Self::ImageDecode(e.to_string())
    }
}
