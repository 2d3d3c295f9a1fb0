//! flipview - PDF flipbooks for the web
//!
//! Embeds PDF documents as animated flipbooks inside ordinary web pages via
//! WebAssembly:
//! - Pages rasterized once by PDF.js and cached per document
//! - Traditional (cover alone) or spread book layouts
//! - Single or double page layout that follows the container width
//! - Keyboard navigation routed to the one focused flipbook
//! - Any number of independent flipbooks per page
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { Flipbooks } from 'flipview';
//! await init();
//! const flipbooks = new Flipbooks({ pluginUrl: '/wp-content/plugins/bws-pdf-viewer/' });
//! flipbooks.run();
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod logger;
pub mod orchestrator;
pub mod platform;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::{InitOptions, SizeSpec, ViewMode, ViewerConfig};
pub use error::{FlipviewError, Result};
pub use orchestrator::Orchestrator;

#[cfg(target_arch = "wasm32")]
pub use web::Flipbooks;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
