//! Viewer configuration payloads.
//!
//! Each flipbook container carries a JSON `data-config` record produced by the
//! server-side shortcode. It is parsed once into an immutable [`ViewerConfig`];
//! layout changes never mutate it.
//!
//! Page-wide settings (worker location, container selector, log level) arrive
//! separately as [`InitOptions`].

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

use crate::error::{FlipviewError, Result};
use crate::layout::{to_px, BookLayout, LayoutMode};

/// CSS selector used to discover flipbook containers.
pub const DEFAULT_CONTAINER_SELECTOR: &str = ".bws-pdf-viewer-container";

/// Default page and box color.
pub const DEFAULT_COLOR: &str = "#353535";

/// Default container-width breakpoint for automatic layout switching.
pub const DEFAULT_BREAKPOINT: u32 = 768;

/// Location of the PDF.js worker relative to the plugin root.
const WORKER_PATH: &str = "dist/pdf.worker.js";

/// A width or height specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// `100%`: follow the container's measured size.
    Fill,
    /// `auto`: let the viewer decide.
    Auto,
    /// A fixed pixel length.
    Pixels(u32),
}

impl FromStr for SizeSpec {
    type Err = String;

    /// Parses `100%`, `auto`, or a length whose leading digits are the pixel
    /// count (`"640"`, `"640px"`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "100%" => return Ok(Self::Fill),
            "auto" => return Ok(Self::Auto),
            _ => {}
        }
        let end = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        s.get(..end)
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse().ok())
            .map(Self::Pixels)
            .ok_or_else(|| format!("invalid size '{s}'"))
    }
}

impl<'de> Deserialize<'de> for SizeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSize {
            Text(String),
            Number(f64),
        }

        match RawSize::deserialize(deserializer)? {
            RawSize::Text(text) => text.parse().map_err(de::Error::custom),
            RawSize::Number(px) => Ok(Self::Pixels(to_px(px))),
        }
    }
}

/// Whether the document is shown as a flipbook or one page at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Flipbook,
    SinglePage,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flipbook" => Ok(Self::Flipbook),
            "singlepage" => Ok(Self::SinglePage),
            other => Err(format!("unknown view mode '{other}'")),
        }
    }
}

/// Per-container viewer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Absolute URL of the PDF document.
    pub pdf: String,
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub background_color: String,
    pub box_color: String,
    pub box_border: u32,
    pub margin: f64,
    pub margin_top: Option<f64>,
    pub margin_left: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub layout: LayoutMode,
    #[serde(deserialize_with = "or_default")]
    pub book_layout: BookLayout,
    #[serde(deserialize_with = "or_default")]
    pub view_mode: ViewMode,
    /// Container width (px) at which `auto` layout switches to double pages.
    pub breakpoint: u32,
    pub enable_animations: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pdf: String::new(),
            width: SizeSpec::Fill,
            height: SizeSpec::Auto,
            background_color: DEFAULT_COLOR.to_string(),
            box_color: DEFAULT_COLOR.to_string(),
            box_border: 0,
            margin: 1.0,
            margin_top: None,
            margin_left: None,
            layout: LayoutMode::default(),
            book_layout: BookLayout::default(),
            view_mode: ViewMode::default(),
            breakpoint: DEFAULT_BREAKPOINT,
            enable_animations: true,
        }
    }
}

impl ViewerConfig {
    /// Default configuration for the given document URL.
    pub fn for_document(pdf: impl Into<String>) -> Self {
        Self {
            pdf: pdf.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a container's JSON payload.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Config`] if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    ///
    /// # Errors
    /// Returns [`FlipviewError::Config`] for an empty document URL or a
    /// negative/non-finite margin.
    pub fn validate(&self) -> Result<()> {
        if self.pdf.trim().is_empty() {
            return Err(FlipviewError::Config("No PDF URL specified.".to_string()));
        }
        let margins = [
            ("margin", Some(self.margin)),
            ("marginTop", self.margin_top),
            ("marginLeft", self.margin_left),
        ];
        for (name, value) in margins {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(FlipviewError::Config(format!(
                        "{name} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Derived from the view mode; never read from the payload.
    #[must_use]
    pub fn singlepage(&self) -> bool {
        self.view_mode == ViewMode::SinglePage
    }

    #[must_use]
    pub fn traditional_layout(&self) -> bool {
        self.book_layout == BookLayout::Traditional
    }
}

/// Unknown enum values fall back to the default instead of rejecting the payload.
fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String> + Default,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|err| {
        log::warn!("{err}, using default");
        T::default()
    }))
}

/// Page-wide initialization options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitOptions {
    /// Base URL of the plugin, used to locate the PDF.js worker.
    pub plugin_url: Option<String>,
    /// Explicit PDF.js worker URL; wins over `plugin_url`.
    pub worker_src: Option<String>,
    pub container_selector: Option<String>,
    pub log_level: Option<String>,
}

impl InitOptions {
    /// URL of the PDF.js worker script, if one can be determined.
    #[must_use]
    pub fn worker_src(&self) -> Option<String> {
        if let Some(src) = &self.worker_src {
            return Some(src.clone());
        }
        let base = self.plugin_url.as_deref()?;
        if base.ends_with('/') {
            Some(format!("{base}{WORKER_PATH}"))
        } else {
            Some(format!("{base}/{WORKER_PATH}"))
        }
    }

    #[must_use]
    pub fn container_selector(&self) -> &str {
        self.container_selector
            .as_deref()
            .unwrap_or(DEFAULT_CONTAINER_SELECTOR)
    }

    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcode_payload() {
        let raw = r##"{
            "pdf": "https://example.com/wp-content/uploads/brochure.pdf",
            "width": "100%",
            "height": "auto",
            "backgroundColor": "#ffffff",
            "boxColor": "#353535",
            "boxBorder": 2,
            "margin": 1.5,
            "marginTop": null,
            "marginLeft": 4,
            "layout": "double",
            "bookLayout": "spread",
            "viewMode": "singlepage",
            "breakpoint": 900,
            "enableAnimations": false,
            "singlepage": false
        }"##;
        let config = ViewerConfig::from_json(raw).unwrap();
        assert_eq!(config.width, SizeSpec::Fill);
        assert_eq!(config.height, SizeSpec::Auto);
        assert_eq!(config.background_color, "#ffffff");
        assert_eq!(config.box_border, 2);
        assert_eq!(config.margin_top, None);
        assert_eq!(config.margin_left, Some(4.0));
        assert_eq!(config.layout, LayoutMode::Double);
        assert_eq!(config.book_layout, BookLayout::Spread);
        assert_eq!(config.breakpoint, 900);
        assert!(!config.enable_animations);
        // derived from viewMode, the payload flag is ignored
        assert!(config.singlepage());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ViewerConfig::from_json(r#"{"pdf": "https://example.com/a.pdf"}"#).unwrap();
        assert_eq!(config, ViewerConfig::for_document("https://example.com/a.pdf"));
        assert_eq!(config.breakpoint, DEFAULT_BREAKPOINT);
        assert!(config.enable_animations);
        assert!(config.traditional_layout());
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let config = ViewerConfig::from_json(
            r#"{"pdf": "a.pdf", "layout": "triple", "bookLayout": "magazine", "viewMode": "scroll"}"#,
        )
        .unwrap();
        assert_eq!(config.layout, LayoutMode::Auto);
        assert_eq!(config.book_layout, BookLayout::Traditional);
        assert_eq!(config.view_mode, ViewMode::Flipbook);
    }

    #[test]
    fn test_missing_pdf_is_rejected() {
        let err = ViewerConfig::from_json(r#"{"pdf": "  "}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error reading viewer configuration: No PDF URL specified."
        );
        assert!(ViewerConfig::from_json("{}").is_err());
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let result = ViewerConfig::from_json(r#"{"pdf": "a.pdf", "marginTop": -1}"#);
        assert!(matches!(result, Err(FlipviewError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ViewerConfig::from_json("{pdf:"),
            Err(FlipviewError::Config(_))
        ));
    }

    #[test]
    fn test_size_spec_parsing() {
        assert_eq!("100%".parse::<SizeSpec>(), Ok(SizeSpec::Fill));
        assert_eq!("auto".parse::<SizeSpec>(), Ok(SizeSpec::Auto));
        assert_eq!("640".parse::<SizeSpec>(), Ok(SizeSpec::Pixels(640)));
        assert_eq!("640px".parse::<SizeSpec>(), Ok(SizeSpec::Pixels(640)));
        assert_eq!(" 480 ".parse::<SizeSpec>(), Ok(SizeSpec::Pixels(480)));
        assert!("wide".parse::<SizeSpec>().is_err());
        assert!("-20".parse::<SizeSpec>().is_err());
    }

    #[test]
    fn test_size_spec_accepts_numbers() {
        let config = ViewerConfig::from_json(r#"{"pdf": "a.pdf", "width": 720, "height": "540px"}"#)
            .unwrap();
        assert_eq!(config.width, SizeSpec::Pixels(720));
        assert_eq!(config.height, SizeSpec::Pixels(540));
    }

    #[test]
    fn test_worker_src_from_plugin_url() {
        let options: InitOptions = serde_json::from_str(
            r#"{"pluginUrl": "https://example.com/wp-content/plugins/bws-pdf-viewer/", "ajaxUrl": "x"}"#,
        )
        .unwrap();
        assert_eq!(
            options.worker_src().as_deref(),
            Some("https://example.com/wp-content/plugins/bws-pdf-viewer/dist/pdf.worker.js")
        );
        assert_eq!(options.container_selector(), DEFAULT_CONTAINER_SELECTOR);
        assert_eq!(options.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_explicit_worker_src_wins() {
        let options = InitOptions {
            plugin_url: Some("https://example.com/plugin".to_string()),
            worker_src: Some("/pdf.worker.min.js".to_string()),
            container_selector: Some(".flipbook-viewer-container".to_string()),
            log_level: Some("debug".to_string()),
        };
        assert_eq!(options.worker_src().as_deref(), Some("/pdf.worker.min.js"));
        assert_eq!(options.container_selector(), ".flipbook-viewer-container");
        assert_eq!(options.log_level(), log::LevelFilter::Debug);
        assert_eq!(InitOptions::default().worker_src(), None);
    }
}
