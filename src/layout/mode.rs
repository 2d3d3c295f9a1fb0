//! Single vs double page layout resolution.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Requested layout mode from the viewer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Pick single or double from the container width.
    #[default]
    Auto,
    Single,
    Double,
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            other => Err(format!("unknown layout '{other}'")),
        }
    }
}

/// The layout actually in effect for a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveLayout {
    Single,
    Double,
}

impl fmt::Display for EffectiveLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Double => "double",
        })
    }
}

/// Resolve the effective layout for a container.
///
/// Explicit modes pass through. `Auto` is double from `breakpoint` upward
/// (inclusive) and single below it.
#[must_use]
pub fn resolve_layout(mode: LayoutMode, container_width: f64, breakpoint: u32) -> EffectiveLayout {
    match mode {
        LayoutMode::Single => EffectiveLayout::Single,
        LayoutMode::Double => EffectiveLayout::Double,
        LayoutMode::Auto => {
            if container_width >= f64::from(breakpoint) {
                EffectiveLayout::Double
            } else {
                EffectiveLayout::Single
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_breakpoint_is_inclusive() {
        assert_eq!(
            resolve_layout(LayoutMode::Auto, 768.0, 768),
            EffectiveLayout::Double
        );
        assert_eq!(
            resolve_layout(LayoutMode::Auto, 767.0, 768),
            EffectiveLayout::Single
        );
        assert_eq!(
            resolve_layout(LayoutMode::Auto, 800.0, 768),
            EffectiveLayout::Double
        );
    }

    #[test]
    fn test_explicit_modes_ignore_width() {
        assert_eq!(
            resolve_layout(LayoutMode::Single, 4000.0, 768),
            EffectiveLayout::Single
        );
        assert_eq!(
            resolve_layout(LayoutMode::Double, 10.0, 768),
            EffectiveLayout::Double
        );
    }

    #[test]
    fn test_zero_breakpoint_is_always_double() {
        assert_eq!(
            resolve_layout(LayoutMode::Auto, 0.0, 0),
            EffectiveLayout::Double
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("double".parse::<LayoutMode>(), Ok(LayoutMode::Double));
        assert!("triple".parse::<LayoutMode>().is_err());
    }
}
