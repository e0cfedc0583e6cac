//! Presentation settings that change how geometry is computed.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Canvas projection. Selects the lattice used for snapping and the edge router.
///
/// Parsing with [`FromStr`] rejects unknown names; deserialization coerces
/// them to [`ViewMode::Cartesian`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewMode {
    /// Square grid, orthogonal connectors
    #[default]
    Cartesian,
    /// Diamond grid, slope connectors
    Isometric,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" | "2d" => Ok(Self::Cartesian),
            "isometric" | "iso" | "3d" => Ok(Self::Isometric),
            other => Err(format!("Unknown view mode '{other}'")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cartesian => f.write_str("cartesian"),
            Self::Isometric => f.write_str("isometric"),
        }
    }
}

impl From<String> for ViewMode {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<ViewMode> for String {
    fn from(value: ViewMode) -> Self {
        value.to_string()
    }
}

/// Direction in which tiers are packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    TopToBottom,
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left-to-right" | "lr" => Ok(Self::LeftToRight),
            "top-to-bottom" | "tb" => Ok(Self::TopToBottom),
            other => Err(format!("Unknown layout direction '{other}'")),
        }
    }
}
