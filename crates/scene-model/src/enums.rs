//! Closed vocabularies used on scene records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interior/exterior classification taken from the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "INT")]
    Interior,
    #[serde(rename = "EXT")]
    Exterior,
    #[serde(rename = "INT/EXT")]
    InteriorExterior,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interior => "INT",
            Self::Exterior => "EXT",
            Self::InteriorExterior => "INT/EXT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical temporal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOfDay {
    Morning,
    Day,
    Afternoon,
    Evening,
    Dusk,
    Dawn,
    Night,
    Continuous,
    Later,
    SameAsPrevious,
    Unknown,
}

impl TimeOfDay {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "MORNING",
            Self::Day => "DAY",
            Self::Afternoon => "AFTERNOON",
            Self::Evening => "EVENING",
            Self::Dusk => "DUSK",
            Self::Dawn => "DAWN",
            Self::Night => "NIGHT",
            Self::Continuous => "CONTINUOUS",
            Self::Later => "LATER",
            Self::SameAsPrevious => "SAME_AS_PREVIOUS",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Markers that take their value from the preceding scene.
    pub fn inherits_previous(self) -> bool {
        matches!(self, Self::Continuous | Self::SameAsPrevious)
    }

    /// Parse a canonical name (as produced by [`TimeOfDay::as_str`]).
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_uppercase();
        let parsed = match upper.as_str() {
            "MORNING" => Self::Morning,
            "DAY" => Self::Day,
            "AFTERNOON" => Self::Afternoon,
            "EVENING" => Self::Evening,
            "DUSK" => Self::Dusk,
            "DAWN" => Self::Dawn,
            "NIGHT" => Self::Night,
            "CONTINUOUS" => Self::Continuous,
            "LATER" => Self::Later,
            "SAME_AS_PREVIOUS" | "SAME" => Self::SameAsPrevious,
            "UNKNOWN" => Self::Unknown,
            _ => return None,
        };
        Some(parsed)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which method produced the start page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    ExactTextMatch,
    LayoutMatch,
    ProviderEstimate,
    OrderFallback,
}

impl PositionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactTextMatch => "exact_text_match",
            Self::LayoutMatch => "layout_match",
            Self::ProviderEstimate => "provider_estimate",
            Self::OrderFallback => "order_fallback",
        }
    }
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which method produced the page length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthSource {
    Layout,
    CharacterDensity,
}

impl LengthSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::CharacterDensity => "character_density",
        }
    }
}

impl fmt::Display for LengthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
