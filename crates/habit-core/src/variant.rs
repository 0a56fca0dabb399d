//! The three fixed generation strategies and their static profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three generation strategies, always processed in
/// [`Variant::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Simple and direct.
    V1,
    /// The same goal approached from a different angle.
    V2,
    /// Creative and flexible, offering alternative routes.
    V3,
}

/// Static description of a variant: how it is prompted and what its
/// fallback defaults are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantProfile {
    /// Short tone name (e.g. `simple`).
    pub tone: &'static str,
    /// One-line style instruction embedded in the prompt.
    pub prompt_style: &'static str,
    /// Fallback `Schedule` value.
    pub schedule: &'static str,
    /// Fallback `Success criteria` value.
    pub success_criteria: &'static str,
}

const V1_PROFILE: VariantProfile = VariantProfile {
    tone: "simple",
    prompt_style: "Style: keep it simple and direct, one clear action the person can start right away.",
    schedule: "Every morning at 7 AM",
    success_criteria: "Maintain this habit for 30 consecutive days",
};

const V2_PROFILE: VariantProfile = VariantProfile {
    tone: "alternative",
    prompt_style: "Style: approach the goal from a different perspective than the obvious plan.",
    schedule: "Every evening at 6 PM",
    success_criteria: "Maintain this habit for 21 days with 80% consistency",
};

const V3_PROFILE: VariantProfile = VariantProfile {
    tone: "creative",
    prompt_style: "Style: be creative and flexible, and offer alternative ways to reach the same goal.",
    schedule: "3 times per week with flexible timing",
    success_criteria: "Maintain this habit for 6 weeks with flexible scheduling",
};

impl Variant {
    /// Every variant, in output order.
    pub const ALL: [Variant; 3] = [Variant::V1, Variant::V2, Variant::V3];

    /// Static profile for this variant.
    pub fn profile(self) -> &'static VariantProfile {
        match self {
            Self::V1 => &V1_PROFILE,
            Self::V2 => &V2_PROFILE,
            Self::V3 => &V3_PROFILE,
        }
    }

    /// Zero-based slot in the output triple.
    pub fn index(self) -> usize {
        match self {
            Self::V1 => 0,
            Self::V2 => 1,
            Self::V3 => 2,
        }
    }

    /// Inverse of [`Variant::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
        };
        f.write_str(s)
    }
}

impl FromStr for Variant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "simple" => Ok(Self::V1),
            "v2" | "alternative" => Ok(Self::V2),
            "v3" | "creative" => Ok(Self::V3),
            _ => Err(VariantParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Variant`] string.
#[derive(Debug, Clone)]
pub struct VariantParseError(pub String);

impl fmt::Display for VariantParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid variant: {:?} (expected v1, v2, or v3)", self.0)
    }
}

impl std::error::Error for VariantParseError {}
