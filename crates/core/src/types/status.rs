//! Decision and filter enums for admin review flows.

use serde::{Deserialize, Serialize};

/// Outcome of a document verification review.
///
/// Serialized as the `status` field of the review request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    #[default]
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Wire value used by the review endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Revenue source filter for profit analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitSource {
    /// Core marketplace services.
    Utama,
    /// E-commerce product sales.
    Ecommerce,
}

impl ProfitSource {
    /// Wire value used in the `source_type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utama => "utama",
            Self::Ecommerce => "ecommerce",
        }
    }
}

impl std::str::FromStr for ProfitSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utama" => Ok(Self::Utama),
            "ecommerce" => Ok(Self::Ecommerce),
            other => Err(format!(
                "invalid profit source: {other}. Valid sources: utama, ecommerce"
            )),
        }
    }
}
