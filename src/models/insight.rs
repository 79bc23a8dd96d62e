//! Insight domain types
//!
//! The kinds of AI-generated commentary the service produces and the value
//! shapes they are cached as.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// == Insight Kind ==
/// Which piece of commentary is requested. Doubles as the cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Profile-to-college fit, 0 to 100
    FitScore,
    /// Return on investment multiple
    Roi,
    /// Expected starting salary, as a display string
    Salary,
    /// Unique selling points
    Usps,
}

impl InsightKind {
    pub const ALL: [InsightKind; 4] = [
        InsightKind::FitScore,
        InsightKind::Roi,
        InsightKind::Salary,
        InsightKind::Usps,
    ];

    pub fn namespace(self) -> &'static str {
        match self {
            InsightKind::FitScore => "fitscore",
            InsightKind::Roi => "roi",
            InsightKind::Salary => "salary",
            InsightKind::Usps => "usps",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InsightKind::ALL
            .into_iter()
            .find(|kind| kind.namespace() == s)
            .ok_or_else(|| {
                format!(
                    "unknown insight kind '{}', expected one of fitscore, roi, salary, usps",
                    s
                )
            })
    }
}

// == Insight ==
/// A cached insight value. Serialized as the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insight {
    Score(u8),
    Ratio(f64),
    Text(String),
    List(Vec<String>),
}
