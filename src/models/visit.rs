use serde::Serialize;
use std::str::FromStr;

use super::listing::ParseEnumError;

/// Label reported for visits whose grouping column was never classified.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Column a visit aggregation groups by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitDimension {
    #[default]
    Device,
    Platform,
    Browser,
    Path,
}

impl VisitDimension {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Platform => "platform",
            Self::Browser => "browser",
            Self::Path => "path",
        }
    }
}

impl FromStr for VisitDimension {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(Self::Device),
            "platform" => Ok(Self::Platform),
            "browser" => Ok(Self::Browser),
            "path" => Ok(Self::Path),
            _ => Err(ParseEnumError {
                field: "groupBy",
                value: s.to_string(),
            }),
        }
    }
}

/// One page view to record. Timestamp and id are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub path: String,
    pub device_type: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    pub user_id: Option<i32>,
    pub session_id: String,
}

/// One row of an aggregation result: a distinct dimension value and how many
/// visits carried it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DimensionCount {
    pub label: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(
            "device".parse::<VisitDimension>().unwrap(),
            VisitDimension::Device
        );
        assert_eq!(
            "path".parse::<VisitDimension>().unwrap(),
            VisitDimension::Path
        );
        assert_eq!(VisitDimension::default(), VisitDimension::Device);
        assert!("country".parse::<VisitDimension>().is_err());
    }
}
