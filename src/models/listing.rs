use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a wire string does not name a known variant.
#[derive(Debug, Error)]
#[error("invalid {field}: {value:?}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Adult,
    Kids,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Kids => "Kids",
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Adult" => Ok(Self::Adult),
            "Kids" => Ok(Self::Kids),
            _ => Err(ParseEnumError::new("category", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Fair,
    Good,
    #[serde(rename = "Like New")]
    LikeNew,
}

impl Condition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::LikeNew => "Like New",
        }
    }
}

impl FromStr for Condition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fair" => Ok(Self::Fair),
            "Good" => Ok(Self::Good),
            "Like New" => Ok(Self::LikeNew),
            _ => Err(ParseEnumError::new("condition", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    #[serde(rename = "Non-Geared")]
    NonGeared,
    #[serde(rename = "Single Speed")]
    SingleSpeed,
    #[serde(rename = "Multi-Speed")]
    MultiSpeed,
}

impl Transmission {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonGeared => "Non-Geared",
            Self::SingleSpeed => "Single Speed",
            Self::MultiSpeed => "Multi-Speed",
        }
    }
}

impl FromStr for Transmission {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Non-Geared" => Ok(Self::NonGeared),
            "Single Speed" => Ok(Self::SingleSpeed),
            "Multi-Speed" => Ok(Self::MultiSpeed),
            _ => Err(ParseEnumError::new("gearTransmission", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMaterial {
    Steel,
    Aluminum,
    #[serde(rename = "Carbon Fiber")]
    CarbonFiber,
    Titanium,
}

impl FrameMaterial {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steel => "Steel",
            Self::Aluminum => "Aluminum",
            Self::CarbonFiber => "Carbon Fiber",
            Self::Titanium => "Titanium",
        }
    }
}

impl FromStr for FrameMaterial {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Steel" => Ok(Self::Steel),
            "Aluminum" => Ok(Self::Aluminum),
            "Carbon Fiber" => Ok(Self::CarbonFiber),
            "Titanium" => Ok(Self::Titanium),
            _ => Err(ParseEnumError::new("frameMaterial", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suspension {
    None,
    Front,
    Full,
}

impl Suspension {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Front => "Front",
            Self::Full => "Full",
        }
    }
}

impl FromStr for Suspension {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "Front" => Ok(Self::Front),
            "Full" => Ok(Self::Full),
            _ => Err(ParseEnumError::new("suspension", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleType {
    Mountain,
    Road,
    Hybrid,
    #[serde(rename = "BMX")]
    Bmx,
    Other,
}

impl CycleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mountain => "Mountain",
            Self::Road => "Road",
            Self::Hybrid => "Hybrid",
            Self::Bmx => "BMX",
            Self::Other => "Other",
        }
    }
}

impl FromStr for CycleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mountain" => Ok(Self::Mountain),
            "Road" => Ok(Self::Road),
            "Hybrid" => Ok(Self::Hybrid),
            "BMX" => Ok(Self::Bmx),
            "Other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("cycleType", s)),
        }
    }
}

/// Wheel diameter in inches, as the storefront displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelSize {
    #[serde(rename = "12")]
    W12,
    #[serde(rename = "16")]
    W16,
    #[serde(rename = "20")]
    W20,
    #[serde(rename = "24")]
    W24,
    #[serde(rename = "26")]
    W26,
    #[serde(rename = "27.5")]
    W275,
    #[serde(rename = "29")]
    W29,
    Other,
}

impl WheelSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W12 => "12",
            Self::W16 => "16",
            Self::W20 => "20",
            Self::W24 => "24",
            Self::W26 => "26",
            Self::W275 => "27.5",
            Self::W29 => "29",
            Self::Other => "Other",
        }
    }
}

impl FromStr for WheelSize {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "12" => Ok(Self::W12),
            "16" => Ok(Self::W16),
            "20" => Ok(Self::W20),
            "24" => Ok(Self::W24),
            "26" => Ok(Self::W26),
            "27.5" => Ok(Self::W275),
            "29" => Ok(Self::W29),
            "Other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("wheelSize", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
    Reserved,
    Unlisted,
}

impl ListingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
            Self::Reserved => "reserved",
            Self::Unlisted => "unlisted",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            "reserved" => Ok(Self::Reserved),
            "unlisted" => Ok(Self::Unlisted),
            _ => Err(ParseEnumError::new("status", s)),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result ordering for listing searches.
///
/// `Relevance` has no scoring of its own and orders like `Newest`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Relevance,
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // The storefront sends "relevant"; older clients sent "relevance".
            "relevance" | "relevant" => Ok(Self::Relevance),
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            _ => Err(ParseEnumError::new("sortBy", s)),
        }
    }
}

/// A bicycle-for-sale record as the rest of the application sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: i32,
    pub seller_id: i32,
    pub category: Category,
    pub brand: String,
    pub model: String,
    pub purchase_year: i32,
    pub price: i64,
    pub gear_transmission: Transmission,
    pub frame_material: FrameMaterial,
    pub suspension: Suspension,
    pub condition: Condition,
    pub cycle_type: CycleType,
    pub wheel_size: WheelSize,
    pub has_receipt: bool,
    pub additional_details: Option<String>,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub status: ListingStatus,
    pub views: i32,
    pub inquiries: i32,
    pub created_at: String,
}

/// Validated payload for creating a listing. Counters and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub seller_id: i32,
    pub category: Category,
    pub brand: String,
    pub model: String,
    pub purchase_year: i32,
    pub price: i64,
    pub gear_transmission: Transmission,
    pub frame_material: FrameMaterial,
    pub suspension: Suspension,
    pub condition: Condition,
    pub cycle_type: CycleType,
    pub wheel_size: WheelSize,
    pub has_receipt: bool,
    pub additional_details: Option<String>,
    pub images: Vec<String>,
    pub is_premium: bool,
}

/// Optional predicates narrowing a listing search. Absent fields impose no
/// constraint; present fields are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub brand: Option<String>,
    pub purchase_year: Option<i32>,
    pub condition: Option<Condition>,
    pub gear_transmission: Option<Transmission>,
    pub frame_material: Option<FrameMaterial>,
    pub suspension: Option<Suspension>,
    pub wheel_size: Option<WheelSize>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub category: Option<Category>,
    pub is_premium: Option<bool>,
    pub seller_id: Option<i32>,
    pub ids: Option<Vec<i32>>,
    pub status: Option<ListingStatus>,
}

impl ListingFilter {
    /// True when no predicate is set, i.e. a search returns the whole
    /// collection in default order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.purchase_year.is_none()
            && self.condition.is_none()
            && self.gear_transmission.is_none()
            && self.frame_material.is_none()
            && self.suspension.is_none()
            && self.wheel_size.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.category.is_none()
            && self.is_premium.is_none()
            && self.seller_id.is_none()
            && self.ids.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_round_trip() {
        assert_eq!("Like New".parse::<Condition>().unwrap(), Condition::LikeNew);
        assert_eq!(Condition::LikeNew.as_str(), "Like New");
        assert_eq!("27.5".parse::<WheelSize>().unwrap(), WheelSize::W275);
        assert_eq!(WheelSize::W275.as_str(), "27.5");
        assert_eq!("BMX".parse::<CycleType>().unwrap(), CycleType::Bmx);
        assert_eq!(
            "Non-Geared".parse::<Transmission>().unwrap(),
            Transmission::NonGeared
        );
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("Excellent".parse::<Condition>().is_err());
        assert!("650b".parse::<WheelSize>().is_err());
        assert!("deleted".parse::<ListingStatus>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!("relevance".parse::<SortKey>().unwrap(), SortKey::Relevance);
        assert_eq!("relevant".parse::<SortKey>().unwrap(), SortKey::Relevance);
        assert_eq!("price_asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!(SortKey::default(), SortKey::Newest);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_empty_filter() {
        assert!(ListingFilter::default().is_empty());

        let filter = ListingFilter {
            brand: Some("Trek".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
