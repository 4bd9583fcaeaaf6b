//! Value Objects for storefront filtering

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive price window in whole currency units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange { min: u32, max: u32 }

impl PriceRange {
    pub const DEFAULT_MIN: u32 = 0;
    pub const DEFAULT_MAX: u32 = 1000;

    /// Bounds given in the wrong order are swapped so `min <= max` always holds.
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }
    pub fn min(&self) -> u32 { self.min }
    pub fn max(&self) -> u32 { self.max }
    pub fn is_default(&self) -> bool { *self == Self::default() }
    pub fn contains(&self, price: f64) -> bool { price >= f64::from(self.min) && price <= f64::from(self.max) }
}

impl Default for PriceRange {
    fn default() -> Self { Self { min: Self::DEFAULT_MIN, max: Self::DEFAULT_MAX } }
}

/// A named discount bucket such as `"21% - 40%"` or `"Over 60%"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscountRange {
    /// Closed interval, both ends included.
    Between { min: u32, max: u32 },
    /// Strictly greater than the bound.
    Over(u32),
}

impl DiscountRange {
    pub fn parse(label: &str) -> Result<Self, DiscountRangeError> {
        let label = label.trim();
        if label.is_empty() { return Err(DiscountRangeError::Empty); }
        let lower = label.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("over") {
            return parse_percent(rest).map(Self::Over).ok_or_else(|| DiscountRangeError::Malformed(label.to_string()));
        }
        let (lo, hi) = lower.split_once('-').ok_or_else(|| DiscountRangeError::Malformed(label.to_string()))?;
        match (parse_percent(lo), parse_percent(hi)) {
            (Some(min), Some(max)) if min <= max => Ok(Self::Between { min, max }),
            _ => Err(DiscountRangeError::Malformed(label.to_string())),
        }
    }

    pub fn contains(&self, discount: f64) -> bool {
        match *self {
            Self::Between { min, max } => discount >= f64::from(min) && discount <= f64::from(max),
            Self::Over(bound) => discount > f64::from(bound),
        }
    }
}

fn parse_percent(raw: &str) -> Option<u32> {
    raw.trim().trim_end_matches('%').trim().parse().ok()
}

impl fmt::Display for DiscountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Between { min, max } => write!(f, "{}% - {}%", min, max),
            Self::Over(bound) => write!(f, "Over {}%", bound),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum DiscountRangeError { Empty, Malformed(String) }
impl std::error::Error for DiscountRangeError {}
impl fmt::Display for DiscountRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "Discount range empty"), Self::Malformed(s) => write!(f, "Malformed discount range: {}", s) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender { Male, Female, Unisex }

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "UNISEX" => Some(Self::Unisex),
            _ => None,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self { Self::Male => "MALE", Self::Female => "FEMALE", Self::Unisex => "UNISEX" }
    }
}

/// Minimum star rating, 1 through 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Option<Self> { (1..=5).contains(&value).then_some(Self(value)) }
    pub fn value(&self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value).ok_or(RatingError(value)) }
}

impl From<Rating> for u8 { fn from(r: Rating) -> u8 { r.0 } }

#[derive(Debug, Clone)] pub struct RatingError(pub u8);
impl std::error::Error for RatingError {}
impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Rating {} outside 1-5", self.0) }
}

/// Result ordering selected by the `sort` query parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Relevance,
    PriceLowHigh,
    PriceHighLow,
    Newest,
    Rating,
    Popularity,
}

impl SortOption {
    /// Unknown keys fall back to relevance.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "price-low-high" => Self::PriceLowHigh,
            "price-high-low" => Self::PriceHighLow,
            "newest" => Self::Newest,
            "rating" => Self::Rating,
            "popularity" => Self::Popularity,
            _ => Self::Relevance,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
            Self::Newest => "newest",
            Self::Rating => "rating",
            Self::Popularity => "popularity",
        }
    }
}
