use serde::{Deserialize, Serialize};

use crate::entities::listing::{PropertyType, TenantPreference};

/// Value that means "no constraint" for the enumerated criteria.
pub const ALL: &str = "all";

/// Price bands offered by the search form, as `(value, label)`.
pub const PRICE_BANDS: [(&str, &str); 6] = [
    ("all", "All Prices"),
    ("0-5000", "Under ₹5,000"),
    ("5000-10000", "₹5,000 - ₹10,000"),
    ("10000-15000", "₹10,000 - ₹15,000"),
    ("15000-25000", "₹15,000 - ₹25,000"),
    ("25000+", "Above ₹25,000"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    Any,
    Between { min: i64, max: Option<i64> },
}

impl PriceBand {
    /// Parses `all`, `min-max` or `min+`.
    ///
    /// Anything else is treated as [`PriceBand::Any`]: an unreadable band
    /// widens the result instead of hiding every listing.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL {
            return PriceBand::Any;
        }

        let parsed = match raw.strip_suffix('+') {
            Some(min) => min.trim().parse().ok().map(|min| PriceBand::Between { min, max: None }),
            None => raw.split_once('-').and_then(|(min, max)| {
                let min = min.trim().parse().ok()?;
                let max = max.trim().parse().ok()?;
                (min <= max).then_some(PriceBand::Between { min, max: Some(max) })
            }),
        };

        parsed.unwrap_or_else(|| {
            tracing::debug!(price_range = raw, "Unreadable price range, not filtering by price");
            PriceBand::Any
        })
    }

    pub fn contains(&self, price: i64) -> bool {
        match *self {
            PriceBand::Any => true,
            PriceBand::Between { min, max } => min <= price && max.is_none_or(|max| price <= max),
        }
    }
}

/// An enumerated criterion: either unconstrained or an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Any,
    Exactly(String),
}

impl Choice {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL {
            Choice::Any
        } else {
            Choice::Exactly(raw.to_string())
        }
    }

    /// Case-sensitive comparison against a listing's value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::Any => true,
            Choice::Exactly(expected) => expected == value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Lowercased location fragment; empty matches everything.
    pub location: String,
    pub price: PriceBand,
    pub property_type: Choice,
    pub tenant_preference: Choice,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            location: String::new(),
            price: PriceBand::Any,
            property_type: Choice::Any,
            tenant_preference: Choice::Any,
        }
    }
}

/// Raw criteria as they arrive in a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub tenant_preference: Option<String>,
}

impl From<&FilterQuery> for FilterCriteria {
    fn from(query: &FilterQuery) -> Self {
        FilterCriteria {
            location: query.location.as_deref().unwrap_or_default().to_lowercase(),
            price: PriceBand::parse(query.price_range.as_deref().unwrap_or(ALL)),
            property_type: Choice::parse(query.property_type.as_deref().unwrap_or(ALL)),
            tenant_preference: Choice::parse(query.tenant_preference.as_deref().unwrap_or(ALL)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub price_ranges: Vec<FilterOption>,
    pub property_types: Vec<FilterOption>,
    pub tenant_preferences: Vec<FilterOption>,
}

impl FilterOptions {
    /// Every selectable value, each list led by the "all" choice.
    pub fn catalog() -> Self {
        let any = |label| FilterOption { value: ALL, label };

        FilterOptions {
            price_ranges: PRICE_BANDS
                .iter()
                .map(|&(value, label)| FilterOption { value, label })
                .collect(),
            property_types: std::iter::once(any("All Types"))
                .chain(PropertyType::ALL.iter().map(|p| FilterOption { value: p.as_str(), label: p.as_str() }))
                .collect(),
            tenant_preferences: std::iter::once(any("All Preferences"))
                .chain(TenantPreference::ALL.iter().map(|t| FilterOption { value: t.as_str(), label: t.label() }))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_band() {
        assert_eq!(
            PriceBand::parse("5000-10000"),
            PriceBand::Between { min: 5000, max: Some(10000) }
        );
    }

    #[test]
    fn parses_open_ended_band() {
        assert_eq!(PriceBand::parse("25000+"), PriceBand::Between { min: 25000, max: None });
    }

    #[test]
    fn malformed_band_matches_everything() {
        for raw in ["cheap", "10000-", "-5", "+", "9-3", "5000-abc"] {
            assert_eq!(PriceBand::parse(raw), PriceBand::Any, "{raw}");
        }
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let band = PriceBand::parse("5000-10000");
        assert!(band.contains(5000));
        assert!(band.contains(10000));
        assert!(!band.contains(4999));
        assert!(!band.contains(10001));
    }

    #[test]
    fn every_offered_band_parses() {
        for (value, _) in PRICE_BANDS.iter().skip(1) {
            assert_ne!(PriceBand::parse(value), PriceBand::Any, "{value}");
        }
    }

    #[test]
    fn choice_is_case_sensitive() {
        let choice = Choice::parse("1 BHK");
        assert!(choice.matches("1 BHK"));
        assert!(!choice.matches("1 bhk"));
        assert!(Choice::parse("all").matches("anything"));
    }

    #[test]
    fn query_defaults_to_no_constraints() {
        let criteria = FilterCriteria::from(&FilterQuery::default());
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn catalog_leads_each_list_with_all() {
        let options = FilterOptions::catalog();
        assert_eq!(options.price_ranges.len(), PRICE_BANDS.len());
        assert_eq!(options.property_types.len(), 6);
        assert_eq!(options.tenant_preferences[0].value, ALL);
        assert_eq!(options.tenant_preferences[3].value, "Girls");
        assert_eq!(options.tenant_preferences[3].label, "Girls Only");
    }
}
