//! Static lookup tables: categories, property types, transaction labels,
//! feature vocabularies and the lakh unit conversion.

use crate::models::{Category, TransactionType};

/// Rupees in one lakh
pub const LAKH: u64 = 1_00_000;
/// Lakhs in one crore
pub const LAKHS_PER_CRORE: u64 = 100;

/// Convert whole lakhs (the unit the search UI uses) to stored rupees.
pub fn to_storage_units(lakhs: u64) -> u64 {
    lakhs.saturating_mul(LAKH)
}

/// Convert stored rupees to whole lakhs, truncating any remainder.
pub fn from_storage_units(rupees: u64) -> u64 {
    rupees / LAKH
}

/// Stored rupees as fractional lakhs, for form fields and display.
pub fn storage_units_as_lakhs(rupees: u64) -> f64 {
    rupees as f64 / LAKH as f64
}

/// Free-text fallback when no curated type fits
pub const OTHER_PROPERTY_TYPE: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTypeOption {
    pub label: &'static str,
    pub category: Category,
}

/// Curated property types in display order
pub const PROPERTY_TYPE_OPTIONS: &[PropertyTypeOption] = &[
    PropertyTypeOption { label: "Retirement Living", category: Category::Residential },
    PropertyTypeOption { label: "House", category: Category::Residential },
    PropertyTypeOption { label: "Land", category: Category::Land },
    PropertyTypeOption { label: "Townhouse", category: Category::Residential },
    PropertyTypeOption { label: "Acreage", category: Category::Land },
    PropertyTypeOption { label: "Apartment & Unit", category: Category::Residential },
    PropertyTypeOption { label: "2 BHK Apartment", category: Category::Residential },
    PropertyTypeOption { label: "3 BHK Apartment", category: Category::Residential },
    PropertyTypeOption { label: "Rural", category: Category::Commercial },
    PropertyTypeOption { label: "Villa", category: Category::Residential },
    PropertyTypeOption { label: "Block Of Units", category: Category::Commercial },
    PropertyTypeOption { label: "Commercial", category: Category::Commercial },
    PropertyTypeOption { label: OTHER_PROPERTY_TYPE, category: Category::Residential },
];

/// Options offered for a category: its own types plus "Other".
pub fn property_types_for(category: Category) -> Vec<&'static str> {
    PROPERTY_TYPE_OPTIONS
        .iter()
        .filter(|o| o.category == category || o.label == OTHER_PROPERTY_TYPE)
        .map(|o| o.label)
        .collect()
}

/// First curated type of a category, suggested when the category changes.
pub fn default_property_type(category: Category) -> &'static str {
    PROPERTY_TYPE_OPTIONS
        .iter()
        .find(|o| o.category == category && o.label != OTHER_PROPERTY_TYPE)
        .map(|o| o.label)
        .unwrap_or(OTHER_PROPERTY_TYPE)
}

/// Category implied by picking `property_type`. "Other" and unknown text
/// keep `current`.
pub fn suggest_category(property_type: &str, current: Category) -> Category {
    PROPERTY_TYPE_OPTIONS
        .iter()
        .find(|o| o.label.eq_ignore_ascii_case(property_type.trim()))
        .filter(|o| o.label != OTHER_PROPERTY_TYPE)
        .map(|o| o.category)
        .unwrap_or(current)
}

/// Whether `property_type` is one of the curated options of `category`.
pub fn is_curated(category: Category, property_type: &str) -> bool {
    PROPERTY_TYPE_OPTIONS
        .iter()
        .any(|o| o.category == category && o.label == property_type && o.label != OTHER_PROPERTY_TYPE)
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Land => "Land",
            Category::Commercial => "Commercial",
            Category::Residential => "Residential",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(Category::Land),
            "commercial" => Ok(Category::Commercial),
            "residential" => Ok(Category::Residential),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Category tabs of the search bar; `None` is "All".
pub const CATEGORY_TABS: [(Option<Category>, &str); 4] = [
    (None, "All"),
    (Some(Category::Land), "Land"),
    (Some(Category::Commercial), "Commercial"),
    (Some(Category::Residential), "Residential"),
];

impl TransactionType {
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Buying => "Buy",
            TransactionType::Selling => "Sold",
        }
    }
}

/// Feature checklist groups of the filter modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureGroup {
    Outdoor,
    Indoor,
    Climate,
    Accessibility,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 4] = [
        FeatureGroup::Outdoor,
        FeatureGroup::Indoor,
        FeatureGroup::Climate,
        FeatureGroup::Accessibility,
    ];

    pub fn options(self) -> &'static [&'static str] {
        match self {
            FeatureGroup::Outdoor => &["Swimming pool", "Garage", "Balcony", "Outdoor area"],
            FeatureGroup::Indoor => &["Ensuite", "Dishwasher", "Study", "Built in robes"],
            FeatureGroup::Climate => &["Air conditioning", "Solar panels", "Heating", "Fireplace"],
            FeatureGroup::Accessibility => {
                &["Single storey", "Step free entry", "Wide doorways", "Elevator"]
            }
        }
    }

    /// Group a vocabulary entry belongs to, case-insensitive
    pub fn of(feature: &str) -> Option<FeatureGroup> {
        Self::canonical(feature).map(|(group, _)| group)
    }

    /// Group and vocabulary spelling of `feature`, case-insensitive
    pub fn canonical(feature: &str) -> Option<(FeatureGroup, &'static str)> {
        let wanted = feature.trim();
        FeatureGroup::ALL.into_iter().find_map(|group| {
            group
                .options()
                .iter()
                .find(|o| o.eq_ignore_ascii_case(wanted))
                .map(|label| (group, *label))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_round_trips_whole_lakhs() {
        for lakhs in [0, 1, 75, 95, 100, 130, 2_500] {
            assert_eq!(from_storage_units(to_storage_units(lakhs)), lakhs);
            let rupees = to_storage_units(lakhs);
            assert_eq!(to_storage_units(from_storage_units(rupees)), rupees);
        }
        assert_eq!(to_storage_units(75), 75_00_000);
        assert_eq!(storage_units_as_lakhs(1_50_000), 1.5);
    }

    #[test]
    fn test_conversion_saturates_instead_of_overflowing() {
        assert_eq!(to_storage_units(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_property_types_for_category_include_other() {
        let land = property_types_for(Category::Land);
        assert_eq!(land, vec!["Land", "Acreage", OTHER_PROPERTY_TYPE]);
        assert_eq!(default_property_type(Category::Commercial), "Rural");
        assert_eq!(default_property_type(Category::Residential), "Retirement Living");
    }

    #[test]
    fn test_suggest_category_from_property_type() {
        assert_eq!(suggest_category("Acreage", Category::Residential), Category::Land);
        assert_eq!(suggest_category("block of units", Category::Land), Category::Commercial);
        assert_eq!(suggest_category(OTHER_PROPERTY_TYPE, Category::Land), Category::Land);
        assert_eq!(suggest_category("Penthouse", Category::Commercial), Category::Commercial);
    }

    #[test]
    fn test_curated_membership() {
        assert!(is_curated(Category::Residential, "2 BHK Apartment"));
        assert!(!is_curated(Category::Land, "2 BHK Apartment"));
        assert!(!is_curated(Category::Residential, OTHER_PROPERTY_TYPE));
    }

    #[test]
    fn test_labels_and_feature_groups() {
        assert_eq!(TransactionType::Selling.label(), "Sold");
        assert_eq!(CATEGORY_TABS[0], (None, "All"));
        assert_eq!("Commercial".parse::<Category>(), Ok(Category::Commercial));
        assert_eq!(FeatureGroup::of("solar panels"), Some(FeatureGroup::Climate));
        assert_eq!(FeatureGroup::of("Helipad"), None);
    }
}
