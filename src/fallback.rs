//! Sample catalog shown when the live listing collection is empty or
//! refuses public reads.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{
    AdminStatus, Category, Listing, ListingMedia, Ownership, StatusTag, TransactionType,
};
use crate::taxonomy::to_storage_units;

/// Source of substitute listings
pub trait FallbackProvider: Send + Sync {
    /// Listings to show in place of live data. Empty disables substitution.
    fn listings(&self) -> Vec<Listing>;

    /// Look up a single substitute listing by id
    fn find(&self, id: &str) -> Option<Listing> {
        self.listings().into_iter().find(|l| l.id == id)
    }

    /// Get the name of the provider
    fn name(&self) -> &'static str;
}

/// Provider used once real data is populated
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackProvider for NoFallback {
    fn listings(&self) -> Vec<Listing> {
        Vec::new()
    }

    fn find(&self, _id: &str) -> Option<Listing> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Fixed catalog covering both lanes, all categories and both transaction
/// types
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

impl FallbackProvider for SampleCatalog {
    fn listings(&self) -> Vec<Listing> {
        info!("📋 Using sample listings in place of live data");

        vec![
            sample(
                "sample-baner-2bhk",
                Ownership::Personal,
                TransactionType::Buying,
                Category::Residential,
                "Baner",
                "2 BHK Apartment",
                Some(75),
                Some(95),
                Some(StatusTag::New),
                "Ready-to-move 2 BHK close to Baner High Street.",
                &["Balcony", "Elevator"],
            ),
            sample(
                "sample-wakad-3bhk",
                Ownership::Personal,
                TransactionType::Buying,
                Category::Residential,
                "Wakad",
                "3 BHK Apartment",
                Some(120),
                Some(145),
                Some(StatusTag::Hot),
                "Large 3 BHK with clubhouse access, minutes from Hinjewadi.",
                &["Swimming pool", "Garage", "Elevator"],
            ),
            sample(
                "sample-hadapsar-office",
                Ownership::Personal,
                TransactionType::Selling,
                Category::Commercial,
                "Hadapsar",
                "Commercial",
                Some(180),
                None,
                None,
                "Office floor closed for a long-term tenant near Magarpatta.",
                &["Air conditioning"],
            ),
            sample(
                "sample-mulshi-acreage",
                Ownership::Personal,
                TransactionType::Buying,
                Category::Land,
                "Mulshi",
                "Acreage",
                None,
                None,
                Some(StatusTag::Exclusive),
                "Clear-title acreage with valley views.",
                &[],
            ),
            sample(
                "sample-kharadi-villa",
                Ownership::ChannelPartner,
                TransactionType::Buying,
                Category::Residential,
                "Kharadi",
                "Villa",
                Some(250),
                Some(320),
                Some(StatusTag::Premium),
                "Gated villa community from a verified developer partner.",
                &["Swimming pool", "Garage", "Solar panels"],
            ),
            sample(
                "sample-hinjewadi-plot",
                Ownership::ChannelPartner,
                TransactionType::Selling,
                Category::Land,
                "Hinjewadi",
                "Land",
                Some(60),
                Some(80),
                None,
                "NA plot sold through a partner agency.",
                &[],
            ),
            sample(
                "sample-pune-city-shop",
                Ownership::ChannelPartner,
                TransactionType::Buying,
                Category::Commercial,
                "Pune City",
                "Block Of Units",
                None,
                Some(90),
                Some(StatusTag::Limited),
                "High-footfall retail units on a main road.",
                &["Step free entry"],
            ),
        ]
    }

    fn name(&self) -> &'static str {
        "sample-catalog"
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    ownership: Ownership,
    transaction_type: TransactionType,
    category: Category,
    area: &str,
    property_type: &str,
    min_lakhs: Option<u64>,
    max_lakhs: Option<u64>,
    status_tag: Option<StatusTag>,
    value_statement: &str,
    features: &[&str],
) -> Listing {
    // Fixed so repeated reads compare equal
    let stamp = DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default();

    Listing {
        id: id.to_string(),
        ownership,
        transaction_type,
        category,
        area: area.to_string(),
        property_type: property_type.to_string(),
        price_range_min: min_lakhs.map(to_storage_units),
        price_range_max: max_lakhs.map(to_storage_units),
        status_tag,
        admin_status: AdminStatus::Active,
        media: ListingMedia::images_from_urls(&[format!("/samples/{id}.jpg")], 0),
        value_statement: Some(value_statement.to_string()),
        features: features.iter().map(|f| f.to_string()).collect(),
        created_at: stamp,
        updated_at: stamp,
    }
}
