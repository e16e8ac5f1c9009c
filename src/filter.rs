//! Listing filters and the predicate engine.
//!
//! `matches` is pure: identical inputs always give the same answer and no
//! sub-predicate can turn a rejection back into a match.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Listing, Ownership, TransactionType};
use crate::taxonomy::to_storage_units;

/// Transaction choice in the filter UI.
///
/// `Rent` is offered by the search form but no listing carries it; choosing
/// it leaves the transaction side unconstrained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionIntent {
    Buying,
    Selling,
    Rent,
}

impl TransactionIntent {
    /// Listing value this intent selects, `None` when it selects everything
    pub fn listing_type(self) -> Option<TransactionType> {
        match self {
            TransactionIntent::Buying => Some(TransactionType::Buying),
            TransactionIntent::Selling => Some(TransactionType::Selling),
            TransactionIntent::Rent => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionIntent::Buying => "Buy",
            TransactionIntent::Selling => "Sold",
            TransactionIntent::Rent => "Rent",
        }
    }
}

impl From<TransactionType> for TransactionIntent {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Buying => TransactionIntent::Buying,
            TransactionType::Selling => TransactionIntent::Selling,
        }
    }
}

impl std::str::FromStr for TransactionIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buying" | "buy" => Ok(TransactionIntent::Buying),
            "selling" | "sold" => Ok(TransactionIntent::Selling),
            "rent" => Ok(TransactionIntent::Rent),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

/// Feature checklist selections. Every selected feature must be present on
/// the listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSelection {
    #[serde(default)]
    pub outdoor: Vec<String>,
    #[serde(default)]
    pub indoor: Vec<String>,
    #[serde(default)]
    pub climate: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
}

impl FeatureSelection {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.outdoor
            .iter()
            .chain(&self.indoor)
            .chain(&self.climate)
            .chain(&self.accessibility)
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Add or remove `feature` from `list`, like a checkbox click
    pub fn toggle(list: &mut Vec<String>, feature: &str) {
        if let Some(pos) = list.iter().position(|f| f == feature) {
            list.remove(pos);
        } else {
            list.push(feature.to_string());
        }
    }
}

/// Current query of a search session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingFilter {
    pub category: Option<Category>,
    pub transaction: Option<TransactionIntent>,
    /// Whole lakhs
    pub price_min_lakhs: Option<u64>,
    /// Whole lakhs
    pub price_max_lakhs: Option<u64>,
    /// Area / property type search box
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub features: FeatureSelection,
    /// Whitespace separated keywords from the filter modal
    #[serde(default)]
    pub keywords: String,
    /// Hide listings that state no price at all
    #[serde(default)]
    pub priced_only: bool,
}

impl ListingFilter {
    /// Filter a visitor starts from, and what "Clear filters" returns to:
    /// buying listings, nothing else constrained
    pub fn initial() -> Self {
        Self {
            transaction: Some(TransactionIntent::Buying),
            ..Self::default()
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.transaction.and_then(TransactionIntent::listing_type).is_none()
            && self.price_min_lakhs.is_none()
            && self.price_max_lakhs.is_none()
            && self.search.trim().is_empty()
            && self.features.is_empty()
            && self.keywords.trim().is_empty()
            && !self.priced_only
    }
}

/// Whether `listing` satisfies every constraint of `filter`.
pub fn matches(listing: &Listing, filter: &ListingFilter) -> bool {
    matches_category(listing, filter.category)
        && matches_transaction(listing, filter.transaction)
        && matches_price(listing, filter)
        && matches_search(listing, &filter.search)
        && matches_features(listing, &filter.features)
        && matches_keywords(listing, &filter.keywords)
}

fn matches_category(listing: &Listing, category: Option<Category>) -> bool {
    category.map_or(true, |c| listing.category == c)
}

fn matches_transaction(listing: &Listing, intent: Option<TransactionIntent>) -> bool {
    match intent.and_then(TransactionIntent::listing_type) {
        Some(tx) => listing.transaction_type == tx,
        None => true,
    }
}

/// Range overlap. A listing with no stated price is only excluded by
/// `priced_only`, never by a bound.
fn matches_price(listing: &Listing, filter: &ListingFilter) -> bool {
    if filter.priced_only && !listing.has_price() {
        return false;
    }
    if let (Some(min), Some(top)) = (filter.price_min_lakhs, listing.effective_max()) {
        if top < to_storage_units(min) {
            return false;
        }
    }
    if let (Some(max), Some(bottom)) = (filter.price_max_lakhs, listing.effective_min()) {
        if bottom > to_storage_units(max) {
            return false;
        }
    }
    true
}

fn matches_search(listing: &Listing, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    listing.area.to_lowercase().contains(&needle)
        || listing.property_type.to_lowercase().contains(&needle)
}

fn matches_features(listing: &Listing, selection: &FeatureSelection) -> bool {
    selection.iter().all(|wanted| {
        listing
            .features
            .iter()
            .any(|have| have.trim().eq_ignore_ascii_case(wanted.trim()))
    })
}

fn matches_keywords(listing: &Listing, keywords: &str) -> bool {
    let mut words = keywords.split_whitespace().peekable();
    if words.peek().is_none() {
        return true;
    }
    let haystack = [
        listing.area.as_str(),
        listing.property_type.as_str(),
        listing.value_statement.as_deref().unwrap_or_default(),
    ]
    .into_iter()
    .chain(listing.features.iter().map(String::as_str))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    words.all(|word| haystack.contains(&word.to_lowercase()))
}

/// Listings passing `filter`, in their original order
pub fn filter_listings(listings: &[Listing], filter: &ListingFilter) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| matches(listing, filter))
        .cloned()
        .collect()
}

/// Results split by ownership, each lane keeping the input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lanes {
    pub personal: Vec<Listing>,
    pub channel_partner: Vec<Listing>,
}

impl Lanes {
    pub fn len(&self) -> usize {
        self.personal.len() + self.channel_partner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lane(&self, ownership: Ownership) -> &[Listing] {
        match ownership {
            Ownership::Personal => &self.personal,
            Ownership::ChannelPartner => &self.channel_partner,
        }
    }
}

pub fn partition(listings: impl IntoIterator<Item = Listing>) -> Lanes {
    let mut lanes = Lanes::default();
    for listing in listings {
        match listing.ownership {
            Ownership::Personal => lanes.personal.push(listing),
            Ownership::ChannelPartner => lanes.channel_partner.push(listing),
        }
    }
    lanes
}
