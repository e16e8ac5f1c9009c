use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

/// Which results lane a listing is shown in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    Personal,
    ChannelPartner,
}

/// Transaction intent of a listing
///
/// `Buying` listings are looking for buyers, `Selling` listings are closed
/// deals kept on the site as proof of work.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buying,
    Selling,
}

/// Property category, the primary search tab
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Land,
    Commercial,
    Residential,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Land, Category::Commercial, Category::Residential];
}

/// Display badge on listing cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusTag {
    New,
    Limited,
    Hot,
    Exclusive,
    Premium,
}

/// Visibility lifecycle, independent from the transaction type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Active,
    Sold,
    Hidden,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One gallery entry of a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingMedia {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_primary: bool,
}

impl ListingMedia {
    /// Build an image gallery from form URLs. Blank URLs are dropped and the
    /// primary index is clamped to the surviving entries.
    pub fn images_from_urls<S: AsRef<str>>(urls: &[S], primary_index: usize) -> Vec<ListingMedia> {
        let urls: Vec<&str> = urls
            .iter()
            .map(|url| url.as_ref().trim())
            .filter(|url| !url.is_empty())
            .collect();
        let primary = primary_index.min(urls.len().saturating_sub(1));

        urls.into_iter()
            .enumerate()
            .map(|(i, url)| ListingMedia {
                url: url.to_string(),
                kind: MediaKind::Image,
                order: i as u32,
                is_primary: i == primary,
            })
            .collect()
    }
}

/// Core listing data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub ownership: Ownership,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub area: String,
    pub property_type: String,
    /// Rupees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range_min: Option<u64>,
    /// Rupees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_tag: Option<StatusTag>,
    pub admin_status: AdminStatus,
    #[serde(default)]
    pub media: Vec<ListingMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_statement: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.admin_status == AdminStatus::Active
    }

    pub fn has_price(&self) -> bool {
        self.price_range_min.is_some() || self.price_range_max.is_some()
    }

    /// Lower bound used for overlap checks: the stated minimum, or the
    /// maximum when only that is stated.
    pub fn effective_min(&self) -> Option<u64> {
        self.price_range_min.or(self.price_range_max)
    }

    /// Upper bound used for overlap checks: the stated maximum, or the
    /// minimum when only that is stated.
    pub fn effective_max(&self) -> Option<u64> {
        self.price_range_max.or(self.price_range_min)
    }

    /// Media sorted by `order`
    pub fn sorted_media(&self) -> Vec<&ListingMedia> {
        let mut media: Vec<&ListingMedia> = self.media.iter().collect();
        media.sort_by_key(|m| m.order);
        media
    }

    /// The flagged primary media, else the first by order. `None` renders
    /// as the "no image" placeholder.
    pub fn primary_media(&self) -> Option<&ListingMedia> {
        let sorted = self.sorted_media();
        sorted
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| sorted.first())
            .copied()
    }

    /// Card / page title, e.g. "Baner – 2 BHK Apartment"
    pub fn title(&self) -> String {
        format!("{} – {}", self.area, self.property_type)
    }
}

/// Payload for creating a listing. Identity and timestamps are assigned by
/// the write path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub ownership: Ownership,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub area: String,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_tag: Option<StatusTag>,
    pub admin_status: AdminStatus,
    #[serde(default)]
    pub media: Vec<ListingMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_statement: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl NewListing {
    /// Trim free text and drop an empty value statement.
    pub fn normalized(mut self) -> Self {
        self.area = self.area.trim().to_string();
        self.property_type = self.property_type.trim().to_string();
        self.value_statement = self
            .value_statement
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.features = self
            .features
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        self
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.area.trim().is_empty() {
            return Err(DeskError::Validation("Area is required.".to_string()));
        }
        if self.property_type.trim().is_empty() {
            return Err(DeskError::Validation("Property type is required.".to_string()));
        }
        if self.media.is_empty() {
            return Err(DeskError::Validation(
                "At least one image URL is required.".to_string(),
            ));
        }
        validate_price_range(self.price_range_min, self.price_range_max)
    }
}

/// Partial update of a listing. Ownership is not patchable.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears an optional
/// field.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range_min: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range_max: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_tag: Option<Option<StatusTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_status: Option<AdminStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<ListingMedia>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_statement: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl ListingPatch {
    pub fn status(status: AdminStatus) -> Self {
        Self {
            admin_status: Some(status),
            ..Self::default()
        }
    }

    pub fn touches_price(&self) -> bool {
        self.price_range_min.is_some() || self.price_range_max.is_some()
    }

    /// Price bounds after applying this patch on top of `current`
    pub fn merged_price(&self, current: &Listing) -> (Option<u64>, Option<u64>) {
        (
            self.price_range_min.unwrap_or(current.price_range_min),
            self.price_range_max.unwrap_or(current.price_range_max),
        )
    }

    pub fn validate(&self) -> DeskResult<()> {
        if let Some(area) = &self.area {
            if area.trim().is_empty() {
                return Err(DeskError::Validation("Area is required.".to_string()));
            }
        }
        if let (Some(min), Some(max)) = (self.price_range_min, self.price_range_max) {
            validate_price_range(min, max)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_price_range(min: Option<u64>, max: Option<u64>) -> DeskResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(DeskError::Validation(format!(
            "Minimum price ({min}) exceeds maximum price ({max})."
        ))),
        _ => Ok(()),
    }
}
