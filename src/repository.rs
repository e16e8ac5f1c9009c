//! Typed repositories over the document store.
//!
//! Every write stamps its own timestamps; callers never supply `createdAt`
//! or `updatedAt`.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DeskError, DeskResult, StoreError, StoreResult};
use crate::models::listing::validate_price_range;
use crate::models::{
    AdminStatus, Area, AreaDraft, ChannelPartner, ChannelPartnerDraft, Enquiry, EnquiryDraft,
    Listing, ListingPatch, NewListing, PartnerStatus, Testimonial, TestimonialDraft,
    TestimonialStatus,
};
use crate::store::{collections, to_fields, Document, DocumentStore};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// A type stored in its own collection
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Whether updates stamp `updatedAt`
    const TRACKS_UPDATES: bool = true;
}

impl Record for Listing {
    const COLLECTION: &'static str = collections::LISTINGS;
}

impl Record for Area {
    const COLLECTION: &'static str = collections::AREAS;
}

impl Record for ChannelPartner {
    const COLLECTION: &'static str = collections::CHANNEL_PARTNERS;
}

impl Record for Testimonial {
    const COLLECTION: &'static str = collections::TESTIMONIALS;
}

impl Record for Enquiry {
    const COLLECTION: &'static str = collections::ENQUIRIES;
    const TRACKS_UPDATES: bool = false;
}

fn timestamp_value(at: DateTime<Utc>) -> StoreResult<Value> {
    Ok(serde_json::to_value(at)?)
}

/// Decode documents, skipping any that do not match the record shape
fn decode_all<T: Record>(documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping malformed {} document {}: {}", T::COLLECTION, doc.id, err);
                None
            }
        })
        .collect()
}

/// Typed access to one collection. Errors are raw store errors; callers
/// classify them for their path.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<T>> {
        let documents = self.store.fetch_all(T::COLLECTION).await?;
        Ok(decode_all(documents))
    }

    pub async fn list_where(&self, field: &str, value: &Value) -> StoreResult<Vec<T>> {
        let documents = self.store.query_eq(T::COLLECTION, field, value).await?;
        Ok(decode_all(documents))
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.fetch_by_id(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Insert `draft`, stamping `createdAt` (and `updatedAt` for records
    /// that track updates). Returns the stored record.
    pub async fn create<D: Serialize + ?Sized>(&self, draft: &D) -> StoreResult<T> {
        let now = Utc::now();
        let mut fields = to_fields(draft)?;
        fields.insert(CREATED_AT.to_string(), timestamp_value(now)?);
        if T::TRACKS_UPDATES {
            fields.insert(UPDATED_AT.to_string(), timestamp_value(now)?);
        }
        let id = self.store.insert(T::COLLECTION, fields.clone()).await?;
        debug!("Created {}/{}", T::COLLECTION, id);
        Document::new(id, fields).decode()
    }

    /// Shallow-merge `patch`, stamping `updatedAt`. Last write wins.
    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, patch: &P) -> StoreResult<()> {
        let fields = self.stamp_patch(patch)?;
        self.store.update(T::COLLECTION, id, fields).await
    }

    /// Like [`Collection::update`], but only if the stored `updatedAt` still
    /// equals `expected_updated_at`.
    pub async fn update_if_unchanged<P: Serialize + ?Sized>(
        &self,
        id: &str,
        expected_updated_at: DateTime<Utc>,
        patch: &P,
    ) -> StoreResult<()> {
        let fields = self.stamp_patch(patch)?;
        self.store
            .update_if_unmodified(T::COLLECTION, id, UPDATED_AT, expected_updated_at, fields)
            .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(T::COLLECTION, id).await
    }

    fn stamp_patch<P: Serialize + ?Sized>(&self, patch: &P) -> StoreResult<crate::store::Fields> {
        let mut fields = to_fields(patch)?;
        fields.remove(CREATED_AT);
        if T::TRACKS_UPDATES {
            fields.insert(UPDATED_AT.to_string(), timestamp_value(Utc::now())?);
        }
        Ok(fields)
    }
}

/// Listing reads and writes with the public / admin failure policy
#[derive(Clone)]
pub struct ListingRepository {
    listings: Collection<Listing>,
}

impl ListingRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            listings: Collection::new(store),
        }
    }

    /// Active listings for public pages. Permission-denied surfaces as
    /// `Unavailable` so the caller can substitute sample data.
    pub async fn fetch_active(&self) -> DeskResult<Vec<Listing>> {
        info!("Fetching active listings");
        let listings = self
            .listings
            .list_where("adminStatus", &Value::from("active"))
            .await
            .map_err(DeskError::from_public_read)?;
        // Non-active rows must never reach public pages, whatever the backend
        Ok(listings.into_iter().filter(Listing::is_active).collect())
    }

    /// Every listing regardless of status, for the admin dashboard
    pub async fn fetch_all(&self) -> DeskResult<Vec<Listing>> {
        info!("Fetching all listings");
        self.listings.list().await.map_err(DeskError::from_admin_read)
    }

    /// Admin lookup, any status
    pub async fn get_by_id(&self, id: &str) -> DeskResult<Option<Listing>> {
        self.listings.get(id).await.map_err(DeskError::from_admin_read)
    }

    /// Public lookup: non-active listings read as missing
    pub async fn get_active_by_id(&self, id: &str) -> DeskResult<Option<Listing>> {
        let found = self
            .listings
            .get(id)
            .await
            .map_err(DeskError::from_public_read)?;
        Ok(found.filter(Listing::is_active))
    }

    pub async fn create(&self, draft: NewListing) -> DeskResult<Listing> {
        let draft = draft.normalized();
        draft.validate()?;
        let listing = self
            .listings
            .create(&draft)
            .await
            .map_err(|e| DeskError::from_write("create", e))?;
        info!("Created listing {} ({})", listing.id, listing.title());
        Ok(listing)
    }

    /// Partial update, last write wins
    pub async fn update(&self, id: &str, patch: &ListingPatch) -> DeskResult<()> {
        self.validate_patch(id, patch).await?;
        self.listings
            .update(id, patch)
            .await
            .map_err(|e| DeskError::from_write("update", e))?;
        debug!("Updated listing {}", id);
        Ok(())
    }

    /// Partial update that fails with `Conflict` when the listing changed
    /// after `expected_updated_at`
    pub async fn update_if_unchanged(
        &self,
        id: &str,
        expected_updated_at: DateTime<Utc>,
        patch: &ListingPatch,
    ) -> DeskResult<()> {
        self.validate_patch(id, patch).await?;
        self.listings
            .update_if_unchanged(id, expected_updated_at, patch)
            .await
            .map_err(|e| DeskError::from_write("update", e))
    }

    pub async fn set_status(&self, id: &str, status: AdminStatus) -> DeskResult<()> {
        self.update(id, &ListingPatch::status(status)).await
    }

    /// Hard delete, no recovery
    pub async fn delete(&self, id: &str) -> DeskResult<()> {
        self.listings
            .delete(id)
            .await
            .map_err(|e| DeskError::from_write("delete", e))?;
        info!("Deleted listing {}", id);
        Ok(())
    }

    async fn validate_patch(&self, id: &str, patch: &ListingPatch) -> DeskResult<()> {
        patch.validate()?;
        if patch.touches_price() {
            let current = self
                .listings
                .get(id)
                .await
                .map_err(|e| DeskError::from_write("update", e))?
                .ok_or_else(|| DeskError::NotFound(format!("{}/{}", collections::LISTINGS, id)))?;
            let (min, max) = patch.merged_price(&current);
            validate_price_range(min, max)?;
        }
        Ok(())
    }
}

/// Areas, channel partners, testimonials and enquiries.
///
/// These pages have no sample data: read failures surface as `QueryFailed`.
#[derive(Clone)]
pub struct CmsRepository {
    areas: Collection<Area>,
    partners: Collection<ChannelPartner>,
    testimonials: Collection<Testimonial>,
    enquiries: Collection<Enquiry>,
}

fn read_err(err: StoreError) -> DeskError {
    DeskError::from_admin_read(err)
}

fn not_found(collection: &str, id: &str) -> DeskError {
    DeskError::NotFound(format!("{collection}/{id}"))
}

impl CmsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            areas: Collection::new(Arc::clone(&store)),
            partners: Collection::new(Arc::clone(&store)),
            testimonials: Collection::new(Arc::clone(&store)),
            enquiries: Collection::new(store),
        }
    }

    // ==================== Areas ====================

    pub async fn areas(&self) -> DeskResult<Vec<Area>> {
        self.areas.list().await.map_err(read_err)
    }

    pub async fn area(&self, id: &str) -> DeskResult<Area> {
        self.areas
            .get(id)
            .await
            .map_err(read_err)?
            .ok_or_else(|| not_found(collections::AREAS, id))
    }

    pub async fn add_area(&self, draft: &AreaDraft) -> DeskResult<Area> {
        self.areas
            .create(draft)
            .await
            .map_err(|e| DeskError::from_write("create", e))
    }

    pub async fn update_area<P: Serialize + ?Sized>(&self, id: &str, patch: &P) -> DeskResult<()> {
        self.areas
            .update(id, patch)
            .await
            .map_err(|e| DeskError::from_write("update", e))
    }

    pub async fn delete_area(&self, id: &str) -> DeskResult<()> {
        self.areas
            .delete(id)
            .await
            .map_err(|e| DeskError::from_write("delete", e))
    }

    // ==================== Channel partners ====================

    /// Active partners only when `only_active`, else every partner
    pub async fn channel_partners(&self, only_active: bool) -> DeskResult<Vec<ChannelPartner>> {
        if only_active {
            let active = serde_json::to_value(PartnerStatus::Active)
                .map_err(|e| read_err(e.into()))?;
            self.partners.list_where("status", &active).await.map_err(read_err)
        } else {
            self.partners.list().await.map_err(read_err)
        }
    }

    pub async fn channel_partner(&self, id: &str) -> DeskResult<ChannelPartner> {
        self.partners
            .get(id)
            .await
            .map_err(read_err)?
            .ok_or_else(|| not_found(collections::CHANNEL_PARTNERS, id))
    }

    pub async fn add_channel_partner(&self, draft: &ChannelPartnerDraft) -> DeskResult<ChannelPartner> {
        self.partners
            .create(draft)
            .await
            .map_err(|e| DeskError::from_write("create", e))
    }

    pub async fn update_channel_partner<P: Serialize + ?Sized>(
        &self,
        id: &str,
        patch: &P,
    ) -> DeskResult<()> {
        self.partners
            .update(id, patch)
            .await
            .map_err(|e| DeskError::from_write("update", e))
    }

    pub async fn delete_channel_partner(&self, id: &str) -> DeskResult<()> {
        self.partners
            .delete(id)
            .await
            .map_err(|e| DeskError::from_write("delete", e))
    }

    // ==================== Testimonials ====================

    /// Approved testimonials for the public page
    pub async fn approved_testimonials(&self) -> DeskResult<Vec<Testimonial>> {
        let all = self.testimonials.list().await.map_err(read_err)?;
        Ok(all.into_iter().filter(Testimonial::is_approved).collect())
    }

    /// Every testimonial, for moderation
    pub async fn testimonials(&self) -> DeskResult<Vec<Testimonial>> {
        self.testimonials.list().await.map_err(read_err)
    }

    pub async fn testimonial(&self, id: &str) -> DeskResult<Testimonial> {
        self.testimonials
            .get(id)
            .await
            .map_err(read_err)?
            .ok_or_else(|| not_found(collections::TESTIMONIALS, id))
    }

    pub async fn add_testimonial(&self, draft: &TestimonialDraft) -> DeskResult<Testimonial> {
        if !(1..=5).contains(&draft.rating) {
            return Err(DeskError::Validation("Rating must be between 1 and 5.".to_string()));
        }
        self.testimonials
            .create(draft)
            .await
            .map_err(|e| DeskError::from_write("create", e))
    }

    /// Public submission: always stored as pending
    pub async fn submit_testimonial(&self, draft: &TestimonialDraft) -> DeskResult<Testimonial> {
        let pending = TestimonialDraft {
            status: Some(TestimonialStatus::Pending),
            ..draft.clone()
        };
        self.add_testimonial(&pending).await
    }

    pub async fn set_testimonial_status(&self, id: &str, status: TestimonialStatus) -> DeskResult<()> {
        self.testimonials
            .update(id, &serde_json::json!({ "status": status }))
            .await
            .map_err(|e| DeskError::from_write("update", e))
    }

    pub async fn delete_testimonial(&self, id: &str) -> DeskResult<()> {
        self.testimonials
            .delete(id)
            .await
            .map_err(|e| DeskError::from_write("delete", e))
    }

    // ==================== Enquiries ====================

    /// Newest first
    pub async fn enquiries(&self) -> DeskResult<Vec<Enquiry>> {
        let mut enquiries = self.enquiries.list().await.map_err(read_err)?;
        enquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(enquiries)
    }

    pub async fn add_enquiry(&self, draft: &EnquiryDraft) -> DeskResult<Enquiry> {
        if draft.name.trim().is_empty() || draft.phone.trim().is_empty() {
            return Err(DeskError::Validation("Name and phone are required.".to_string()));
        }
        self.enquiries
            .create(draft)
            .await
            .map_err(|e| DeskError::from_write("create", e))
    }

    pub async fn delete_enquiry(&self, id: &str) -> DeskResult<()> {
        self.enquiries
            .delete(id)
            .await
            .map_err(|e| DeskError::from_write("delete", e))
    }
}
