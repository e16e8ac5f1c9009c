//! Single-listing lookups for the detail page and the admin editor.

use tracing::{debug, info};

use crate::error::{DeskError, DeskResult};
use crate::fallback::FallbackProvider;
use crate::models::Listing;
use crate::repository::ListingRepository;

/// Detail page lookup. Falls back to the sample catalog when the id is not
/// live or public reads are refused, so sample cards always open.
pub async fn find_public_listing(
    repository: &ListingRepository,
    fallback: &dyn FallbackProvider,
    id: &str,
) -> DeskResult<Listing> {
    match repository.get_active_by_id(id).await {
        Ok(Some(listing)) => Ok(listing),
        Ok(None) | Err(DeskError::Unavailable(_)) => {
            debug!("Listing {} not live, checking {}", id, fallback.name());
            fallback.find(id).ok_or_else(|| DeskError::NotFound(id.to_string()))
        }
        Err(err) => Err(err),
    }
}

/// Editor lookup. Any status, never sample data.
pub async fn find_listing_for_edit(repository: &ListingRepository, id: &str) -> DeskResult<Listing> {
    info!("Loading listing {} for edit", id);
    repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| DeskError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::fallback::{NoFallback, SampleCatalog};
    use crate::models::{AdminStatus, Category, ListingMedia, NewListing, Ownership, TransactionType};
    use crate::store::failing::FailingStore;
    use crate::store::{AccessPolicy, MemoryStore};

    fn draft(status: AdminStatus) -> NewListing {
        NewListing {
            ownership: Ownership::Personal,
            transaction_type: TransactionType::Selling,
            category: Category::Commercial,
            area: "Hadapsar".to_string(),
            property_type: "Office Space".to_string(),
            price_range_min: None,
            price_range_max: Some(1_20_00_000),
            status_tag: None,
            admin_status: status,
            media: ListingMedia::images_from_urls(&["https://img/office.jpg"], 0),
            value_statement: None,
            features: vec![],
        }
    }

    #[tokio::test]
    async fn test_live_listing_is_returned() {
        let admin = MemoryStore::new();
        let created = ListingRepository::new(Arc::new(admin.clone()))
            .create(draft(AdminStatus::Active))
            .await
            .unwrap();
        let public = ListingRepository::new(Arc::new(admin.public_view(AccessPolicy::public_site())));

        let found = find_public_listing(&public, &SampleCatalog, &created.id).await.unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_hidden_listing_is_not_found_publicly_but_editable() {
        let admin = MemoryStore::new();
        let admin_repo = ListingRepository::new(Arc::new(admin.clone()));
        let created = admin_repo.create(draft(AdminStatus::Hidden)).await.unwrap();
        let public = ListingRepository::new(Arc::new(admin.public_view(AccessPolicy::public_site())));

        let err = find_public_listing(&public, &SampleCatalog, &created.id).await.unwrap_err();
        assert_eq!(err, DeskError::NotFound(created.id.clone()));
        assert_eq!(err.banner(), "Listing not found.");

        let editable = find_listing_for_edit(&admin_repo, &created.id).await.unwrap();
        assert_eq!(editable.admin_status, AdminStatus::Hidden);
    }

    #[tokio::test]
    async fn test_sample_ids_resolve_from_fallback() {
        let empty = ListingRepository::new(Arc::new(MemoryStore::new()));
        let found = find_public_listing(&empty, &SampleCatalog, "sample-baner-2bhk").await.unwrap();
        assert_eq!(found.area, "Baner");

        let denied = ListingRepository::new(Arc::new(FailingStore::permission_denied()));
        assert!(find_public_listing(&denied, &SampleCatalog, "sample-baner-2bhk").await.is_ok());
        assert!(matches!(
            find_public_listing(&denied, &NoFallback, "sample-baner-2bhk").await,
            Err(DeskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let broken = ListingRepository::new(Arc::new(FailingStore::network()));
        let err = find_public_listing(&broken, &SampleCatalog, "sample-baner-2bhk")
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        let err = find_listing_for_edit(&broken, "abc").await.unwrap_err();
        assert!(matches!(err, DeskError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_edit_lookup_of_missing_id() {
        let repo = ListingRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(
            find_listing_for_edit(&repo, "missing").await.unwrap_err(),
            DeskError::NotFound("missing".to_string())
        );
    }
}
