//! Search session: owns the filter state, loads the candidate set for its
//! visibility scope and keeps the filtered, lane-partitioned results
//! current.
//!
//! State machine:
//!
//! ```text
//! Idle ──begin_load──▶ Loading ──ok──────────────▶ Loaded
//!                         │  └─public: empty / denied ─▶ Loaded (sample data)
//!                         └──────────error──────────▶ Error
//! ```
//!
//! Filtering is client-side over the cached set, so filter changes never
//! re-enter `Loading`. Only a scope change calls for a new load.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{DeskError, DeskResult};
use crate::fallback::FallbackProvider;
use crate::filter::{filter_listings, partition, Lanes, ListingFilter, TransactionIntent};
use crate::models::{Category, Listing};
use crate::repository::ListingRepository;

/// Which listings a session may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Anonymous visitors: active listings only, sample data on refusal
    Public,
    /// Logged-in operator: every listing, failures always surfaced
    Admin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Loaded,
    Error(DeskError),
}

/// Where the cached dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    None,
    Live,
    Sample,
}

/// Identifies one load. Completions carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A pending fetch, detached from the session so the host can run it on
/// its own task
pub struct LoadRequest {
    ticket: LoadTicket,
    scope: Scope,
    repository: ListingRepository,
}

impl LoadRequest {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub async fn run(self) -> LoadOutcome {
        let result = match self.scope {
            Scope::Public => self.repository.fetch_active().await,
            Scope::Admin => self.repository.fetch_all().await,
        };
        LoadOutcome {
            ticket: self.ticket,
            scope: self.scope,
            result,
        }
    }
}

pub struct LoadOutcome {
    ticket: LoadTicket,
    scope: Scope,
    result: DeskResult<Vec<Listing>>,
}

pub struct ListingSearchSession {
    repository: ListingRepository,
    fallback: Arc<dyn FallbackProvider>,
    scope: Scope,
    filter: ListingFilter,
    status: SessionStatus,
    dataset: Vec<Listing>,
    source: DataSource,
    generation: u64,
    results: Lanes,
}

impl ListingSearchSession {
    pub fn new(
        repository: ListingRepository,
        fallback: Arc<dyn FallbackProvider>,
        scope: Scope,
    ) -> Self {
        Self {
            repository,
            fallback,
            scope,
            filter: starting_filter(scope),
            status: SessionStatus::Idle,
            dataset: Vec::new(),
            source: DataSource::None,
            generation: 0,
            results: Lanes::default(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    /// Cached candidate set before filtering
    pub fn dataset(&self) -> &[Listing] {
        &self.dataset
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn is_sample_data(&self) -> bool {
        self.source == DataSource::Sample
    }

    /// Filtered results split by ownership
    pub fn results(&self) -> &Lanes {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Banner text for the current error, if any
    pub fn notice(&self) -> Option<String> {
        match &self.status {
            SessionStatus::Error(err) => Some(match self.scope {
                Scope::Public => err.banner(),
                Scope::Admin => err.to_string(),
            }),
            _ => None,
        }
    }

    // ==================== Filter changes ====================

    /// Category tab; `None` is "All"
    pub fn set_category(&mut self, category: Option<Category>) {
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_transaction(&mut self, transaction: Option<TransactionIntent>) {
        self.filter.transaction = transaction;
        self.recompute();
    }

    /// Hero search box text
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
        self.recompute();
    }

    /// Apply the filter modal. Everything is replaced except the search box
    /// text, which the modal does not own.
    pub fn apply_filters(&mut self, filters: ListingFilter) {
        let search = std::mem::take(&mut self.filter.search);
        self.filter = ListingFilter { search, ..filters };
        self.recompute();
    }

    /// Reset every modal field, keeping the search box text
    pub fn clear_filters(&mut self) {
        self.apply_filters(starting_filter(self.scope));
    }

    // ==================== Loading ====================

    /// Switch visibility scope. Returns `true` when the cached data was
    /// dropped and a new load is needed.
    pub fn set_scope(&mut self, scope: Scope) -> bool {
        if scope == self.scope {
            return false;
        }
        info!("Session scope changed to {:?}", scope);
        self.scope = scope;
        self.generation += 1;
        self.status = SessionStatus::Idle;
        self.dataset.clear();
        self.source = DataSource::None;
        self.recompute();
        true
    }

    /// Enter `Loading` and hand out the fetch to run
    pub fn begin_load(&mut self) -> LoadRequest {
        self.generation += 1;
        self.status = SessionStatus::Loading;
        debug!("Starting load #{} ({:?})", self.generation, self.scope);
        LoadRequest {
            ticket: LoadTicket(self.generation),
            scope: self.scope,
            repository: self.repository.clone(),
        }
    }

    /// Apply a finished fetch. Returns `false` when the outcome was stale
    /// and discarded.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.ticket != LoadTicket(self.generation) || outcome.scope != self.scope {
            debug!("Discarding stale load #{}", outcome.ticket.0);
            return false;
        }

        match (self.scope, outcome.result) {
            (Scope::Public, Ok(listings)) if listings.is_empty() => {
                warn!("No active listings found");
                self.substitute_sample_data(None);
            }
            (Scope::Public, Err(DeskError::Unavailable(reason))) => {
                warn!("Listings refused for public read: {}", reason);
                self.substitute_sample_data(Some(DeskError::Unavailable(reason)));
            }
            (_, Ok(listings)) => {
                info!("✅ Loaded {} listings", listings.len());
                self.dataset = listings;
                self.source = DataSource::Live;
                self.status = SessionStatus::Loaded;
            }
            (_, Err(err)) => self.fail(err),
        }
        self.recompute();
        true
    }

    /// Fetch for the current scope and apply the result
    pub async fn load(&mut self) {
        let request = self.begin_load();
        let outcome = request.run().await;
        self.complete_load(outcome);
    }

    /// Invalidate any in-flight load, e.g. when the view goes away
    pub fn close(&mut self) {
        self.generation += 1;
        if self.status == SessionStatus::Loading {
            self.status = SessionStatus::Idle;
        }
    }

    fn substitute_sample_data(&mut self, cause: Option<DeskError>) {
        let samples = self.fallback.listings();
        match (samples.is_empty(), cause) {
            (false, _) => {
                info!(
                    "📋 Showing {} listings from {}",
                    samples.len(),
                    self.fallback.name()
                );
                self.dataset = samples;
                self.source = DataSource::Sample;
                self.status = SessionStatus::Loaded;
            }
            (true, Some(err)) => self.fail(err),
            (true, None) => {
                self.dataset.clear();
                self.source = DataSource::Live;
                self.status = SessionStatus::Loaded;
            }
        }
    }

    fn fail(&mut self, err: DeskError) {
        warn!("Listing load failed: {}", err);
        self.dataset.clear();
        self.source = DataSource::None;
        self.status = SessionStatus::Error(err);
    }

    fn recompute(&mut self) {
        self.results = partition(filter_listings(&self.dataset, &self.filter));
    }
}

/// Visitors start on buying listings; operators see everything
fn starting_filter(scope: Scope) -> ListingFilter {
    match scope {
        Scope::Public => ListingFilter::initial(),
        Scope::Admin => ListingFilter::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{NoFallback, SampleCatalog};
    use crate::models::{AdminStatus, ListingMedia, NewListing, Ownership, TransactionType};
    use crate::store::failing::FailingStore;
    use crate::store::{AccessPolicy, DocumentStore, MemoryStore};

    fn draft(area: &str, ownership: Ownership, tx: TransactionType) -> NewListing {
        NewListing {
            ownership,
            transaction_type: tx,
            category: Category::Residential,
            area: area.to_string(),
            property_type: "2 BHK Apartment".to_string(),
            price_range_min: Some(75_00_000),
            price_range_max: Some(95_00_000),
            status_tag: None,
            admin_status: AdminStatus::Active,
            media: ListingMedia::images_from_urls(&["https://img/1.jpg"], 0),
            value_statement: None,
            features: vec![],
        }
    }

    fn session_over(store: Arc<dyn DocumentStore>, scope: Scope) -> ListingSearchSession {
        ListingSearchSession::new(ListingRepository::new(store), Arc::new(SampleCatalog), scope)
    }

    async fn seeded_stores(count: usize) -> (MemoryStore, MemoryStore) {
        let admin = MemoryStore::new();
        let repo = ListingRepository::new(Arc::new(admin.clone()));
        for i in 0..count {
            let ownership = if i % 2 == 0 { Ownership::Personal } else { Ownership::ChannelPartner };
            repo.create(draft(&format!("Area {i}"), ownership, TransactionType::Buying))
                .await
                .unwrap();
        }
        let public = admin.public_view(AccessPolicy::public_site());
        (admin, public)
    }

    #[tokio::test]
    async fn test_empty_collection_engages_sample_data() {
        let (_, public) = seeded_stores(0).await;
        let mut session = session_over(Arc::new(public), Scope::Public);
        assert_eq!(session.status(), &SessionStatus::Idle);

        session.load().await;
        assert_eq!(session.status(), &SessionStatus::Loaded);
        assert!(session.is_sample_data());
        assert!(!session.dataset().is_empty());
        assert!(!session.results().personal.is_empty());
        assert!(!session.results().channel_partner.is_empty());
    }

    #[tokio::test]
    async fn test_live_data_is_never_mixed_with_samples() {
        let (_, public) = seeded_stores(3).await;
        let mut session = session_over(Arc::new(public), Scope::Public);
        session.load().await;

        assert_eq!(session.source(), DataSource::Live);
        assert_eq!(session.dataset().len(), 3);
        assert_eq!(session.results().len(), 3);
        assert_eq!(session.results().personal.len(), 2);
        assert_eq!(session.results().channel_partner.len(), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_degrades_to_samples_silently() {
        let mut session = session_over(Arc::new(FailingStore::permission_denied()), Scope::Public);
        session.load().await;
        assert_eq!(session.status(), &SessionStatus::Loaded);
        assert!(session.is_sample_data());
        assert_eq!(session.notice(), None);
    }

    #[tokio::test]
    async fn test_network_failure_shows_banner_with_empty_lanes() {
        let mut session = session_over(Arc::new(FailingStore::network()), Scope::Public);
        session.load().await;
        assert!(matches!(session.status(), SessionStatus::Error(DeskError::QueryFailed(_))));
        assert!(session.results().is_empty());
        assert_eq!(
            session.notice().as_deref(),
            Some("Listings are temporarily unavailable. Please try again in a moment.")
        );
    }

    #[tokio::test]
    async fn test_admin_scope_never_falls_back() {
        let mut denied = session_over(Arc::new(FailingStore::permission_denied()), Scope::Admin);
        denied.load().await;
        assert!(matches!(denied.status(), SessionStatus::Error(_)));
        assert!(denied.dataset().is_empty());
        assert!(denied.notice().unwrap().contains("permission denied"));

        let (admin, _) = seeded_stores(0).await;
        let mut empty = session_over(Arc::new(admin), Scope::Admin);
        empty.load().await;
        assert_eq!(empty.status(), &SessionStatus::Loaded);
        assert_eq!(empty.source(), DataSource::Live);
        assert!(empty.dataset().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_fallback_leaves_public_page_empty() {
        let (_, public) = seeded_stores(0).await;
        let mut session = ListingSearchSession::new(
            ListingRepository::new(Arc::new(public)),
            Arc::new(NoFallback),
            Scope::Public,
        );
        session.load().await;
        assert_eq!(session.status(), &SessionStatus::Loaded);
        assert!(session.dataset().is_empty());

        let mut refused = ListingSearchSession::new(
            ListingRepository::new(Arc::new(FailingStore::permission_denied())),
            Arc::new(NoFallback),
            Scope::Public,
        );
        refused.load().await;
        assert!(matches!(refused.status(), SessionStatus::Error(DeskError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_filter_changes_recompute_without_reloading() {
        let (admin, public) = seeded_stores(0).await;
        let repo = ListingRepository::new(Arc::new(admin));
        repo.create(draft("Baner", Ownership::Personal, TransactionType::Buying)).await.unwrap();
        repo.create(draft("Wakad", Ownership::Personal, TransactionType::Selling)).await.unwrap();

        let mut session = session_over(Arc::new(public), Scope::Public);
        assert_eq!(session.filter().transaction, Some(TransactionIntent::Buying));
        session.load().await;
        assert_eq!(session.dataset().len(), 2);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results().personal[0].area, "Baner");

        session.set_transaction(None);
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.status(), &SessionStatus::Loaded);

        session.set_transaction(Some(TransactionIntent::Rent));
        assert_eq!(session.results().len(), 2);

        session.set_search_query("wak");
        assert_eq!(session.results().personal[0].area, "Wakad");

        session.apply_filters(ListingFilter {
            price_min_lakhs: Some(96),
            ..Default::default()
        });
        assert_eq!(session.filter().search, "wak");
        assert!(session.results().is_empty());

        session.clear_filters();
        assert_eq!(session.filter().transaction, Some(TransactionIntent::Buying));
        assert_eq!(session.filter().price_min_lakhs, None);
        assert!(session.results().is_empty());

        session.set_search_query("");
        assert_eq!(session.results().len(), 1);
        session.set_category(Some(Category::Land));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_operators_start_unconstrained() {
        let session = session_over(Arc::new(MemoryStore::new()), Scope::Admin);
        assert!(session.filter().is_unconstrained());
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let (_, public) = seeded_stores(2).await;
        let mut session = session_over(Arc::new(public), Scope::Public);

        let first = session.begin_load();
        let second = session.begin_load();
        assert_ne!(first.ticket(), second.ticket());

        let late = first.run().await;
        assert!(!session.complete_load(late));
        assert!(session.is_loading());

        let current = second.run().await;
        assert!(session.complete_load(current));
        assert_eq!(session.dataset().len(), 2);
    }

    #[tokio::test]
    async fn test_close_invalidates_in_flight_load() {
        let (_, public) = seeded_stores(1).await;
        let mut session = session_over(Arc::new(public), Scope::Public);
        let request = session.begin_load();
        session.close();
        assert_eq!(session.status(), &SessionStatus::Idle);

        let outcome = request.run().await;
        assert!(!session.complete_load(outcome));
        assert!(session.dataset().is_empty());
    }

    #[tokio::test]
    async fn test_scope_change_requires_reload() {
        let (admin, _) = seeded_stores(0).await;
        let repo = ListingRepository::new(Arc::new(admin.clone()));
        let mut hidden = draft("Baner", Ownership::Personal, TransactionType::Buying);
        hidden.admin_status = AdminStatus::Hidden;
        repo.create(hidden).await.unwrap();

        let mut session = session_over(Arc::new(admin), Scope::Admin);
        session.load().await;
        assert_eq!(session.dataset().len(), 1);

        assert!(!session.set_scope(Scope::Admin));
        assert!(session.set_scope(Scope::Public));
        assert_eq!(session.status(), &SessionStatus::Idle);
        assert!(session.dataset().is_empty());

        session.load().await;
        assert!(session
            .dataset()
            .iter()
            .all(|l| l.admin_status == AdminStatus::Active));
    }
}
