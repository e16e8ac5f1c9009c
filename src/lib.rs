//! Property listing desk: listing storage, search sessions with sample-data
//! fallback, price formatting and enquiry links.

pub mod config;
pub mod contact;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod lookup;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod session;
pub mod store;
pub mod taxonomy;

pub use error::{DeskError, DeskResult, StoreError, StoreResult};
pub use fallback::{FallbackProvider, NoFallback, SampleCatalog};
pub use filter::{filter_listings, partition, FeatureSelection, Lanes, ListingFilter, TransactionIntent};
pub use models::{Category, Listing, NewListing, Ownership, TransactionType};
pub use pricing::{format_price_range, format_rupees_as_lakhs_or_crore};
pub use repository::{CmsRepository, ListingRepository};
pub use session::{DataSource, ListingSearchSession, Scope, SessionStatus};
