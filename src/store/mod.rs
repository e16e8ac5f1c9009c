pub mod memory;
pub mod rest;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod failing;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Backend, StoreSettings};

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use traits::DocumentStore;
pub use types::{to_fields, AccessPolicy, Document, FieldRule, Fields};

/// Collection names shared by every backend
pub mod collections {
    pub const LISTINGS: &str = "listings";
    pub const AREAS: &str = "areas";
    pub const CHANNEL_PARTNERS: &str = "channelPartners";
    pub const TESTIMONIALS: &str = "testimonials";
    pub const ENQUIRIES: &str = "enquiries";
}

/// Operator and visitor handles on the same data
#[derive(Clone)]
pub struct StoreHandles {
    pub admin: Arc<dyn DocumentStore>,
    pub public: Arc<dyn DocumentStore>,
}

/// Open the configured backend
pub async fn open(settings: &StoreSettings) -> Result<StoreHandles> {
    match settings.backend {
        Backend::Memory => {
            let store = MemoryStore::new();
            if let Some(path) = &settings.seed_file {
                store
                    .load_seed_file(collections::LISTINGS, path)
                    .await
                    .with_context(|| format!("Failed to seed listings from {}", path.display()))?;
            }
            info!("Using in-memory document store");
            let public = store.public_view(AccessPolicy::public_site());
            Ok(StoreHandles {
                admin: Arc::new(store),
                public: Arc::new(public),
            })
        }
        Backend::Rest => {
            let base_url = settings
                .base_url
                .as_deref()
                .context("store.base_url is required for the rest backend")?;
            let timeout = Duration::from_secs(settings.timeout_secs);
            let admin = RestStore::new(base_url, settings.api_key.clone(), timeout)
                .context("Failed to create operator client")?;
            let public = RestStore::new(base_url, None, timeout)
                .context("Failed to create visitor client")?;
            info!("Using document API at {}", base_url);
            Ok(StoreHandles {
                admin: Arc::new(admin),
                public: Arc::new(public),
            })
        }
    }
}
