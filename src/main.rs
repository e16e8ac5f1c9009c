mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{AdminCommand, CliArgs, Command, SearchArgs};
use property_desk::config::Settings;
use property_desk::contact::{call_link, enquiry_message, whatsapp_link};
use property_desk::fallback::{FallbackProvider, NoFallback, SampleCatalog};
use property_desk::lookup::find_public_listing;
use property_desk::models::{EnquiryDraft, Listing};
use property_desk::pricing::format_price_range;
use property_desk::repository::{CmsRepository, ListingRepository};
use property_desk::session::{ListingSearchSession, Scope, SessionStatus};
use property_desk::store::{self, StoreHandles};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let settings = Settings::load(&args.config, !args.no_config)?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.level)),
        )
        .init();

    let stores = store::open(&settings.store).await?;
    let fallback: Arc<dyn FallbackProvider> = if settings.fallback.enabled {
        Arc::new(SampleCatalog)
    } else {
        Arc::new(NoFallback)
    };

    match args.command {
        Command::Search(search) => run_search(&stores, fallback, &search).await,
        Command::Show { id } => {
            let repo = ListingRepository::new(stores.public.clone());
            match find_public_listing(&repo, fallback.as_ref(), &id).await {
                Ok(listing) => {
                    print_listing_detail(&listing);
                    Ok(())
                }
                Err(err) => {
                    println!("{}", err.banner());
                    Err(err.into())
                }
            }
        }
        Command::Admin(command) => run_admin(&stores, command).await,
        Command::Export { path } => {
            let repo = ListingRepository::new(stores.admin.clone());
            let listings = repo.fetch_all().await?;
            let json = serde_json::to_string_pretty(&listings)?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Saved {} listings to {}", listings.len(), path.display());
            Ok(())
        }
        Command::ContactLink {
            phone,
            name,
            requirement,
            area,
        } => {
            let message = enquiry_message(
                &settings.contact.consultant_name,
                &name,
                requirement,
                area.as_deref(),
            );

            let cms = CmsRepository::new(stores.public.clone());
            let draft = EnquiryDraft {
                name,
                phone,
                requirement,
                area: area.unwrap_or_default(),
            };
            if let Err(err) = cms.add_enquiry(&draft).await {
                warn!("Enquiry not recorded: {}", err);
            }

            println!("WhatsApp: {}", whatsapp_link(&settings.contact.whatsapp_number, &message));
            println!("Call:     {}", call_link(&settings.contact.whatsapp_number));
            Ok(())
        }
    }
}

async fn run_search(
    stores: &StoreHandles,
    fallback: Arc<dyn FallbackProvider>,
    search: &SearchArgs,
) -> Result<()> {
    let repo = ListingRepository::new(stores.public.clone());
    let mut session = ListingSearchSession::new(repo, fallback, Scope::Public);

    session.apply_filters(search.to_filter()?);
    if let Some(query) = &search.query {
        session.set_search_query(query.as_str());
    }
    session.load().await;

    if let SessionStatus::Error(err) = session.status() {
        println!("⚠️  {}", err.banner());
        return Ok(());
    }
    if session.is_sample_data() {
        info!("📋 No live listings yet, showing sample data");
    }

    let results = session.results();
    info!("✅ {} of {} listings match\n", results.len(), session.dataset().len());

    print_lane("Personal listings", &results.personal);
    print_lane("Channel partner listings", &results.channel_partner);
    Ok(())
}

async fn run_admin(stores: &StoreHandles, command: AdminCommand) -> Result<()> {
    let repo = ListingRepository::new(stores.admin.clone());
    match command {
        AdminCommand::List => {
            let mut session = ListingSearchSession::new(repo, Arc::new(NoFallback), Scope::Admin);
            session.load().await;
            if let Some(notice) = session.notice() {
                anyhow::bail!(notice);
            }
            for (i, listing) in session.dataset().iter().enumerate() {
                println!(
                    "{}. [{:?}] {} ({})",
                    i + 1,
                    listing.admin_status,
                    listing.title(),
                    format_price_range(listing.price_range_min, listing.price_range_max)
                );
                println!("   ID: {}", listing.id);
            }
            Ok(())
        }
        AdminCommand::SetStatus { id, status } => {
            repo.set_status(&id, status.into()).await?;
            info!("Listing {} is now {:?}", id, status);
            Ok(())
        }
        AdminCommand::Delete { id } => {
            repo.delete(&id).await?;
            info!("🗑️  Deleted listing {}", id);
            Ok(())
        }
    }
}

fn print_lane(heading: &str, listings: &[Listing]) {
    println!("{} ({})", heading, listings.len());
    if listings.is_empty() {
        println!("   No listings match these filters.");
    }
    for (i, listing) in listings.iter().enumerate() {
        println!(
            "{}. {} ({})",
            i + 1,
            listing.title(),
            format_price_range(listing.price_range_min, listing.price_range_max)
        );
        println!(
            "   {} · {}",
            listing.category.label(),
            listing.transaction_type.label()
        );
        if let Some(tag) = &listing.status_tag {
            println!("   Tag: {:?}", tag);
        }
        println!("   ID: {}", listing.id);
    }
    println!();
}

fn print_listing_detail(listing: &Listing) {
    println!("{}", listing.title());
    println!("   Price: {}", format_price_range(listing.price_range_min, listing.price_range_max));
    println!("   Category: {}", listing.category.label());
    if let Some(statement) = &listing.value_statement {
        println!("   {}", statement);
    }
    if !listing.features.is_empty() {
        println!("   Features: {}", listing.features.join(", "));
    }
    if let Some(media) = listing.primary_media() {
        println!("   Photo: {}", media.url);
    }
    println!("   ID: {}", listing.id);
}
