use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use property_desk::filter::{FeatureSelection, ListingFilter, TransactionIntent};
use property_desk::models::{AdminStatus, Category, Requirement};
use property_desk::taxonomy::FeatureGroup;

/// Command-line arguments accepted by the `property-desk` binary.
#[derive(Parser, Debug)]
#[command(
    name = "property-desk",
    version,
    about = "Search, manage and share property listings"
)]
pub struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "PROPERTY_DESK_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading property-desk.toml from the working directory"
    )]
    pub no_config: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search public listings and print both ownership lanes
    Search(SearchArgs),
    /// Show one public listing, sample listings included
    Show { id: String },
    /// Operator commands; every status is visible
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Write every listing to a JSON file
    Export { path: PathBuf },
    /// Build WhatsApp and call links for an enquiry
    ContactLink {
        phone: String,
        name: String,
        requirement: Requirement,
        #[arg(long)]
        area: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List all listings
    List,
    /// Change a listing's visibility
    SetStatus { id: String, status: StatusArg },
    /// Delete a listing
    Delete { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    Active,
    Sold,
    Hidden,
}

impl From<StatusArg> for AdminStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => AdminStatus::Active,
            StatusArg::Sold => AdminStatus::Sold,
            StatusArg::Hidden => AdminStatus::Hidden,
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long, value_name = "CATEGORY", help = "land, commercial or residential (default: all)")]
    pub category: Option<Category>,
    #[arg(long, value_name = "TYPE", help = "buying, selling or rent; rent shows all (default: buying)")]
    pub transaction: Option<TransactionIntent>,
    #[arg(long = "min-lakhs", value_name = "LAKHS")]
    pub min_lakhs: Option<u64>,
    #[arg(long = "max-lakhs", value_name = "LAKHS")]
    pub max_lakhs: Option<u64>,
    #[arg(short = 'q', long, value_name = "TEXT", help = "Match area or property type")]
    pub query: Option<String>,
    #[arg(long = "feature", value_name = "FEATURE", action = ArgAction::Append)]
    pub features: Vec<String>,
    #[arg(long, value_name = "WORDS")]
    pub keywords: Option<String>,
    #[arg(long = "priced-only", help = "Hide listings without a stated price")]
    pub priced_only: bool,
}

impl SearchArgs {
    /// Modal filters; the free-text query is applied separately
    pub fn to_filter(&self) -> Result<ListingFilter> {
        let mut features = FeatureSelection::default();
        for feature in &self.features {
            let Some((group, label)) = FeatureGroup::canonical(feature) else {
                bail!("unknown feature: {feature}");
            };
            let list = match group {
                FeatureGroup::Outdoor => &mut features.outdoor,
                FeatureGroup::Indoor => &mut features.indoor,
                FeatureGroup::Climate => &mut features.climate,
                FeatureGroup::Accessibility => &mut features.accessibility,
            };
            // Repeating a flag selects once; it never unticks
            if !list.iter().any(|f| f == label) {
                list.push(label.to_string());
            }
        }

        Ok(ListingFilter {
            category: self.category,
            transaction: Some(self.transaction.unwrap_or(TransactionIntent::Buying)),
            price_min_lakhs: self.min_lakhs,
            price_max_lakhs: self.max_lakhs,
            search: String::new(),
            features,
            keywords: self.keywords.clone().unwrap_or_default(),
            priced_only: self.priced_only,
        })
    }
}
