use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Locality the consultant covers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    /// Broadcast group link shown on the "Areas I cover" cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_broadcast_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaDraft {
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_broadcast_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    Active,
    Inactive,
}

/// Developer or agency whose inventory appears in the partner lane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPartner {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
    pub status: PartnerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPartnerDraft {
    pub name: String,
    pub description: String,
    pub property_types: Vec<String>,
    pub areas: Vec<String>,
    pub status: PartnerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Public submissions start as `Pending` until an operator approves them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    Pending,
    Approved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub client_name: String,
    pub area: String,
    pub testimonial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TestimonialStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Testimonial {
    /// Records written before moderation existed carry no status and count
    /// as approved.
    pub fn is_approved(&self) -> bool {
        self.status.unwrap_or(TestimonialStatus::Approved) == TestimonialStatus::Approved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialDraft {
    pub client_name: String,
    pub area: String,
    pub testimonial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TestimonialStatus>,
}

/// What a visitor is looking to do
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Buy,
    Rent,
    Invest,
}

impl Requirement {
    pub fn gerund(self) -> &'static str {
        match self {
            Requirement::Buy => "buying",
            Requirement::Rent => "renting",
            Requirement::Invest => "investing",
        }
    }
}

impl std::str::FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Requirement::Buy),
            "rent" => Ok(Requirement::Rent),
            "invest" => Ok(Requirement::Invest),
            other => Err(format!("unknown requirement: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub requirement: Requirement,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryDraft {
    pub name: String,
    pub phone: String,
    pub requirement: Requirement,
    pub area: String,
}
