pub mod cms;
pub mod listing;

pub use cms::{
    Area, AreaDraft, ChannelPartner, ChannelPartnerDraft, Enquiry, EnquiryDraft, PartnerStatus,
    Requirement, Testimonial, TestimonialDraft, TestimonialStatus,
};
pub use listing::{
    AdminStatus, Category, Listing, ListingMedia, ListingPatch, MediaKind, NewListing, Ownership,
    StatusTag, TransactionType,
};
