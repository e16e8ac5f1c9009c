//! WhatsApp and phone deep links for enquiries.

use url::form_urlencoded;

use crate::models::{Listing, Requirement};

/// Digits only, with India's country code added to bare 10-digit numbers
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("91{digits}")
    } else {
        digits
    }
}

/// Opening message for the enquiry form
pub fn enquiry_message(
    consultant: &str,
    name: &str,
    requirement: Requirement,
    area: Option<&str>,
) -> String {
    let location = match area.map(str::trim).filter(|a| !a.is_empty()) {
        Some(area) => format!(" in {area}"),
        None => String::new(),
    };
    format!(
        "Hi {consultant}, I'm looking for a property{location}. My name is {}. I'm interested in {}. Please help me!",
        name.trim(),
        requirement.gerund()
    )
}

/// Opening message from a listing card
pub fn listing_enquiry_message(consultant: &str, listing: &Listing) -> String {
    format!(
        "Hi {consultant}, I'm interested in the {} property in {} you listed. Could we talk?",
        listing.category.label().to_lowercase(),
        listing.area
    )
}

pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let text: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    // Literal '+' is already escaped as %2B, so any '+' left is a space
    format!(
        "https://wa.me/{}?text={}",
        format_phone_number(phone),
        text.replace('+', "%20")
    )
}

pub fn call_link(phone: &str) -> String {
    format!("tel:+{}", format_phone_number(phone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{FallbackProvider, SampleCatalog};

    #[test]
    fn test_phone_number_normalisation() {
        assert_eq!(format_phone_number("98811 99152"), "919881199152");
        assert_eq!(format_phone_number("+91 98811-99152"), "919881199152");
        assert_eq!(format_phone_number("919881199152"), "919881199152");
    }

    #[test]
    fn test_enquiry_message_with_and_without_area() {
        assert_eq!(
            enquiry_message("Charushila", " Asha ", Requirement::Buy, Some("Baner")),
            "Hi Charushila, I'm looking for a property in Baner. My name is Asha. I'm interested in buying. Please help me!"
        );
        assert_eq!(
            enquiry_message("Charushila", "Asha", Requirement::Invest, Some("  ")),
            "Hi Charushila, I'm looking for a property. My name is Asha. I'm interested in investing. Please help me!"
        );
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link("9881199152", "Hi, 2+2 BHK & more?");
        assert_eq!(
            link,
            "https://wa.me/919881199152?text=Hi%2C%202%2B2%20BHK%20%26%20more%3F"
        );
        assert_eq!(call_link("9881199152"), "tel:+919881199152");
    }

    #[test]
    fn test_listing_enquiry_mentions_area() {
        let listing = SampleCatalog.find("sample-baner-2bhk").unwrap();
        let message = listing_enquiry_message("Charushila", &listing);
        assert!(message.contains("residential property in Baner"));
    }
}
