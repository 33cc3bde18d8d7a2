use crate::entities::listing::{ContactLinks, Listing};

/// Dial and chat links for a listing's contact number.
pub fn contact_links(listing: &Listing) -> ContactLinks {
    let number = listing.contact_number.trim();
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    let message = format!(
        "Hi, I'm interested in your room listing: {}\n\nLocation: {}\nRent: ₹{}/month",
        listing.title, listing.location, listing.price
    );

    ContactLinks {
        tel: format!("tel:{}", number),
        whatsapp: format!("https://wa.me/{}?text={}", digits, urlencoding::encode(&message)),
    }
}
