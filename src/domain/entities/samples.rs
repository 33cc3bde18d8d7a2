use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::listing::{Listing, PropertyType, TenantPreference};

// Demo rows shown on an empty development database.
const SAMPLES: [(&str, &str, i32, PropertyType, TenantPreference, &str); 6] = [
    ("Modern 1BHK with Natural Light", "Koramangala, Bangalore", 15000, PropertyType::OneBhk, TenantPreference::Working, "+919876543210"),
    ("Cozy Furnished Apartment", "Indiranagar, Bangalore", 18000, PropertyType::TwoBhk, TenantPreference::Family, "+919876543211"),
    ("Bright Studio with City View", "HSR Layout, Bangalore", 12000, PropertyType::OneBed, TenantPreference::Bachelor, "+919876543212"),
    ("Elegant Premium Room", "Whitefield, Bangalore", 22000, PropertyType::TwoBhk, TenantPreference::Family, "+919876543213"),
    ("Spacious 2BHK with Balcony", "Electronic City, Bangalore", 14000, PropertyType::TwoBhk, TenantPreference::Working, "+919876543214"),
    ("Furnished Room for Students", "BTM Layout, Bangalore", 8000, PropertyType::OneBed, TenantPreference::Girls, "+919876543215"),
];

pub fn sample_listings() -> Vec<Listing> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;

    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, (title, location, price, property_type, tenant, contact))| Listing {
            id: Uuid::from_u128(i as u128 + 1),
            owner_id: Uuid::nil(),
            title: title.to_string(),
            location: location.to_string(),
            price: *price,
            property_type: *property_type,
            tenant_preference: *tenant,
            contact_number: contact.to_string(),
            description: None,
            images: vec![format!("/assets/room-{}.jpg", i + 1)],
            is_available: true,
            created_at: epoch,
            updated_at: epoch,
        })
        .collect()
}
