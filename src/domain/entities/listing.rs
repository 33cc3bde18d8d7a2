use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::image::ImageNotice, errors::AppError};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 5;
const MAX_TITLE_LENGTH: u64 = 100;
const MIN_LOCATION_LENGTH: u64 = 5;
const MAX_LOCATION_LENGTH: u64 = 200;
const MAX_DESCRIPTION_LENGTH: u64 = 1000;
pub const MAX_PRICE: i32 = 1_000_000;

static CONTACT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{10,15}$").expect("contact number pattern is valid")
});

// ───── Categories ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "1 BHK")]
    OneBhk,
    #[serde(rename = "2 BHK")]
    TwoBhk,
    #[serde(rename = "1 Bed")]
    OneBed,
    #[serde(rename = "2 Bed")]
    TwoBed,
    #[serde(rename = "3 Bed")]
    ThreeBed,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::OneBhk,
        PropertyType::TwoBhk,
        PropertyType::OneBed,
        PropertyType::TwoBed,
        PropertyType::ThreeBed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::OneBhk => "1 BHK",
            PropertyType::TwoBhk => "2 BHK",
            PropertyType::OneBed => "1 Bed",
            PropertyType::TwoBed => "2 Bed",
            PropertyType::ThreeBed => "3 Bed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantPreference {
    Bachelor,
    Family,
    Girls,
    Working,
}

impl TenantPreference {
    pub const ALL: [TenantPreference; 4] = [
        TenantPreference::Bachelor,
        TenantPreference::Family,
        TenantPreference::Girls,
        TenantPreference::Working,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPreference::Bachelor => "Bachelor",
            TenantPreference::Family => "Family",
            TenantPreference::Girls => "Girls",
            TenantPreference::Working => "Working",
        }
    }

    /// Human label shown next to the raw value in filter pickers.
    pub fn label(&self) -> &'static str {
        match self {
            TenantPreference::Bachelor => "Bachelor",
            TenantPreference::Family => "Family",
            TenantPreference::Girls => "Girls Only",
            TenantPreference::Working => "Working Professionals",
        }
    }
}

impl FromStr for PropertyType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::InternalError(format!("Unknown property type '{}'", s)))
    }
}

impl FromStr for TenantPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantPreference::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InternalError(format!("Unknown tenant preference '{}'", s)))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TenantPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub price: i32,
    pub property_type: String,
    pub tenant_preference: String,
    pub contact_number: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub price: i32,
    pub property_type: PropertyType,
    pub tenant_preference: TenantPreference,
    pub contact_number: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.owner_id == *user_id
    }
}

impl TryFrom<ListingRow> for Listing {
    type Error = AppError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            property_type: row.property_type.parse()?,
            tenant_preference: row.tenant_preference.parse()?,
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            location: row.location,
            price: row.price,
            contact_number: row.contact_number,
            description: row.description,
            images: row.images,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row values for an insert. `owner_id` only ever comes from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingInsert {
    pub owner_id: Uuid,
    pub form: RoomForm,
    pub images: Vec<String>,
}

/// Full replacement of the editable columns of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingUpdate {
    pub form: RoomForm,
    pub images: Vec<String>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoomForm {
    #[validate(length(
        min = MIN_TITLE_LENGTH,
        max = MAX_TITLE_LENGTH,
        message = "Title must be between 5 and 100 characters"
    ))]
    pub title: String,

    #[validate(length(
        min = MIN_LOCATION_LENGTH,
        max = MAX_LOCATION_LENGTH,
        message = "Location must be between 5 and 200 characters"
    ))]
    pub location: String,

    #[validate(range(min = 1, max = MAX_PRICE, message = "Price must be between 1 and 10,00,000"))]
    pub price: i32,

    pub property_type: PropertyType,

    pub tenant_preference: TenantPreference,

    #[validate(regex(path = *CONTACT_NUMBER_RE, message = "Enter a valid phone number (10-15 digits)"))]
    pub contact_number: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH, message = "Description must be less than 1000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

impl RoomForm {
    /// Trims text fields and drops an empty description, then validates.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.title = self.title.trim().to_string();
        self.location = self.location.trim().to_string();
        self.contact_number = self.contact_number.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        self.validate()?;
        Ok(self)
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListingWritten {
    pub listing: Listing,
    pub notices: Vec<ImageNotice>,
}

#[derive(Debug, Serialize)]
pub struct ContactLinks {
    pub tel: String,
    pub whatsapp: String,
}

#[derive(Debug, Serialize)]
pub struct ListingDetails {
    #[serde(flatten)]
    pub listing: Listing,
    pub cover_image: Option<String>,
    pub contact_links: ContactLinks,
    pub is_owner: bool,
}
