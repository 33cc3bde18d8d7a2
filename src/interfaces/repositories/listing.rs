use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, PgPool};

use crate::{
    entities::listing::{Listing, ListingInsert, ListingRow, ListingUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxListingRepo,
};

const LISTING_COLUMNS: &str = "id, owner_id, title, location, price, property_type, tenant_preference, \
    contact_number, description, images, is_available, created_at, updated_at";

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Available listings, newest first.
    async fn list_available(&self) -> Result<Vec<Listing>, AppError>;
    /// Every listing of one owner, newest first.
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, AppError>;
    async fn get_listing(&self, id: &Uuid) -> Result<Option<Listing>, AppError>;
    async fn insert_listing(&self, listing: &ListingInsert) -> Result<Listing, AppError>;
    /// `None` when no row with this id belongs to `owner_id`.
    async fn update_listing(&self, id: &Uuid, owner_id: &Uuid, update: &ListingUpdate) -> Result<Option<Listing>, AppError>;
    async fn toggle_availability(&self, id: &Uuid, owner_id: &Uuid) -> Result<Option<Listing>, AppError>;
    /// Returns whether a row was deleted.
    async fn delete_listing(&self, id: &Uuid, owner_id: &Uuid) -> Result<bool, AppError>;
}

impl SqlxListingRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxListingRepo { pool }
    }
}

fn into_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, AppError> {
    rows.into_iter().map(Listing::try_from).collect()
}

#[async_trait]
impl ListingRepository for SqlxListingRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_available(&self) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM rooms WHERE is_available = TRUE ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_listings(rows)
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, AppError> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM rooms WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        into_listings(rows)
    }

    async fn get_listing(&self, id: &Uuid) -> Result<Option<Listing>, AppError> {
        sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Listing::try_from)
        .transpose()
    }

    async fn insert_listing(&self, listing: &ListingInsert) -> Result<Listing, AppError> {
        let form = &listing.form;
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            INSERT INTO rooms (
                owner_id, title, location, price, property_type, tenant_preference,
                contact_number, description, images
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(listing.owner_id)
        .bind(&form.title)
        .bind(&form.location)
        .bind(form.price)
        .bind(form.property_type.as_str())
        .bind(form.tenant_preference.as_str())
        .bind(&form.contact_number)
        .bind(&form.description)
        .bind(&listing.images)
        .fetch_one(&self.pool)
        .await?;

        Listing::try_from(row)
    }

    async fn update_listing(&self, id: &Uuid, owner_id: &Uuid, update: &ListingUpdate) -> Result<Option<Listing>, AppError> {
        let form = &update.form;
        sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE rooms SET
                title = $3,
                location = $4,
                price = $5,
                property_type = $6,
                tenant_preference = $7,
                contact_number = $8,
                description = $9,
                images = $10,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&form.title)
        .bind(&form.location)
        .bind(form.price)
        .bind(form.property_type.as_str())
        .bind(form.tenant_preference.as_str())
        .bind(&form.contact_number)
        .bind(&form.description)
        .bind(&update.images)
        .fetch_optional(&self.pool)
        .await?
        .map(Listing::try_from)
        .transpose()
    }

    async fn toggle_availability(&self, id: &Uuid, owner_id: &Uuid) -> Result<Option<Listing>, AppError> {
        sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE rooms SET
                is_available = NOT is_available,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Listing::try_from)
        .transpose()
    }

    async fn delete_listing(&self, id: &Uuid, owner_id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
