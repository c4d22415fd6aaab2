//! Advertisement management: CRUD, favorites, categories, owner contact.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;

use crate::auth::models::{Identity, UserId};
use crate::db::repository::{FavoriteRepository, PgFavoriteRepository};
use crate::policy;

use super::errors::{AdsError, AdsResult};
use super::filter::AdFilter;
use super::models::{
    AdStatus, Advertisement, AdvertisementId, AdvertisementSummary, AdvertisementUpdate, Category,
    CategoryId, NewAdvertisement, OwnerContact, Picture,
};

const MAX_TITLE_LENGTH: usize = 200;

/// Manages advertisements, their pictures, and per-account favorite sets.
///
/// All mutations that touch more than one table run inside a single
/// transaction so an advertisement is never visible without its pictures.
pub struct AdsManager {
    pool: Arc<PgPool>,
    favorites: PgFavoriteRepository,
}

impl AdsManager {
    /// Create a new advertisement manager backed by the given pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        let favorites = PgFavoriteRepository::new(pool.as_ref().clone());
        Self { pool, favorites }
    }

    /// Create an advertisement authored by the caller.
    ///
    /// The caller always becomes the author and the status always starts
    /// as active; neither is accepted from input.
    ///
    /// # Errors
    /// Returns `Validation` for an empty or over-long title, an empty
    /// description, a negative price, or an empty picture list, and
    /// `CategoryNotFound` for an unknown category.
    pub async fn create(
        &self,
        identity: &Identity,
        new_ad: NewAdvertisement,
    ) -> AdsResult<Advertisement> {
        validate_title(&new_ad.title)?;
        validate_description(&new_ad.description)?;
        validate_price(new_ad.price)?;
        if new_ad.pictures.is_empty() {
            return Err(AdsError::Validation(
                "At least one picture is required".to_string(),
            ));
        }
        self.require_category(new_ad.category_id).await?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO advertisements (author_id, title, description, price, category_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, created_at",
        )
        .bind(identity.user_id)
        .bind(&new_ad.title)
        .bind(&new_ad.description)
        .bind(new_ad.price)
        .bind(new_ad.category_id)
        .fetch_one(&mut *tx)
        .await?;

        let ad_id: AdvertisementId = row.get("id");
        let created_at = row.get("created_at");

        let mut pictures = Vec::with_capacity(new_ad.pictures.len());
        for (position, picture) in new_ad.pictures.iter().enumerate() {
            let picture_row = sqlx::query(
                "INSERT INTO pictures (advertisement_id, image_path, position)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(ad_id)
            .bind(&picture.image_path)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;

            pictures.push(Picture {
                id: picture_row.get("id"),
                image_path: picture.image_path.clone(),
                position: position as i32,
            });
        }

        tx.commit().await?;

        info!(
            advertisement_id = ad_id,
            author = %identity.username,
            "Advertisement created"
        );

        Ok(Advertisement {
            id: ad_id,
            created_at,
            author_id: identity.user_id,
            title: new_ad.title,
            description: new_ad.description,
            price: new_ad.price,
            status: AdStatus::Active,
            category_id: new_ad.category_id,
            pictures,
        })
    }

    /// Fetch one advertisement with its pictures in position order.
    ///
    /// # Errors
    /// Returns `AdvertisementNotFound` if no such advertisement exists.
    pub async fn get(&self, ad_id: AdvertisementId) -> AdsResult<Advertisement> {
        let row = sqlx::query(
            "SELECT id, created_at, author_id, title, description, price, status, category_id
             FROM advertisements
             WHERE id = $1",
        )
        .bind(ad_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AdsError::AdvertisementNotFound(ad_id))?;

        let pictures = self.pictures_for(ad_id).await?;
        advertisement_from_row(&row, pictures)
    }

    /// List advertisements matching the filter, newest first unless the
    /// filter says otherwise. When a viewer is given, each row carries
    /// whether that viewer has favorited it; anonymous listings omit the
    /// flag entirely.
    pub async fn list(
        &self,
        filter: &AdFilter,
        viewer: Option<UserId>,
    ) -> AdsResult<Vec<AdvertisementSummary>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT ad.id, ad.author_id, ad.title, ad.price, ad.status, ad.category_id,
                    ad.created_at,
                    (SELECT p.image_path FROM pictures p
                     WHERE p.advertisement_id = ad.id
                     ORDER BY p.position ASC LIMIT 1) AS main_picture",
        );
        if let Some(viewer_id) = viewer {
            builder
                .push(
                    ", EXISTS (SELECT 1 FROM favorite_advertisements f
                        JOIN accounts acc ON acc.id = f.account_id
                        WHERE f.advertisement_id = ad.id AND acc.user_id = ",
                )
                .push_bind(viewer_id)
                .push(") AS is_favorite");
        }
        builder.push(" FROM advertisements ad");
        filter.apply(&mut builder, viewer);

        let rows = builder.build().fetch_all(self.pool.as_ref()).await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let status_raw: i16 = row.get("status");
            summaries.push(AdvertisementSummary {
                id: row.get("id"),
                author_id: row.get("author_id"),
                title: row.get("title"),
                main_picture: row.get("main_picture"),
                price: row.get("price"),
                status: AdStatus::try_from(status_raw).map_err(AdsError::Validation)?,
                category_id: row.get("category_id"),
                created_at: row.get("created_at"),
                is_favorite: viewer.map(|_| row.get("is_favorite")),
            });
        }
        Ok(summaries)
    }

    /// Apply a partial update. Only the author or staff may update, and a
    /// present picture list replaces the existing collection in the same
    /// transaction as the field changes.
    ///
    /// # Errors
    /// Returns `Forbidden` when the caller is neither the author nor
    /// staff, `AdvertisementNotFound` for an unknown advertisement, and
    /// the same validation errors as [`create`](Self::create) for the
    /// fields that are present.
    pub async fn update(
        &self,
        identity: &Identity,
        ad_id: AdvertisementId,
        update: AdvertisementUpdate,
    ) -> AdsResult<Advertisement> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(description) = &update.description {
            validate_description(description)?;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        if let Some(category_id) = update.category_id {
            self.require_category(category_id).await?;
        }
        if let Some(pictures) = &update.pictures {
            if pictures.is_empty() {
                return Err(AdsError::Validation(
                    "At least one picture is required".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let author_row = sqlx::query("SELECT author_id FROM advertisements WHERE id = $1 FOR UPDATE")
            .bind(ad_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AdsError::AdvertisementNotFound(ad_id))?;

        let author_id: UserId = author_row.get("author_id");
        if !policy::can_modify_advertisement(identity, author_id).is_allowed() {
            return Err(AdsError::Forbidden);
        }

        let row = sqlx::query(
            "UPDATE advertisements
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 status = COALESCE($5, status),
                 category_id = COALESCE($6, category_id)
             WHERE id = $1
             RETURNING id, created_at, author_id, title, description, price, status, category_id",
        )
        .bind(ad_id)
        .bind(update.title.as_deref())
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.status.map(i16::from))
        .bind(update.category_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(pictures) = &update.pictures {
            sqlx::query("DELETE FROM pictures WHERE advertisement_id = $1")
                .bind(ad_id)
                .execute(&mut *tx)
                .await?;
            for (position, picture) in pictures.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO pictures (advertisement_id, image_path, position)
                     VALUES ($1, $2, $3)",
                )
                .bind(ad_id)
                .bind(&picture.image_path)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(
            advertisement_id = ad_id,
            caller = %identity.username,
            "Advertisement updated"
        );

        let pictures = self.pictures_for(ad_id).await?;
        advertisement_from_row(&row, pictures)
    }

    /// Delete an advertisement and everything hanging off it. Pictures,
    /// favorites, and reports go with it through cascading deletes.
    ///
    /// # Errors
    /// Returns `Forbidden` when the caller is neither the author nor
    /// staff, and `AdvertisementNotFound` for an unknown advertisement.
    pub async fn delete(&self, identity: &Identity, ad_id: AdvertisementId) -> AdsResult<()> {
        let row = sqlx::query("SELECT author_id FROM advertisements WHERE id = $1")
            .bind(ad_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(AdsError::AdvertisementNotFound(ad_id))?;

        let author_id: UserId = row.get("author_id");
        if !policy::can_modify_advertisement(identity, author_id).is_allowed() {
            return Err(AdsError::Forbidden);
        }

        sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(ad_id)
            .execute(self.pool.as_ref())
            .await?;

        info!(
            advertisement_id = ad_id,
            caller = %identity.username,
            "Advertisement deleted"
        );
        Ok(())
    }

    /// Add an advertisement to the caller's favorites. Adding one that is
    /// already present is a no-op, not an error; the returned flag says
    /// whether the set actually grew.
    ///
    /// # Errors
    /// Returns `AdvertisementNotFound` for an unknown advertisement.
    pub async fn add_favorite(
        &self,
        identity: &Identity,
        ad_id: AdvertisementId,
    ) -> AdsResult<bool> {
        self.require_advertisement(ad_id).await?;
        let account_id = self.account_id_for(identity.user_id).await?;
        Ok(self.favorites.add(account_id, ad_id).await?)
    }

    /// Remove an advertisement from the caller's favorites. Removing one
    /// that is not present is equally a no-op.
    ///
    /// # Errors
    /// Returns `AdvertisementNotFound` for an unknown advertisement.
    pub async fn remove_favorite(
        &self,
        identity: &Identity,
        ad_id: AdvertisementId,
    ) -> AdsResult<()> {
        self.require_advertisement(ad_id).await?;
        let account_id = self.account_id_for(identity.user_id).await?;
        self.favorites.remove(account_id, ad_id).await?;
        Ok(())
    }

    /// Look up the contact details of an advertisement's author. Requires
    /// an authenticated caller but no ownership; it backs the "call the
    /// seller" action.
    ///
    /// # Errors
    /// Returns `AdvertisementNotFound` for an unknown advertisement and
    /// `PhoneNotOnFile` when the author never registered a phone number.
    pub async fn owner_contact(&self, ad_id: AdvertisementId) -> AdsResult<OwnerContact> {
        let row = sqlx::query(
            "SELECT u.first_name, u.last_name, a.phone_number
             FROM advertisements ad
             JOIN users u ON u.id = ad.author_id
             JOIN accounts a ON a.user_id = u.id
             WHERE ad.id = $1",
        )
        .bind(ad_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AdsError::AdvertisementNotFound(ad_id))?;

        let phone_number: Option<String> = row.get("phone_number");
        let phone_number = phone_number.ok_or(AdsError::PhoneNotOnFile)?;

        Ok(OwnerContact {
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            phone_number,
        })
    }

    /// List all categories, stable by id.
    pub async fn list_categories(&self) -> AdsResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, title, description FROM categories ORDER BY id")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                title: row.get("title"),
                description: row.get("description"),
            })
            .collect())
    }

    /// Fetch one category.
    ///
    /// # Errors
    /// Returns `CategoryNotFound` if no such category exists.
    pub async fn get_category(&self, category_id: CategoryId) -> AdsResult<Category> {
        let row = sqlx::query("SELECT id, title, description FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(AdsError::CategoryNotFound(category_id))?;

        Ok(Category {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
        })
    }

    async fn pictures_for(&self, ad_id: AdvertisementId) -> AdsResult<Vec<Picture>> {
        let rows = sqlx::query(
            "SELECT id, image_path, position
             FROM pictures
             WHERE advertisement_id = $1
             ORDER BY position ASC",
        )
        .bind(ad_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| Picture {
                id: row.get("id"),
                image_path: row.get("image_path"),
                position: row.get("position"),
            })
            .collect())
    }

    // Every authenticated user has an account row; signup creates both in
    // one transaction.
    async fn account_id_for(&self, user_id: UserId) -> AdsResult<i64> {
        let row = sqlx::query("SELECT id FROM accounts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(row.get("id"))
    }

    async fn require_advertisement(&self, ad_id: AdvertisementId) -> AdsResult<()> {
        sqlx::query("SELECT 1 FROM advertisements WHERE id = $1")
            .bind(ad_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(AdsError::AdvertisementNotFound(ad_id))?;
        Ok(())
    }

    async fn require_category(&self, category_id: CategoryId) -> AdsResult<()> {
        sqlx::query("SELECT 1 FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(AdsError::CategoryNotFound(category_id))?;
        Ok(())
    }
}

fn validate_title(title: &str) -> AdsResult<()> {
    if title.trim().is_empty() {
        return Err(AdsError::Validation("Title must not be empty".to_string()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AdsError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> AdsResult<()> {
    if description.trim().is_empty() {
        return Err(AdsError::Validation(
            "Description must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> AdsResult<()> {
    if price < Decimal::ZERO {
        return Err(AdsError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn advertisement_from_row(row: &PgRow, pictures: Vec<Picture>) -> AdsResult<Advertisement> {
    let status_raw: i16 = row.get("status");
    Ok(Advertisement {
        id: row.get("id"),
        created_at: row.get("created_at"),
        author_id: row.get("author_id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        status: AdStatus::try_from(status_raw).map_err(AdsError::Validation)?,
        category_id: row.get("category_id"),
        pictures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rules() {
        assert!(validate_title("Mountain bike").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn description_rules() {
        assert!(validate_description("Barely used").is_ok());
        assert!(validate_description(" \n ").is_err());
    }

    #[test]
    fn price_rules() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(999, 2)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
    }
}
