//! Advertisement, category, and picture data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::models::UserId;

/// Advertisement ID type
pub type AdvertisementId = i64;

/// Category ID type
pub type CategoryId = i64;

/// Listing lifecycle status, serialized as its wire integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum AdStatus {
    Active,
    Resolved,
    Sold,
}

impl From<AdStatus> for i16 {
    fn from(status: AdStatus) -> Self {
        match status {
            AdStatus::Active => 1,
            AdStatus::Resolved => 2,
            AdStatus::Sold => 3,
        }
    }
}

impl TryFrom<i16> for AdStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AdStatus::Active),
            2 => Ok(AdStatus::Resolved),
            3 => Ok(AdStatus::Sold),
            other => Err(format!("invalid advertisement status: {other}")),
        }
    }
}

/// Read-only category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
}

/// One picture in an advertisement's ordered collection. The path is an
/// opaque reference to stored image content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
    pub image_path: String,
    pub position: i32,
}

/// Picture submitted on create/update; position is the submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPicture {
    pub image_path: String,
}

/// Full advertisement detail with its ordered pictures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: AdvertisementId,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub status: AdStatus,
    pub category_id: CategoryId,
    pub pictures: Vec<Picture>,
}

/// Listing row: first picture only, plus a favorite flag when the viewer
/// is authenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementSummary {
    pub id: AdvertisementId,
    pub author_id: UserId,
    pub title: String,
    pub main_picture: Option<String>,
    pub price: Decimal,
    pub status: AdStatus,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Fields for creating an advertisement. Author and status are never
/// client-supplied: the caller becomes the author and status starts ACTIVE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub pictures: Vec<NewPicture>,
}

/// Partial update. A present `pictures` replaces the entire collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvertisementUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<AdStatus>,
    pub category_id: Option<CategoryId>,
    pub pictures: Option<Vec<NewPicture>>,
}

/// Contact details of an advertisement's author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values() {
        assert_eq!(i16::from(AdStatus::Active), 1);
        assert_eq!(i16::from(AdStatus::Resolved), 2);
        assert_eq!(i16::from(AdStatus::Sold), 3);
        assert_eq!(AdStatus::try_from(2).unwrap(), AdStatus::Resolved);
        assert!(AdStatus::try_from(0).is_err());
        assert!(AdStatus::try_from(4).is_err());
    }

    #[test]
    fn status_serializes_as_integer() {
        let json = serde_json::to_string(&AdStatus::Sold).unwrap();
        assert_eq!(json, "3");
        let back: AdStatus = serde_json::from_str("1").unwrap();
        assert_eq!(back, AdStatus::Active);
    }

    #[test]
    fn summary_omits_favorite_flag_for_anonymous_viewers() {
        let summary = AdvertisementSummary {
            id: 1,
            author_id: 2,
            title: "Bike".to_string(),
            main_picture: None,
            price: Decimal::new(120_000, 2),
            status: AdStatus::Active,
            category_id: 3,
            created_at: Utc::now(),
            is_favorite: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("is_favorite").is_none());
        assert_eq!(json["price"], serde_json::json!("1200.00"));
    }

    #[test]
    fn update_with_no_fields_deserializes() {
        let update: AdvertisementUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.title.is_none());
        assert!(update.pictures.is_none());
    }
}
