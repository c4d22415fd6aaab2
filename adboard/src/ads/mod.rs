//! Advertisements module: listings, pictures, favorites, and categories.
//!
//! Reads are open to everyone; writes go through ownership checks in
//! [`crate::policy`]. Picture collections are replaced wholesale on
//! update, inside the same transaction as the field changes.

pub mod errors;
pub mod filter;
pub mod manager;
pub mod models;

pub use errors::{AdsError, AdsResult};
pub use filter::{AdFilter, AdOrdering};
pub use manager::AdsManager;
pub use models::{
    AdStatus, Advertisement, AdvertisementId, AdvertisementSummary, AdvertisementUpdate, Category,
    CategoryId, NewAdvertisement, NewPicture, OwnerContact, Picture,
};
