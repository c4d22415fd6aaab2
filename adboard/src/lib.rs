//! # Adboard
//!
//! A classified-advertisements marketplace backend built on PostgreSQL.
//!
//! This library provides the domain layer for a listings site: accounts
//! with a two-step OTP login, advertisements with ordered picture
//! collections and per-account favorites, read-only categories, and a
//! staff-reviewed report queue. HTTP delivery lives in a separate server
//! crate; everything here takes an explicit [`auth::Identity`] instead of
//! relying on ambient request state.
//!
//! ## Core Modules
//!
//! - [`auth`]: Accounts, two-step OTP login, and opaque sessions
//! - [`policy`]: Pure ownership and role checks
//! - [`ads`]: Advertisements, pictures, favorites, and categories
//! - [`reports`]: Complaints against advertisements and the review queue
//! - [`db`]: Connection pooling, migrations, and repository traits
//!
//! ## Example
//!
//! ```no_run
//! use adboard::ads::{AdFilter, AdsManager};
//! use adboard::db::{Database, DatabaseConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let ads = AdsManager::new(Arc::new(db.pool().clone()));
//!     let listings = ads.list(&AdFilter::default(), None).await?;
//!     println!("{} active listings", listings.len());
//!     Ok(())
//! }
//! ```

pub mod ads;
pub mod auth;
pub mod db;
pub mod policy;
pub mod reports;

pub use ads::{AdFilter, AdsError, AdsManager};
pub use auth::{AuthError, AuthManager, Identity, Role};
pub use db::{Database, DatabaseConfig};
pub use policy::{Access, ReportScope};
pub use reports::{ReportError, ReportManager};
