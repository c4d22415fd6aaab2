//! Listing filters for advertisement queries.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::auth::models::UserId;

use super::models::CategoryId;

/// Sort order for listings. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdOrdering {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

impl AdOrdering {
    fn order_clause(self) -> &'static str {
        match self {
            AdOrdering::Newest => "ad.created_at DESC",
            AdOrdering::Oldest => "ad.created_at ASC",
            AdOrdering::PriceAsc => "ad.price ASC",
            AdOrdering::PriceDesc => "ad.price DESC",
        }
    }
}

/// Filters applied to the advertisement listing. All fields are optional
/// and combine with AND; `mine` restricts to the caller's own listings and
/// is ignored for anonymous viewers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdFilter {
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub mine: bool,
    #[serde(default)]
    pub ordering: AdOrdering,
}

impl AdFilter {
    /// Append WHERE conditions and the ORDER BY clause to a listing query.
    /// The builder must already contain the SELECT and FROM clauses with
    /// the advertisements table aliased as `ad`.
    pub(crate) fn apply(&self, builder: &mut QueryBuilder<'_, Postgres>, viewer: Option<UserId>) {
        let mut separator = " WHERE ";

        if let Some(search) = &self.search {
            builder
                .push(separator)
                .push("(ad.title ILIKE ")
                .push_bind(format!("%{search}%"))
                .push(" OR ad.description ILIKE ")
                .push_bind(format!("%{search}%"))
                .push(")");
            separator = " AND ";
        }
        if let Some(min_price) = self.min_price {
            builder
                .push(separator)
                .push("ad.price >= ")
                .push_bind(min_price);
            separator = " AND ";
        }
        if let Some(max_price) = self.max_price {
            builder
                .push(separator)
                .push("ad.price <= ")
                .push_bind(max_price);
            separator = " AND ";
        }
        if let Some(category) = self.category {
            builder
                .push(separator)
                .push("ad.category_id = ")
                .push_bind(category);
            separator = " AND ";
        }
        if self.mine {
            if let Some(viewer_id) = viewer {
                builder
                    .push(separator)
                    .push("ad.author_id = ")
                    .push_bind(viewer_id);
            }
        }

        builder.push(" ORDER BY ").push(self.ordering.order_clause());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: &AdFilter, viewer: Option<UserId>) -> String {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT ad.id FROM advertisements ad");
        filter.apply(&mut builder, viewer);
        builder.sql().to_string()
    }

    #[test]
    fn empty_filter_only_orders() {
        let sql = rendered(&AdFilter::default(), None);
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY ad.created_at DESC"));
    }

    #[test]
    fn filters_combine_with_and() {
        let filter = AdFilter {
            search: Some("bike".to_string()),
            min_price: Some(Decimal::new(100, 0)),
            max_price: Some(Decimal::new(500, 0)),
            category: Some(3),
            mine: false,
            ordering: AdOrdering::PriceAsc,
        };
        let sql = rendered(&filter, None);
        assert!(sql.contains("ad.title ILIKE $1"));
        assert!(sql.contains("ad.description ILIKE $2"));
        assert!(sql.contains("ad.price >= $3"));
        assert!(sql.contains("ad.price <= $4"));
        assert!(sql.contains("ad.category_id = $5"));
        assert_eq!(sql.matches(" AND ").count(), 3);
        assert!(sql.ends_with("ORDER BY ad.price ASC"));
    }

    #[test]
    fn mine_is_ignored_without_a_viewer() {
        let filter = AdFilter {
            mine: true,
            ..AdFilter::default()
        };
        assert!(!rendered(&filter, None).contains("author_id"));
        assert!(rendered(&filter, Some(7)).contains("ad.author_id = $1"));
    }

    #[test]
    fn ordering_and_mine_deserialize_with_defaults() {
        let filter: AdFilter =
            serde_json::from_str(r#"{"ordering":"price_desc","mine":true}"#).unwrap();
        assert_eq!(filter.ordering, AdOrdering::PriceDesc);
        assert!(filter.mine);

        let empty: AdFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.ordering, AdOrdering::Newest);
        assert!(!empty.mine);
    }
}
