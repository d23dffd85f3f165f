//! Listing query construction
//!
//! Composes the destinations listing out of three optional parts: a free-text search over five
//! columns, a conjunction of sidebar filters and pagination. Count mode shares the exact same
//! `WHERE` clause but selects `COUNT(*)` and skips pagination.

use super::query::BoundQuery;
use super::query::Param;

/// Page used when none (or an invalid one) is requested
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none (or an invalid one) is requested
pub const DEFAULT_PER_PAGE: u64 = 400;

/// Separator between the country name and its code in the sidebar country value
const COUNTRY_DELIMITER: &str = "--";

const LISTING_SELECT: &str = r"SELECT d.id, d.name, d.countrycode, c.name AS country, d.description, d.type
FROM destinations d
LEFT JOIN countries c ON c.countrycode = d.countrycode";

const COUNT_SELECT: &str = r"SELECT COUNT(*) AS total_records
FROM destinations d
LEFT JOIN countries c ON c.countrycode = d.countrycode";

/// Per-field substring filters from the sidebar
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarFilters {
    /// Part of the destination name
    pub destination_name: Option<String>,

    /// Part of the description
    pub description: Option<String>,

    /// Country as shown in the sidebar, `<name>--<code>`; only the name is matched
    pub country: Option<String>,

    /// Part of the destination type
    pub kind: Option<String>,
}

impl SidebarFilters {
    /// The filters that are actually supplied, as `(column, value)`, in clause order
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        let country = self.country.as_deref().map(country_name);

        [
            ("d.name", self.destination_name.as_deref()),
            ("d.description", self.description.as_deref()),
            ("c.name", country),
            ("d.type", self.kind.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.filter(|value| !value.is_empty()).map(|v| (column, v)))
        .collect()
    }
}

/// Only the part before the first `--`
pub fn country_name(value: &str) -> &str {
    value
        .split_once(COUNTRY_DELIMITER)
        .map_or(value, |(name, _)| name)
}

/// 1-based page with its size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page, at least 1
    pub page: u64,

    /// Rows per page, at least 1
    pub per_page: u64,
}

impl Pagination {
    /// Missing or zero values fall back to the defaults
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.filter(|page| *page >= 1).unwrap_or(DEFAULT_PAGE),
            per_page: per_page
                .filter(|per_page| *per_page >= 1)
                .unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Everything that shapes a listing request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Free text matched against five columns, empty means no search
    pub search: String,

    /// Sidebar filters
    pub sidebar_filters: SidebarFilters,

    /// Which page to return
    pub pagination: Pagination,

    /// Only count the matching rows
    pub count_only: bool,
}

impl ListingQuery {
    /// Statement for the rows of the requested page
    pub fn rows(&self) -> BoundQuery {
        let mut query = self.filtered(LISTING_SELECT);

        query.sql.push_str("\nORDER BY d.id\nLIMIT ?, ?");
        query
            .bind(Param::Unsigned(self.pagination.offset()))
            .bind(Param::Unsigned(self.pagination.per_page))
    }

    /// Statement for the number of matching rows, pagination is ignored
    pub fn count(&self) -> BoundQuery {
        self.filtered(COUNT_SELECT)
    }

    /// Append the `WHERE` clause (if any) to `select`
    fn filtered(&self, select: &str) -> BoundQuery {
        let mut clauses = Vec::with_capacity(2);
        let mut params = Vec::new();

        if !self.search.is_empty() {
            let columns = [
                "d.name",
                "c.name",
                "d.description",
                "d.countrycode",
                "d.type",
            ];

            clauses.push(like_clause(&columns, " OR "));
            params.extend(columns.iter().map(|_| Param::like(&self.search)));
        }

        let filters = self.sidebar_filters.active();
        if !filters.is_empty() {
            let columns = filters.iter().map(|(column, _)| *column).collect::<Vec<_>>();

            clauses.push(like_clause(&columns, " AND "));
            params.extend(filters.iter().map(|(_, value)| Param::like(value)));
        }

        let mut sql = select.to_string();
        if !clauses.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&clauses.join(" OR "));
        }

        BoundQuery { sql, params }
    }
}

/// `(a LIKE ? <joiner> b LIKE ? ...)`
fn like_clause(columns: &[&str], joiner: &str) -> String {
    let predicates = columns
        .iter()
        .map(|column| format!("{column} LIKE ?"))
        .collect::<Vec<_>>();

    format!("({})", predicates.join(joiner))
}
