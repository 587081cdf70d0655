//! Query-parameter builder for the external REST store.
//!
//! The hosted store speaks a PostgREST-style dialect: filters, column
//! selection, ordering and paging all travel as URL query parameters. All
//! user-supplied values go through reqwest's query-pair encoding, never
//! through string interpolation into the URL. Builder methods return
//! `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use ringshelf::QueryBuilder;
//! let pairs = QueryBuilder::new()
//!     .select(&["id", "position"])
//!     .where_eq("campaign_id", "c1")
//!     .order_asc("position")
//!     .limit(1)
//!     .build();
//! ```

/// Builds PostgREST query pairs safely.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    select_cols: Vec<String>,
    filters: Vec<(String, String)>,
    order_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
    on_conflict: Option<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the columns to select (omitting this selects everything).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add an equality filter: `column=eq.value`.
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Add an IN filter: `column=in.(a,b,c)`.
    ///
    /// An empty values list matches nothing (`in.()`), mirroring how the
    /// store treats an empty set.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        self.filters
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    /// Add an ascending order key; keys accumulate left to right.
    pub fn order_asc(&mut self, column: &str) -> &mut Self {
        self.order_cols.push(format!("{}.asc", column));
        self
    }

    /// Add a descending order key.
    pub fn order_desc(&mut self, column: &str) -> &mut Self {
        self.order_cols.push(format!("{}.desc", column));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Name the conflict target for an upsert request.
    pub fn on_conflict(&mut self, columns: &str) -> &mut Self {
        self.on_conflict = Some(columns.to_string());
        self
    }

    /// Produce the query pairs in a stable order: select, filters (insertion
    /// order), order, limit, offset, on_conflict.
    pub fn build(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.select_cols.is_empty() {
            pairs.push(("select".to_string(), self.select_cols.join(",")));
        }
        for (col, expr) in &self.filters {
            pairs.push((col.clone(), expr.clone()));
        }
        if !self.order_cols.is_empty() {
            pairs.push(("order".to_string(), self.order_cols.join(",")));
        }
        if let Some(n) = self.limit_val {
            pairs.push(("limit".to_string(), n.to_string()));
        }
        if let Some(n) = self.offset_val {
            pairs.push(("offset".to_string(), n.to_string()));
        }
        if let Some(cols) = &self.on_conflict {
            pairs.push(("on_conflict".to_string(), cols.clone()));
        }
        pairs
    }
}
