//! Table query description
//!
//! A small builder describing what the caller wants from a table: which
//! columns, equality filters, ordering, and an optional row limit. The
//! HTTP backend renders it into PostgREST-style query parameters; test
//! doubles evaluate it in memory via [`Query::matches`].

use serde_json::Value;

/// Sort direction for an ordered select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Declarative select/update target
#[derive(Debug, Clone, Default)]
pub struct Query {
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<Order>,
    limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the selected columns (comma-separated, defaults to `*`)
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Add an equality filter on a column
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    /// Order results by a column
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Limit the number of returned rows
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    pub fn order_spec(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn limit_spec(&self) -> Option<u32> {
        self.limit
    }

    /// Render PostgREST query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        params.push((
            "select".to_string(),
            self.columns.clone().unwrap_or_else(|| "*".to_string()),
        ));
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(order) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{dir}", order.column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Whether a JSON row satisfies every equality filter.
    ///
    /// Values are compared through their string form, matching how the
    /// filters travel on the wire.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Number(n)) => n.to_string() == *expected,
                Some(Value::Bool(b)) => b.to_string() == *expected,
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_postgrest_params() {
        let query = Query::new()
            .columns("id,role")
            .eq("id", "u1")
            .order("name", true)
            .limit(1);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "id,role".to_string()),
                ("id".to_string(), "eq.u1".to_string()),
                ("order".to_string(), "name.asc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn default_selects_all_columns() {
        let params = Query::new().to_params();
        assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn matches_string_and_numeric_columns() {
        let query = Query::new().eq("user_id", "u1").eq("sequence", 2);
        let row = json!({"user_id": "u1", "sequence": 2, "title": "Intro"});
        assert!(query.matches(&row));

        let other = json!({"user_id": "u2", "sequence": 2});
        assert!(!query.matches(&other));
    }

    #[test]
    fn missing_column_never_matches() {
        let query = Query::new().eq("role", "admin");
        assert!(!query.matches(&json!({"id": "u1"})));
    }
}
