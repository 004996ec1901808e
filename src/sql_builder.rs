//! SQL builder with parameterized query construction.
//!
//! Filter values always go through DuckDB's parameter binding (`?`
//! placeholders), never through string interpolation. Builder methods return
//! `&mut Self` for chaining.
//!
//! Queries over the filtered table are composed from common table
//! expressions: [`SqlBuilder::with`] prepends a named CTE and its parameters,
//! so the final parameter list always follows the placeholder order of the
//! generated SQL.
//!
//! # Example
//!
//! ```rust
//! use sales_dashboard::SqlBuilder;
//! let (filter_sql, filter_params) = SqlBuilder::new("sales")
//!     .where_in("state", &["SP", "RJ"])
//!     .build();
//! let (sql, params) = SqlBuilder::new("filtered")
//!     .with("filtered", &filter_sql, &filter_params)
//!     .select(&["state", "SUM(revenue) AS revenue"])
//!     .group_by(&["state"])
//!     .order_by(&["revenue DESC"])
//!     .build();
//! assert!(sql.starts_with("WITH filtered AS ("));
//! assert_eq!(params, vec!["SP", "RJ"]);
//! ```

/// Builds parameterized SQL queries safely.
pub struct SqlBuilder {
    ctes: Vec<(String, String)>,
    cte_params: Vec<String>,
    select_cols: Vec<String>,
    is_distinct: bool,
    from_table: String,
    joins: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<String>,
    group_by_cols: Vec<String>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table, view, or CTE name.
    pub fn new(table: &str) -> Self {
        Self {
            ctes: Vec::new(),
            cte_params: Vec::new(),
            select_cols: vec!["*".to_string()],
            is_distinct: false,
            from_table: table.to_string(),
            joins: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_cols: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Add a named common table expression.
    ///
    /// CTEs are emitted in insertion order and their parameters are bound
    /// before any parameter of the main query.
    pub fn with(&mut self, name: &str, sql: &str, params: &[String]) -> &mut Self {
        self.ctes.push((name.to_string(), sql.to_string()));
        self.cte_params.extend(params.iter().cloned());
        self
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select<S: AsRef<str>>(&mut self, cols: &[S]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Add DISTINCT to the SELECT clause.
    pub fn distinct(&mut self) -> &mut Self {
        self.is_distinct = true;
        self
    }

    /// Add a JOIN clause.
    ///
    /// The clause should be a full JOIN expression, e.g.
    /// `"JOIN filtered f ON f.client_name = r.name"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// Add an IN condition with parameterized values.
    ///
    /// Empty values list produces `FALSE`.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            self.where_clauses.push("FALSE".to_string());
            return self;
        }
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        self.where_clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
        self.params.extend(values.iter().map(|v| v.to_string()));
        self
    }

    /// Add OR-combined conditions.
    ///
    /// Each condition is a `(sql_fragment, params)` pair where the fragment
    /// uses one `?` per parameter. An empty list adds nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sales_dashboard::SqlBuilder;
    /// let mut builder = SqlBuilder::new("filtered");
    /// builder.where_or(&[
    ///     ("(year = ? AND month_name = ?)", vec!["2024".into(), "janeiro".into()]),
    ///     ("(year = ? AND month_name = ?)", vec!["2024".into(), "fevereiro".into()]),
    /// ]);
    /// let (sql, params) = builder.build();
    /// assert!(sql.contains("OR"));
    /// assert_eq!(params.len(), 4);
    /// ```
    pub fn where_or(&mut self, conditions: &[(&str, Vec<String>)]) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        let mut or_parts = Vec::with_capacity(conditions.len());
        for (cond, params) in conditions {
            or_parts.push(cond.to_string());
            self.params.extend(params.iter().cloned());
        }
        self.where_clauses
            .push(format!("({})", or_parts.join(" OR ")));
        self
    }

    /// Add GROUP BY columns.
    pub fn group_by(&mut self, cols: &[&str]) -> &mut Self {
        self.group_by_cols
            .extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Add ORDER BY clauses (e.g. `"revenue DESC"`, `"first_seen ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut parts = Vec::new();

        if !self.ctes.is_empty() {
            let ctes: Vec<String> = self
                .ctes
                .iter()
                .map(|(name, sql)| format!("{} AS (\n{}\n)", name, sql))
                .collect();
            parts.push(format!("WITH {}", ctes.join(",\n")));
        }

        let distinct = if self.is_distinct { "DISTINCT " } else { "" };
        parts.push(format!("SELECT {}{}", distinct, self.select_cols.join(", ")));
        parts.push(format!("FROM {}", self.from_table));

        for j in &self.joins {
            parts.push(j.clone());
        }

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.group_by_cols.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by_cols.join(", ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        let mut params = self.cte_params.clone();
        params.extend(self.params.iter().cloned());
        (parts.join("\n"), params)
    }
}
