//! # Parameterized Query Building
//!
//! A small intermediate representation for `SELECT` statements with
//! positional placeholders (`$1`, `$2`, ...).
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bind First, Render Once                              │
//! │                                                                         │
//! │  and_where("city", Like, "%Van%")  ──► params[0] = "%Van%"   → $1       │
//! │  and_where("owner_id", Eq, 7)      ──► params[1] = 7         → $2       │
//! │  limit(10)                         ──► params[2] = 10        → $3       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build() renders clause lists in SQL order:                             │
//! │    SELECT .. WHERE city LIKE $1 AND owner_id = $2 .. LIMIT $3           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A placeholder index is assigned at the moment its value is pushed, so
//! the Nth parameter is always `$N`. Nothing is ever pushed without also
//! being referenced, so indices are never skipped or reused.

use std::fmt;

// =============================================================================
// Bound Values
// =============================================================================

/// A scalar value bound to a placeholder.
///
/// Values only ever travel as bind parameters, never as SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

// =============================================================================
// Parameterized Query
// =============================================================================

/// Query text plus the ordered values for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedQuery {
    sql: String,
    params: Vec<SqlValue>,
}

impl ParameterizedQuery {
    /// The rendered SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in placeholder order: `params()[0]` is `$1`.
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Splits into `(sql, params)`.
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// Comparison operators the builder knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Like,
    Gte,
    Lte,
}

impl CompareOp {
    fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Like => "LIKE",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

/// `<expr> <op> $<index>`
#[derive(Debug, Clone)]
struct Predicate {
    expr: String,
    op: CompareOp,
    index: usize,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ${}", self.expr, self.op.as_sql(), self.index)
    }
}

// =============================================================================
// Select Builder
// =============================================================================

/// Builds a `SELECT` from fixed fragments plus bound predicates.
///
/// ## Usage
/// ```rust
/// use lightbnb_core::query::{CompareOp, SelectBuilder};
///
/// let query = SelectBuilder::new("SELECT * FROM users")
///     .and_where("email", CompareOp::Eq, "a@b.c")
///     .limit(1)
///     .build();
///
/// assert_eq!(query.sql(), "SELECT * FROM users\nWHERE email = $1\nLIMIT $2");
/// assert_eq!(query.params().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    select_from: String,
    filters: Vec<Predicate>,
    group_by: Option<String>,
    having: Vec<Predicate>,
    order_by: Option<String>,
    limit: Option<usize>,
    params: Vec<SqlValue>,
}

impl SelectBuilder {
    /// Starts from the `SELECT .. FROM .. [JOIN ..]` part of the statement.
    pub fn new(select_from: impl Into<String>) -> Self {
        SelectBuilder {
            select_from: select_from.into(),
            filters: Vec::new(),
            group_by: None,
            having: Vec::new(),
            order_by: None,
            limit: None,
            params: Vec::new(),
        }
    }

    /// Pushes a value and returns its placeholder index.
    fn bind(&mut self, value: SqlValue) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Adds a row filter. The first one renders after `WHERE`, the rest
    /// after `AND`.
    pub fn and_where(mut self, expr: &str, op: CompareOp, value: impl Into<SqlValue>) -> Self {
        let index = self.bind(value.into());
        self.filters.push(Predicate {
            expr: expr.to_string(),
            op,
            index,
        });
        self
    }

    /// Adds a filter on an aggregate, rendered after `GROUP BY`.
    pub fn and_having(mut self, expr: &str, op: CompareOp, value: impl Into<SqlValue>) -> Self {
        let index = self.bind(value.into());
        self.having.push(Predicate {
            expr: expr.to_string(),
            op,
            index,
        });
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by = Some(expr.into());
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    /// Binds the row cap. Call last so it is the final parameter.
    pub fn limit(mut self, limit: impl Into<SqlValue>) -> Self {
        let index = self.bind(limit.into());
        self.limit = Some(index);
        self
    }

    /// Renders the statement.
    pub fn build(self) -> ParameterizedQuery {
        let mut lines = vec![self.select_from.trim().to_string()];

        for (i, predicate) in self.filters.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            lines.push(format!("{} {}", keyword, predicate));
        }

        if let Some(group_by) = &self.group_by {
            lines.push(format!("GROUP BY {}", group_by));
        }

        for (i, predicate) in self.having.iter().enumerate() {
            let keyword = if i == 0 { "HAVING" } else { "AND" };
            lines.push(format!("{} {}", keyword, predicate));
        }

        if let Some(order_by) = &self.order_by {
            lines.push(format!("ORDER BY {}", order_by));
        }

        if let Some(index) = self.limit {
            lines.push(format!("LIMIT ${}", index));
        }

        ParameterizedQuery {
            sql: lines.join("\n"),
            params: self.params,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
