//! SQLite document queryable
//!
//! Entities are stored as JSON documents in one column of a table. Member
//! paths render to `json_extract`, collection traversal to
//! `EXISTS (SELECT 1 FROM json_each(..))`, and parameters to numbered `?N`
//! placeholders bound with sqlx.
//!
//! ```rust,ignore
//! let buildings = SqliteDocuments::<Building>::new("buildings", "doc");
//! let query = QueryComposer::new(buildings, &arguments, values).build(&mut errors);
//! let rows = query.fetch_all(&pool).await?;
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};

use super::expr::{CompareOp, Expr, Filter, MemberPath, SortDirection, SortKey};
use super::queryable::{MAX_ROWS, Queryable};
use super::value::QueryValue;

/// Queryable over JSON documents stored in a SQLite table.
#[derive(Debug)]
pub struct SqliteDocuments<T> {
    column: String,
    source: String,
    where_clauses: Vec<String>,
    values: Vec<QueryValue>,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: u64,
    none: bool,
    alias_counter: usize,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for SqliteDocuments<T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            source: self.source.clone(),
            where_clauses: self.where_clauses.clone(),
            values: self.values.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            none: self.none,
            alias_counter: self.alias_counter,
            _entity: PhantomData,
        }
    }
}

impl<T> SqliteDocuments<T> {
    /// Query the documents stored in `column` of `table`.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            column: quote_identifier(&column.into()),
            source: quote_identifier(&table.into()),
            where_clauses: Vec::new(),
            values: Vec::new(),
            order_by: None,
            limit: None,
            offset: 0,
            none: false,
            alias_counter: 0,
            _entity: PhantomData,
        }
    }

    pub fn is_none(&self) -> bool {
        self.none
    }

    /// The SELECT statement and its parameter values.
    pub fn to_sql(&self) -> (String, &[QueryValue]) {
        (self.build_sql(), &self.values)
    }

    fn is_paged(&self) -> bool {
        self.limit.is_some() || self.offset > 0
    }

    /// Turn the current statement into the source of a new one, so that
    /// later filters apply to the paged window.
    fn nested(mut self) -> Self {
        self.alias_counter += 1;
        self.source = format!("({}) AS s{}", self.build_sql(), self.alias_counter);
        self.where_clauses.clear();
        self.limit = None;
        self.offset = 0;
        self
    }

    fn build_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.column, self.source);

        if self.none {
            sql.push_str(" WHERE 0");
        } else if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        match (self.limit, self.offset) {
            (Some(limit), 0) => sql.push_str(&format!(" LIMIT {limit}")),
            (Some(limit), offset) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (None, 0) => {}
            (None, offset) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        }

        sql
    }

    fn render(&mut self, expr: &Expr, document: &str, params: &[QueryValue], base: usize) -> String {
        match expr {
            Expr::Compare(comparison) => {
                let member = json_extract(document, &comparison.member);
                let placeholder = format!("?{}", base + comparison.param + 1);
                let op = match comparison.op {
                    CompareOp::Eq => "IS",
                    CompareOp::Ge => ">=",
                    CompareOp::Lt => "<",
                };
                let temporal = params
                    .get(comparison.param)
                    .is_some_and(QueryValue::is_temporal);
                if temporal {
                    format!("datetime({member}) {op} datetime({placeholder})")
                } else {
                    format!("{member} {op} {placeholder}")
                }
            }
            Expr::Any {
                collection,
                predicate,
                ..
            } => {
                self.alias_counter += 1;
                let alias = format!("j{}", self.alias_counter);
                let element = format!("{alias}.value");
                let inner = self.render(predicate, &element, params, base);
                format!(
                    "EXISTS (SELECT 1 FROM json_each({document}, {}) AS {alias} WHERE {inner})",
                    json_path(collection)
                )
            }
            Expr::And(exprs) => exprs
                .iter()
                .map(|expr| format!("({})", self.render(expr, document, params, base)))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

impl<T: DeserializeOwned> SqliteDocuments<T> {
    /// Execute the query and decode every document.
    pub async fn fetch_all(&self, pool: &SqlitePool) -> Result<Vec<T>, sqlx::Error> {
        if self.none {
            tracing::debug!("Skipping document query composed as empty");
            return Ok(Vec::new());
        }

        let sql = self.build_sql();
        tracing::debug!(sql = %sql, params = self.values.len(), "Executing document query");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        let rows = query.fetch_all(pool).await?;
        rows.iter()
            .map(|row| {
                let document: String = row.try_get(0)?;
                serde_json::from_str(&document).map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }

    /// Count the documents the query would return.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        if self.none {
            return Ok(0);
        }

        let sql = format!("SELECT COUNT(*) FROM ({}) AS c", self.build_sql());
        tracing::debug!(sql = %sql, "Executing document count");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        let row = query.fetch_one(pool).await?;
        row.try_get(0)
    }
}

impl<T> Queryable for SqliteDocuments<T> {
    fn filter(mut self, filter: Filter) -> Self {
        if self.is_paged() {
            self = self.nested();
        }

        let base = self.values.len();
        let document = self.column.clone();
        let clause = self.render(&filter.expr, &document, &filter.params, base);
        self.where_clauses.push(clause);
        self.values.extend(filter.params);
        self
    }

    fn order_by(mut self, keys: Vec<SortKey>) -> Self {
        if keys.is_empty() {
            return self;
        }
        if self.is_paged() {
            self = self.nested();
        }

        let order = keys
            .iter()
            .map(|key| {
                let member = json_extract(&self.column, &key.member);
                match key.direction {
                    SortDirection::Ascending => format!("{member} ASC"),
                    SortDirection::Descending => format!("{member} DESC"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.order_by = Some(order);
        self
    }

    fn skip(mut self, count: u64) -> Self {
        self.offset = self.offset.saturating_add(count).min(MAX_ROWS);
        self.limit = self.limit.map(|limit| limit.saturating_sub(count));
        self
    }

    fn take(mut self, count: u64) -> Self {
        let count = count.min(MAX_ROWS);
        self.limit = Some(self.limit.map_or(count, |limit| limit.min(count)));
        self
    }

    fn none(mut self) -> Self {
        self.none = true;
        self
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL string literal holding a JSON path with quoted keys, e.g. `'$."Room"."Number"'`.
fn json_path(member: &MemberPath) -> String {
    let mut path = String::from("$");
    for name in member.members() {
        path.push_str(&format!(".\"{}\"", name.replace('"', "\\\"")));
    }
    format!("'{}'", path.replace('\'', "''"))
}

fn json_extract(document: &str, member: &MemberPath) -> String {
    format!("json_extract({document}, {})", json_path(member))
}
