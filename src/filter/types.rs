use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-insensitive substring match
    ILike,
    In,
    /// Array column contains the value
    Contains,
}

/// A value carried by a condition; bound as a typed SQL parameter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Uuid(Uuid),
    Text(String),
    List(Vec<FilterValue>),
}

impl From<Uuid> for FilterValue {
    fn from(id: Uuid) -> Self {
        FilterValue::Uuid(id)
    }
}

impl From<Option<Uuid>> for FilterValue {
    fn from(id: Option<Uuid>) -> Self {
        id.map(FilterValue::Uuid).unwrap_or(FilterValue::Null)
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<Vec<Uuid>> for FilterValue {
    fn from(ids: Vec<Uuid>) -> Self {
        FilterValue::List(ids.into_iter().map(FilterValue::Uuid).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: FilterValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Field(FilterWhereInfo),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}

/// Column value as seen by the in-memory evaluator
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Uuid(Option<Uuid>),
    Text(Option<&'a str>),
    UuidList(&'a [Uuid]),
    Timestamp(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Ordering used when sorting records in memory; absent values sort first
    pub fn sort_cmp(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::UuidList(a), FieldValue::UuidList(b)) => a.len().cmp(&b.len()),
            (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
            (FieldValue::Missing, _) => Ordering::Less,
            (_, FieldValue::Missing) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

/// Records the in-memory store can run a [`super::Filter`] against
pub trait Filterable {
    fn field(&self, column: &str) -> FieldValue<'_>;
}
