use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::query::{Aggregation, Filter, Group, QueryFunction, Sort};

const COMPLEX_ROOT_LOCKED: &str =
    "root filter is a complex filter; modify its conditions instead of adding another filter";
const COMPLEX_MUST_BE_ROOT: &str =
    "query already contains filters; a complex filter must be the sole root filter";
const COMPLEX_NOT_ALONE: &str = "a complex filter must be the only root filter";

/// Wire shape of a query. Empty categories are omitted entirely: the backend
/// reads an absent key as "not applied", which differs from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tickers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Aggregation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<QueryFunction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
}

impl QueryDefinition {
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
            && self.filters.is_empty()
            && self.groups.is_empty()
            && self.aggregations.is_empty()
            && self.functions.is_empty()
            && self.sorts.is_empty()
    }
}

/// A query under construction.
///
/// Fields are only mutable through [`QueryBuilder`](crate::QueryBuilder), which
/// keeps the filter list legal: either every filter is simple, or the list
/// holds exactly one complex filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryModel {
    pub(crate) tickers: Vec<String>,
    pub(crate) filters: Vec<Filter>,
    pub(crate) groups: Vec<Group>,
    pub(crate) aggregations: Vec<Aggregation>,
    pub(crate) functions: Vec<QueryFunction>,
    pub(crate) sorts: Vec<Sort>,
}

impl QueryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    pub fn functions(&self) -> &[QueryFunction] {
        &self.functions
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn is_empty(&self) -> bool {
        self.materialize().is_empty()
    }

    /// Snapshot of the query in wire shape.
    pub fn materialize(&self) -> QueryDefinition {
        QueryDefinition {
            tickers: self.tickers.clone(),
            filters: self.filters.clone(),
            groups: self.groups.clone(),
            aggregations: self.aggregations.clone(),
            functions: self.functions.clone(),
            sorts: self.sorts.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        serde_json::to_string(&self.materialize()).map_err(ClientError::from)
    }
}

/// Checks that `candidate` may be appended to `existing`.
pub fn check_filter_append(existing: &[Filter], candidate: &Filter) -> Result<(), ClientError> {
    match existing.first() {
        None => Ok(()),
        Some(root) if root.is_complex() => {
            Err(ClientError::invalid_filter_composition(COMPLEX_ROOT_LOCKED))
        }
        Some(_) if candidate.is_complex() => {
            Err(ClientError::invalid_filter_composition(COMPLEX_MUST_BE_ROOT))
        }
        Some(_) => Ok(()),
    }
}

/// Checks that `filters` is legal as a whole filter list.
pub fn check_filter_set(filters: &[Filter]) -> Result<(), ClientError> {
    if filters.len() > 1 && filters.iter().any(Filter::is_complex) {
        return Err(ClientError::invalid_filter_composition(COMPLEX_NOT_ALONE));
    }
    Ok(())
}
