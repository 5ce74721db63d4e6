//! Response payloads returned by the dataset API.
//!
//! Catalog metadata (chart presets, dataset presets) is kept as opaque JSON:
//! the client passes it through without interpreting it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::Sort;

/// Media types the backend can render a finished query as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryFormat {
    #[serde(rename = "application/vnd.thinknum.table+json")]
    Table,
    #[serde(rename = "application/vnd.thinknum.map+json")]
    Map,
    #[serde(rename = "application/vnd.thinknum.chart+json")]
    Chart,
}

impl QueryFormat {
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Table => "application/vnd.thinknum.table+json",
            Self::Map => "application/vnd.thinknum.map+json",
            Self::Chart => "application/vnd.thinknum.chart+json",
        }
    }
}

/// Body of a `201 Created` query submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQueryResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFieldType {
    String,
    Date,
    Number,
    #[serde(rename = "geomtry", alias = "geometry")]
    Geometry,
    Boolean,
    Serial,
    #[serde(other)]
    Unknown,
}

/// Column description shared by metadata and query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetField {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: DatasetFieldType,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub width: Option<u64>,
    #[serde(default)]
    pub metric: bool,
}

/// A materialized page of query results in table format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub last_date_updated: Option<String>,
    #[serde(default)]
    pub fields: Vec<DatasetField>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub group_fields: Vec<DatasetField>,
    #[serde(default)]
    pub sort_fields: Vec<Sort>,
}

impl TableResult {
    /// Index of the column with the given field id.
    pub fn column_index(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == field_id)
    }

    /// Values of one column across all returned rows.
    pub fn column<'a>(&'a self, field_id: &str) -> Option<Vec<&'a serde_json::Value>> {
        let index = self.column_index(field_id)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub companies_count: Option<u64>,
    #[serde(default)]
    pub private_companies_count: Option<u64>,
    #[serde(default)]
    pub public_companies_count: Option<u64>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DatasetList {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub truncate_limit: Option<u64>,
    #[serde(default)]
    pub unique_fields: Vec<Vec<String>>,
    #[serde(default)]
    pub dataset_fields: Vec<DatasetField>,
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionInfo>,
    #[serde(default)]
    pub chart_presets: Vec<serde_json::Value>,
    #[serde(default)]
    pub presets: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntity {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub entities: Vec<CompanyEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TickersResponse {
    #[serde(default)]
    pub tickers: BTreeMap<String, Company>,
    #[serde(default)]
    pub queries: BTreeMap<String, Vec<Company>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StockPriceResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<StockPrice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_result_parses_and_exposes_columns() {
        let result: TableResult = serde_json::from_value(json!({
            "id": "q1",
            "state": "complete",
            "total": 2,
            "count": 2,
            "start": 1,
            "options": [],
            "last_date_updated": "2021-12-31",
            "fields": [
                {"id": "category", "display_name": "Category", "type": "string", "format": null},
                {"id": "count", "display_name": "Count", "type": "number", "format": "number", "metric": true}
            ],
            "rows": [["Engineering", 12], ["Sales", 4]],
            "group_fields": [],
            "sort_fields": [{"column": "count", "order": "desc"}]
        }))
        .expect("parses");

        assert_eq!(result.column_index("count"), Some(1));
        assert_eq!(
            result.column("category").expect("column exists"),
            vec![&json!("Engineering"), &json!("Sales")]
        );
        assert!(result.column("missing").is_none());
    }

    #[test]
    fn unknown_field_types_do_not_break_parsing() {
        let field: DatasetField = serde_json::from_value(json!({
            "id": "shape", "type": "polygon"
        }))
        .expect("parses");
        assert_eq!(field.field_type, DatasetFieldType::Unknown);

        let field: DatasetField = serde_json::from_value(json!({
            "id": "location", "type": "geomtry", "format": "point"
        }))
        .expect("parses");
        assert_eq!(field.field_type, DatasetFieldType::Geometry);
    }
}
