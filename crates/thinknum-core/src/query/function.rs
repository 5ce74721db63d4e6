use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Geographic aggregation level shared by map-oriented functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaLevel {
    State,
    County,
    Country,
    Cbsa,
    Postal,
}

/// Whether nearby/nearest compares against a hosted dataset or an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NearlikeDatasetType {
    Dataset,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyParameters {
    pub dataset_type: NearlikeDatasetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    pub distance: f64,
    #[serde(default)]
    pub is_include_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestParameters {
    pub dataset_type: NearlikeDatasetType,
    pub dataset: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    pub ranks: Vec<u32>,
    #[serde(default)]
    pub is_include_closed: bool,
}

/// Sales forecast over a lookahead window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesParameters {
    pub lookahead_day_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalDataMeasureType {
    Macro,
    Weather,
    Esg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    One(String),
    Many(Vec<String>),
}

/// Local macro, weather or ESG data joined onto result rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDataParameters {
    pub country: Vec<String>,
    pub measure_type: LocalDataMeasureType,
    pub measure: String,
    #[serde(default)]
    pub dimensions: BTreeMap<String, DimensionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillTimeSeriesParameters {
    pub partition_by: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOverTimeParameters {
    pub relative: bool,
    pub frequency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapParameters {
    pub geo: AreaLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderDecoderParameters {
    pub masculine_words: Vec<String>,
    pub feminine_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSimilarity {
    pub name: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateStoreParameters {
    pub similarity: NameSimilarity,
    pub distance: f64,
}

/// Parameter record for functions that take none; serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoParameters {}

/// A derived-function step, serialized as
/// `{"function": "<name>", "parameters": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", content = "parameters", rename_all = "lowercase")]
pub enum QueryFunction {
    Nearby(NearbyParameters),
    Nearest(NearestParameters),
    Sales(SalesParameters),
    LocalData(LocalDataParameters),
    FillTimeSeries(FillTimeSeriesParameters),
    ChangeOverTime(ChangeOverTimeParameters),
    Heatmap(HeatmapParameters),
    GenderDecoder(GenderDecoderParameters),
    Churn(NoParameters),
    #[serde(rename = "identifyduplicate")]
    StoresDuplicate(DuplicateStoreParameters),
    ListingChange(NoParameters),
}

impl QueryFunction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nearby(_) => "nearby",
            Self::Nearest(_) => "nearest",
            Self::Sales(_) => "sales",
            Self::LocalData(_) => "localdata",
            Self::FillTimeSeries(_) => "filltimeseries",
            Self::ChangeOverTime(_) => "changeovertime",
            Self::Heatmap(_) => "heatmap",
            Self::GenderDecoder(_) => "genderdecoder",
            Self::Churn(_) => "churn",
            Self::StoresDuplicate(_) => "identifyduplicate",
            Self::ListingChange(_) => "listingchange",
        }
    }

    pub const fn churn() -> Self {
        Self::Churn(NoParameters {})
    }

    pub const fn listing_change() -> Self {
        Self::ListingChange(NoParameters {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_is_tagged_by_name_with_parameters() {
        let function = QueryFunction::Heatmap(HeatmapParameters {
            geo: AreaLevel::County,
        });

        assert_eq!(
            serde_json::to_value(&function).expect("serializes"),
            json!({"function": "heatmap", "parameters": {"geo": "county"}})
        );
    }

    #[test]
    fn parameterless_functions_send_empty_object() {
        assert_eq!(
            serde_json::to_value(QueryFunction::churn()).expect("serializes"),
            json!({"function": "churn", "parameters": {}})
        );
    }

    #[test]
    fn wire_names_match_tags() {
        let functions = vec![
            QueryFunction::Sales(SalesParameters {
                lookahead_day_count: 30,
                start_date: None,
                end_date: Some(String::from("2021-12-31")),
            }),
            QueryFunction::StoresDuplicate(DuplicateStoreParameters {
                similarity: NameSimilarity {
                    name: String::from("name"),
                    threshold: 0.8,
                },
                distance: 0.1,
            }),
            QueryFunction::LocalData(LocalDataParameters {
                country: vec![String::from("US")],
                measure_type: LocalDataMeasureType::Weather,
                measure: String::from("temperature"),
                dimensions: BTreeMap::from([(
                    String::from("unit"),
                    DimensionValue::One(String::from("celsius")),
                )]),
            }),
            QueryFunction::FillTimeSeries(FillTimeSeriesParameters {
                partition_by: vec![String::from("ticker")],
            }),
            QueryFunction::listing_change(),
        ];

        for function in functions {
            let value = serde_json::to_value(&function).expect("serializes");
            assert_eq!(value["function"], json!(function.name()));
            let parsed: QueryFunction = serde_json::from_value(value).expect("parses back");
            assert_eq!(parsed, function);
        }
    }

    #[test]
    fn nearest_parses_from_backend_payload() {
        let parsed: QueryFunction = serde_json::from_value(json!({
            "function": "nearest",
            "parameters": {
                "dataset_type": "dataset",
                "dataset": "store",
                "tickers": ["nyse:wmt"],
                "entities": [],
                "ranks": [1, 2],
                "is_include_closed": false
            }
        }))
        .expect("parses");

        match parsed {
            QueryFunction::Nearest(params) => {
                assert_eq!(params.ranks, vec![1, 2]);
                assert_eq!(params.dataset_type, NearlikeDatasetType::Dataset);
            }
            other => panic!("unexpected function {other:?}"),
        }
    }
}
