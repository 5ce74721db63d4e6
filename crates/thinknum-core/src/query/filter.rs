use serde::{Deserialize, Serialize};

/// Filter operator as understood by the backend.
///
/// The backend validates whether an operator fits a column's type; the client
/// only carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    /// Inclusive range; date columns only.
    #[serde(rename = "[]")]
    Between,
    #[serde(rename = "{}")]
    IsBlank,
    #[serde(rename = "=...")]
    StartsWith,
    #[serde(rename = "...=")]
    EndsWith,
    #[serde(rename = "...")]
    Contains,
    #[serde(rename = "(...)")]
    ContainsWord,
    #[serde(rename = "!...")]
    NotContains,
    #[serde(rename = "i=")]
    EqualsIgnoreCase,
    #[serde(rename = "i!=")]
    NotEqualsIgnoreCase,
    #[serde(rename = "i=...")]
    StartsWithIgnoreCase,
    #[serde(rename = "i...=")]
    EndsWithIgnoreCase,
    #[serde(rename = "i...")]
    ContainsIgnoreCase,
    #[serde(rename = "i(...)")]
    ContainsWordIgnoreCase,
    #[serde(rename = "i!...")]
    NotContainsIgnoreCase,
}

impl FilterOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::Between => "[]",
            Self::IsBlank => "{}",
            Self::StartsWith => "=...",
            Self::EndsWith => "...=",
            Self::Contains => "...",
            Self::ContainsWord => "(...)",
            Self::NotContains => "!...",
            Self::EqualsIgnoreCase => "i=",
            Self::NotEqualsIgnoreCase => "i!=",
            Self::StartsWithIgnoreCase => "i=...",
            Self::EndsWithIgnoreCase => "i...=",
            Self::ContainsIgnoreCase => "i...",
            Self::ContainsWordIgnoreCase => "i(...)",
            Self::NotContainsIgnoreCase => "i!...",
        }
    }

    /// Whether the operator is one of the case-insensitive string forms.
    pub const fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Self::EqualsIgnoreCase
                | Self::NotEqualsIgnoreCase
                | Self::StartsWithIgnoreCase
                | Self::EndsWithIgnoreCase
                | Self::ContainsIgnoreCase
                | Self::ContainsWordIgnoreCase
                | Self::NotContainsIgnoreCase
        )
    }
}

/// One element of a filter's value list. `Blank` serializes as JSON `null`,
/// used for open-ended ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Blank,
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or(Self::Blank)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Column + operator + value-list predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleFilter {
    pub column: String,
    #[serde(rename = "type")]
    pub operator: FilterOperator,
    pub value: Vec<FilterValue>,
}

impl SimpleFilter {
    pub fn new<V>(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl IntoIterator<Item = V>,
    ) -> Self
    where
        V: Into<FilterValue>,
    {
        Self {
            column: column.into(),
            operator,
            value: value.into_iter().map(Into::into).collect(),
        }
    }
}

/// Boolean combinator for complex filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMatch {
    All,
    Any,
}

/// ALL/ANY over nested filters, which may themselves be complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexFilter {
    #[serde(rename = "match")]
    pub match_mode: FilterMatch,
    pub conditions: Vec<Filter>,
}

/// A filter node. On the wire the two shapes are distinguished only by their
/// fields (`column/type/value` vs `match/conditions`). A node carrying both
/// sets of fields matches neither shape and is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Simple(SimpleFilter),
    Complex(ComplexFilter),
}

impl Filter {
    pub fn simple<V>(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl IntoIterator<Item = V>,
    ) -> Self
    where
        V: Into<FilterValue>,
    {
        Self::Simple(SimpleFilter::new(column, operator, value))
    }

    pub fn all(conditions: impl IntoIterator<Item = Filter>) -> Self {
        Self::Complex(ComplexFilter {
            match_mode: FilterMatch::All,
            conditions: conditions.into_iter().collect(),
        })
    }

    pub fn any(conditions: impl IntoIterator<Item = Filter>) -> Self {
        Self::Complex(ComplexFilter {
            match_mode: FilterMatch::Any,
            conditions: conditions.into_iter().collect(),
        })
    }

    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }
}

impl From<SimpleFilter> for Filter {
    fn from(value: SimpleFilter) -> Self {
        Self::Simple(value)
    }
}

impl From<ComplexFilter> for Filter {
    fn from(value: ComplexFilter) -> Self {
        Self::Complex(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_filter_uses_type_key_for_operator() {
        let filter = Filter::simple(
            "as_of_date",
            FilterOperator::Between,
            ["2021-01-01", "2021-12-31"],
        );

        assert_eq!(
            serde_json::to_value(&filter).expect("serializes"),
            json!({"column": "as_of_date", "type": "[]", "value": ["2021-01-01", "2021-12-31"]})
        );
    }

    #[test]
    fn nested_complex_filter_round_trips_through_wire_shape() {
        let wire = json!({
            "match": "any",
            "conditions": [
                {"column": "title", "type": "i...", "value": ["engineer"]},
                {"match": "all", "conditions": [
                    {"column": "salary", "type": ">=", "value": [100000, null]}
                ]}
            ]
        });

        let filter: Filter = serde_json::from_value(wire.clone()).expect("parses");
        match &filter {
            Filter::Complex(complex) => {
                assert_eq!(complex.match_mode, FilterMatch::Any);
                assert!(!complex.conditions[0].is_complex());
                assert!(complex.conditions[1].is_complex());
            }
            Filter::Simple(_) => panic!("root must be complex"),
        }
        assert_eq!(serde_json::to_value(&filter).expect("serializes"), wire);
    }

    #[test]
    fn node_mixing_simple_and_complex_fields_is_rejected() {
        let hybrid = json!({
            "column": "a",
            "type": "=",
            "value": ["x"],
            "match": "all",
            "conditions": [{"column": "b", "type": "=", "value": ["y"]}]
        });

        assert!(serde_json::from_value::<Filter>(hybrid).is_err());
    }

    #[test]
    fn case_insensitive_operators_are_flagged() {
        assert!(FilterOperator::ContainsIgnoreCase.is_case_insensitive());
        assert!(!FilterOperator::Contains.is_case_insensitive());
        assert_eq!(FilterOperator::NotContainsIgnoreCase.as_str(), "i!...");
    }

    #[test]
    fn non_finite_numbers_become_blank() {
        assert_eq!(FilterValue::from(f64::NAN), FilterValue::Blank);
        assert_eq!(
            serde_json::to_value(FilterValue::Blank).expect("serializes"),
            serde_json::Value::Null
        );
    }
}
