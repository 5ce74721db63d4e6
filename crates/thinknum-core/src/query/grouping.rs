use serde::{Deserialize, Serialize};

/// Time partition applied to a date column when grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupPartition {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    YearQuarter,
    YearMonth,
    YearMonthDay,
    YearWeek,
    YearDay,
}

/// Group-by specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<GroupPartition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_partials: Option<bool>,
}

impl Group {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            partition: None,
            include_partials: None,
        }
    }

    pub fn partitioned(column: impl Into<String>, partition: GroupPartition) -> Self {
        Self {
            partition: Some(partition),
            ..Self::new(column)
        }
    }

    pub fn with_partials(mut self, include_partials: bool) -> Self {
        self.include_partials = Some(include_partials);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunction {
    Count,
    DistinctCount,
    Average,
    Median,
    Sum,
    Min,
    Max,
    CumSum,
    CumAvg,
    CumCount,
    CumDistinctCount,
}

/// (column, function) aggregation pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub column: String,
    #[serde(rename = "type")]
    pub function: AggregationFunction,
}

impl Aggregation {
    pub fn new(column: impl Into<String>, function: AggregationFunction) -> Self {
        Self {
            column: column.into(),
            function,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort key. Position in the query's sort list is the tie-break priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn group_omits_unset_options() {
        assert_eq!(
            serde_json::to_value(Group::new("category")).expect("serializes"),
            json!({"column": "category"})
        );
        assert_eq!(
            serde_json::to_value(
                Group::partitioned("as_of_date", GroupPartition::YearMonth).with_partials(false)
            )
            .expect("serializes"),
            json!({"column": "as_of_date", "partition": "yearmonth", "include_partials": false})
        );
    }

    #[test]
    fn aggregation_function_uses_backend_names() {
        let aggregation = Aggregation::new("ticker", AggregationFunction::CumDistinctCount);
        assert_eq!(
            serde_json::to_value(aggregation).expect("serializes"),
            json!({"column": "ticker", "type": "cumdistinctcount"})
        );
    }
}
