//! # Query Model
//!
//! Typed representation of a dataset query and the builder that assembles it.
//!
//! | Category | Type | Notes |
//! |----------|------|-------|
//! | tickers | `String` | trimmed, blank entries dropped |
//! | filters | [`Filter`] | all simple, or exactly one complex root |
//! | groups | [`Group`] | optional date partition |
//! | aggregations | [`Aggregation`] | column + function |
//! | functions | [`QueryFunction`] | derived-function steps |
//! | sorts | [`Sort`] | list order is tie-break priority |

mod builder;
mod filter;
mod function;
mod grouping;
mod model;

pub use builder::QueryBuilder;
pub use filter::{ComplexFilter, Filter, FilterMatch, FilterOperator, FilterValue, SimpleFilter};
pub use function::{
    AreaLevel, ChangeOverTimeParameters, DimensionValue, DuplicateStoreParameters,
    FillTimeSeriesParameters, GenderDecoderParameters, HeatmapParameters, LocalDataMeasureType,
    LocalDataParameters, NameSimilarity, NearbyParameters, NearestParameters,
    NearlikeDatasetType, NoParameters, QueryFunction, SalesParameters,
};
pub use grouping::{Aggregation, AggregationFunction, Group, GroupPartition, Sort, SortOrder};
pub use model::{check_filter_append, check_filter_set, QueryDefinition, QueryModel};
