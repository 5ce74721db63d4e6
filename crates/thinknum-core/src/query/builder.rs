use crate::error::ClientError;
use crate::query::model::{check_filter_append, check_filter_set};
use crate::query::{
    Aggregation, Filter, Group, QueryDefinition, QueryFunction, QueryModel, Sort,
};

/// Incrementally builds a [`QueryModel`].
///
/// Fallible mutators either apply completely or leave the model untouched.
///
/// ```rust
/// use thinknum_core::{
///     Aggregation, AggregationFunction, Filter, FilterOperator, Group, QueryBuilder, Sort,
/// };
///
/// # fn main() -> Result<(), thinknum_core::ClientError> {
/// let mut builder = QueryBuilder::new();
/// builder
///     .add_ticker("nasdaq:aapl")?
///     .add_filter(Filter::simple(
///         "as_of_date",
///         FilterOperator::Between,
///         ["2021-01-01", "2021-12-31"],
///     ))?
///     .add_group(Group::new("category"))
///     .add_aggregation(Aggregation::new("ticker", AggregationFunction::Count))
///     .add_sort(Sort::desc("ticker@count"));
///
/// assert_eq!(builder.query().tickers, vec!["nasdaq:aapl"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    model: QueryModel,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from a wire-shape definition, validating every
    /// category the same way the `set_*` operations do.
    pub fn from_definition(definition: QueryDefinition) -> Result<Self, ClientError> {
        let mut builder = Self::new();
        builder
            .set_tickers(definition.tickers)
            .set_filters(definition.filters)?
            .set_groups(definition.groups)
            .set_aggregations(definition.aggregations)
            .set_functions(definition.functions)
            .set_sorts(definition.sorts);
        Ok(builder)
    }

    /// Live materialized view of the query.
    pub fn query(&self) -> QueryDefinition {
        self.model.materialize()
    }

    pub fn model(&self) -> &QueryModel {
        &self.model
    }

    pub fn build(&self) -> QueryModel {
        self.model.clone()
    }

    pub fn into_model(self) -> QueryModel {
        self.model
    }

    /// Clears every category.
    pub fn reset(&mut self) -> &mut Self {
        self.model = QueryModel::default();
        self
    }

    // Tickers

    pub fn add_ticker(&mut self, ticker: impl AsRef<str>) -> Result<&mut Self, ClientError> {
        let ticker = ticker.as_ref().trim();
        if ticker.is_empty() {
            return Err(ClientError::invalid_argument("missing or invalid ticker"));
        }

        self.model.tickers.push(ticker.to_owned());
        Ok(self)
    }

    /// Replaces the ticker list, trimming entries and dropping blank ones.
    pub fn set_tickers<I, S>(&mut self, tickers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.model.tickers = tickers
            .into_iter()
            .map(|ticker| ticker.as_ref().trim().to_owned())
            .filter(|ticker| !ticker.is_empty())
            .collect();
        self
    }

    pub fn reset_tickers(&mut self) -> &mut Self {
        self.model.tickers.clear();
        self
    }

    // Filters

    pub fn add_filter(&mut self, filter: impl Into<Filter>) -> Result<&mut Self, ClientError> {
        let filter = filter.into();
        check_filter_append(&self.model.filters, &filter)?;
        self.model.filters.push(filter);
        Ok(self)
    }

    pub fn set_filters(&mut self, filters: Vec<Filter>) -> Result<&mut Self, ClientError> {
        check_filter_set(&filters)?;
        self.model.filters = filters;
        Ok(self)
    }

    pub fn reset_filters(&mut self) -> &mut Self {
        self.model.filters.clear();
        self
    }

    // Groups

    pub fn add_group(&mut self, group: Group) -> &mut Self {
        self.model.groups.push(group);
        self
    }

    pub fn set_groups(&mut self, groups: Vec<Group>) -> &mut Self {
        self.model.groups = groups;
        self
    }

    pub fn reset_groups(&mut self) -> &mut Self {
        self.model.groups.clear();
        self
    }

    // Aggregations

    pub fn add_aggregation(&mut self, aggregation: Aggregation) -> &mut Self {
        self.model.aggregations.push(aggregation);
        self
    }

    pub fn set_aggregations(&mut self, aggregations: Vec<Aggregation>) -> &mut Self {
        self.model.aggregations = aggregations;
        self
    }

    pub fn reset_aggregations(&mut self) -> &mut Self {
        self.model.aggregations.clear();
        self
    }

    // Functions

    pub fn add_function(&mut self, function: QueryFunction) -> &mut Self {
        self.model.functions.push(function);
        self
    }

    pub fn set_functions(&mut self, functions: Vec<QueryFunction>) -> &mut Self {
        self.model.functions = functions;
        self
    }

    pub fn reset_functions(&mut self) -> &mut Self {
        self.model.functions.clear();
        self
    }

    // Sorts

    pub fn add_sort(&mut self, sort: Sort) -> &mut Self {
        self.model.sorts.push(sort);
        self
    }

    pub fn set_sorts(&mut self, sorts: Vec<Sort>) -> &mut Self {
        self.model.sorts = sorts;
        self
    }

    pub fn reset_sorts(&mut self) -> &mut Self {
        self.model.sorts.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::query::FilterOperator;

    fn simple(column: &str) -> Filter {
        Filter::simple(column, FilterOperator::Equals, ["x"])
    }

    #[test]
    fn set_tickers_trims_and_drops_blank_entries() {
        let mut builder = QueryBuilder::new();
        builder.set_tickers(["  aapl ", "", " msft"]);
        assert_eq!(builder.model().tickers(), ["aapl", "msft"]);
    }

    #[test]
    fn add_ticker_rejects_whitespace() {
        let mut builder = QueryBuilder::new();
        let error = builder.add_ticker("   ").expect_err("blank ticker");
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert!(builder.model().tickers().is_empty());
    }

    #[test]
    fn rejected_filter_leaves_list_unchanged() {
        let mut builder = QueryBuilder::new();
        builder
            .add_filter(simple("a"))
            .and_then(|b| b.add_filter(simple("b")))
            .expect("simple filters append");

        let before = builder.model().filters().to_vec();
        let error = builder
            .add_filter(Filter::all([simple("c")]))
            .expect_err("complex filter cannot join simple ones");

        assert_eq!(error.kind(), ErrorKind::InvalidFilterComposition);
        assert_eq!(builder.model().filters(), before.as_slice());
    }

    #[test]
    fn rejected_filter_set_keeps_previous_filters() {
        let mut builder = QueryBuilder::new();
        builder.add_filter(simple("a")).expect("append");

        let error = builder
            .set_filters(vec![Filter::any([simple("b")]), simple("c")])
            .expect_err("mixed list");

        assert_eq!(error.kind(), ErrorKind::InvalidFilterComposition);
        assert_eq!(builder.model().filters(), [simple("a")]);
    }

    #[test]
    fn reset_removes_every_category() {
        let mut builder = QueryBuilder::new();
        builder
            .add_ticker("nasdaq:aapl")
            .expect("ticker")
            .add_group(Group::new("category"))
            .add_sort(Sort::asc("category"));

        builder.reset();
        assert!(builder.query().is_empty());
    }

    #[test]
    fn from_definition_applies_set_semantics() {
        let definition = QueryDefinition {
            tickers: vec![String::from(" nyse:wmt "), String::from(" ")],
            filters: vec![Filter::all([simple("a")])],
            ..QueryDefinition::default()
        };

        let builder = QueryBuilder::from_definition(definition).expect("legal definition");
        assert_eq!(builder.model().tickers(), ["nyse:wmt"]);
        assert_eq!(builder.model().filters().len(), 1);

        let illegal = QueryDefinition {
            filters: vec![simple("a"), Filter::all([simple("b")])],
            ..QueryDefinition::default()
        };
        let error = QueryBuilder::from_definition(illegal).expect_err("mixed filters");
        assert_eq!(error.kind(), ErrorKind::InvalidFilterComposition);
    }
}
