use serde::Serialize;

use crate::ast::criterion::Criterion;
use crate::ast::ordering::OrderingChain;
use crate::error::CritResult;
use crate::literal::LiteralRenderer;
use crate::transpiler::ToSql;
use crate::value::ParameterMap;

/// Filter and ordering for a single query invocation.
///
/// A set is meant to be consumed once; parameter keys are only unique
/// within the trees it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaSet {
    pub filter: Option<Criterion>,
    pub ordering: Option<OrderingChain>,
}

impl CriteriaSet {
    pub fn new(filter: Option<Criterion>, ordering: Option<OrderingChain>) -> Self {
        Self { filter, ordering }
    }

    pub fn filter(mut self, filter: Criterion) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, ordering: OrderingChain) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Body of the WHERE clause, if there is a filter.
    pub fn filter_sql(&self) -> Option<String> {
        self.filter.as_ref().map(ToSql::to_sql)
    }

    /// Body of the ORDER BY clause, if there is an ordering.
    pub fn ordering_sql(&self) -> Option<String> {
        self.ordering.as_ref().map(ToSql::to_sql)
    }

    pub fn parameters(&self) -> CritResult<ParameterMap> {
        match &self.filter {
            Some(filter) => filter.parameters(),
            None => Ok(ParameterMap::new()),
        }
    }

    /// Append ` WHERE ...` and ` ORDER BY ...` to a base query.
    ///
    /// The base query must not carry its own WHERE or ORDER BY clause.
    pub fn apply(self, base_query: &str) -> CritResult<Command> {
        let parameters = self.parameters()?;

        let mut text = base_query.trim_end().to_string();
        if let Some(filter) = self.filter_sql() {
            text.push_str(" WHERE ");
            text.push_str(&filter);
        }
        if let Some(order) = self.ordering_sql() {
            text.push_str(" ORDER BY ");
            text.push_str(&order);
        }

        tracing::debug!(sql = %text, params = parameters.len(), "criteria applied");
        Ok(Command { text, parameters })
    }
}

/// Command text with its named parameters, ready to be bound by a driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub text: String,
    pub parameters: ParameterMap,
}

impl Command {
    pub fn new(text: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            text: text.into(),
            parameters,
        }
    }

    /// Command text with every parameter substituted, for logs and audits.
    pub fn to_literal_sql(&self) -> String {
        LiteralRenderer::new().render(&self.text, &self.parameters)
    }
}
