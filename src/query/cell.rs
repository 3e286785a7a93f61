//! Query tree nodes

use super::operation::{Combination, Comparison, OperationCode, SortDirection};
use super::value::QueryValue;

/// One node of the query tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryCell {
    /// Implicit always-true root; item 0 of every builder
    All,
    /// Comparison of a member path against a value
    Compare {
        combination: Combination,
        comparison: Comparison,
        member: String,
        value: QueryValue,
    },
    /// Nested sub-query (sentinel already stripped)
    Group {
        combination: Combination,
        cells: Vec<QueryCell>,
    },
    /// Sort directive
    Order {
        direction: SortDirection,
        member: String,
    },
}

impl QueryCell {
    /// Packed operation code of this cell
    pub fn operation(&self) -> OperationCode {
        match self {
            QueryCell::All => OperationCode::ALL,
            QueryCell::Compare {
                combination,
                comparison,
                ..
            } => OperationCode::comparison_leaf(*combination, *comparison),
            QueryCell::Group { combination, .. } => OperationCode::group(*combination),
            QueryCell::Order { direction, .. } => OperationCode::order(*direction),
        }
    }

    /// Member path, if the cell addresses one
    pub fn member(&self) -> Option<&str> {
        match self {
            QueryCell::Compare { member, .. } | QueryCell::Order { member, .. } => Some(member),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, QueryCell::All)
    }
}
