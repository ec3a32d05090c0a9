//! # Query Options Parsing
//!
//! Converts flat request parameters into structured query options: filter,
//! sort, projection, pagination and relation expansion.

pub mod errors;
pub mod filter;
pub mod options;
pub mod pagination;
pub mod params;
pub mod parser;
pub mod populate;
pub mod predefined;
pub mod select;
pub mod sort;
mod unary;

pub use errors::{QueryError, QueryResult};
pub use filter::{FilterBuilder, FilterOperator, FilterToken};
pub use options::{OperatorKeys, QueryOptions};
pub use pagination::{cast_limit, cast_skip};
pub use params::Params;
pub use parser::{ParserBuilder, QueryInput, QueryParser};
pub use populate::{cast_populate, PopulateDescriptor};
pub use select::{cast_select, Projection};
pub use sort::{cast_sort, SortSpec};
pub use unary::parse_unaries;
