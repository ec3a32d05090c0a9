//! querycast - Translate flat URL query strings into typed document-database
//! query options
//!
//! A request such as
//!
//! ```text
//! status=active&age>=18&tags=a,b&sort=-created&select=name,email&populate=author.company&limit=20
//! ```
//!
//! becomes a filter, a sort order, a projection, pagination bounds and
//! relation-expansion descriptors.

pub mod cast;
pub mod cli;
pub mod config;
pub mod observability;
pub mod query;
pub mod value;

pub use cast::{Caster, CasterRegistry};
pub use config::{ConfigError, ParserConfig};
pub use query::{
    Params, ParserBuilder, PopulateDescriptor, QueryError, QueryInput, QueryOptions, QueryParser,
    QueryResult,
};
pub use value::{Map, RegexLiteral, Value};
