#![warn(clippy::all)]

mod and_not;
mod and_query;
mod constant;
mod dis_max;
mod disjunction;
mod driver;
mod dsl;
mod error;
mod fd_cache;
mod iterator;
mod or_query;
pub mod persistence;
pub mod query;
mod term;

pub use driver::for_each;
pub use dsl::{translate, translate_json, QueryDescription};
pub use error::{BoxError, BoxResult, QueryError};
pub use fd_cache::FdCache;
pub use iterator::{BoxedIterator, QueryIterator, NOT_READY, NO_MORE};
