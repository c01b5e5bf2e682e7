pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use error::{Result, SchemaError, Stage};
pub use model::{FieldSelection, FilterOptions, FilteredColumn, FilteredRecord};
