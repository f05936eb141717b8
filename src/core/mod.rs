pub mod engine;
pub mod inference;
pub mod pipeline;
pub mod prompt;
pub mod taxonomy;
pub mod transactions;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Classification, Taxonomy, Transaction, TransactionBatch};
pub use crate::domain::ports::{Classifier, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
