use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const ERROR_LABEL: &str = "Error";

/// A top-level category and the subcategories filed under it, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<String>,
}

/// Ordered category -> subcategories mapping. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub(crate) fn from_categories(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// `(subcategory, category)` pairs in file order.
    pub fn flattened(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|c| {
                c.subcategories
                    .iter()
                    .map(move |s| (s.as_str(), c.name.as_str()))
            })
            .collect()
    }

    pub fn category_of(&self, subcategory: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.subcategories.iter().any(|s| s == subcategory))
            .map(|c| c.name.as_str())
    }

    pub fn contains_subcategory(&self, subcategory: &str) -> bool {
        self.category_of(subcategory).is_some()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Outcome of classifying one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Whatever the model answered, first line only.
    Label(String),
    /// The model could not be asked or refused to answer.
    Uncategorized,
    /// Processing the row failed outside the model call.
    Error,
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::Label(label) => label,
            Classification::Uncategorized => UNCATEGORIZED,
            Classification::Error => ERROR_LABEL,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub balance: Option<f64>,
    /// Values of columns the categorizer does not interpret, keyed by the
    /// batch's `extra_columns` order.
    pub extra: Vec<String>,
    pub subcategory: Option<Classification>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            balance: None,
            extra: Vec::new(),
            subcategory: None,
        }
    }
}

/// Which role each source column plays, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Date,
    Description,
    Amount,
    Balance,
    /// Pass-through column; the index points into `Transaction::extra`.
    Other { name: String, index: usize },
}

impl Column {
    pub fn header(&self) -> &str {
        match self {
            Column::Date => "Date",
            Column::Description => "Description",
            Column::Amount => "Amount",
            Column::Balance => "Balance",
            Column::Other { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionBatch {
    pub columns: Vec<Column>,
    pub transactions: Vec<Transaction>,
}

impl TransactionBatch {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    pub fn has_balance(&self) -> bool {
        self.columns.contains(&Column::Balance)
    }
}

/// Everything the classification loop needs, produced by the extract phase.
#[derive(Debug, Clone)]
pub struct ExtractedData {
    pub taxonomy: Taxonomy,
    pub batch: TransactionBatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { rows: usize, output_path: String },
    /// The availability probe failed; nothing was read or written.
    ModelUnavailable,
}
