use crate::core::taxonomy::parse_taxonomy;
use crate::core::transactions::{format_amount, output_filename, read_transactions, write_transactions};
use crate::domain::model::{Classification, ExtractedData, TransactionBatch};
use crate::domain::ports::{Classifier, ConfigProvider, Pipeline, Storage};
use crate::utils::error::{CategorizeError, Result};
use std::path::Path;

const PREVIEW_ROWS: usize = 5;

pub struct CategorizePipeline<S: Storage, C: ConfigProvider, K: Classifier> {
    storage: S,
    config: C,
    classifier: K,
}

impl<S: Storage, C: ConfigProvider, K: Classifier> CategorizePipeline<S, C, K> {
    pub fn new(storage: S, config: C, classifier: K) -> Self {
        Self {
            storage,
            config,
            classifier,
        }
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.storage.read_file(path).await?;
        String::from_utf8(bytes).map_err(|e| CategorizeError::ProcessingError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })
    }

    /// Output location relative to the storage root.
    pub fn output_path(&self) -> String {
        Path::new(self.config.output_dir())
            .join(output_filename(self.config.model()))
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: Classifier> Pipeline for CategorizePipeline<S, C, K> {
    async fn preflight(&self) -> Result<bool> {
        Ok(self.classifier.is_available().await)
    }

    async fn extract(&self) -> Result<ExtractedData> {
        let taxonomy_path = self.config.taxonomy_path();
        let taxonomy = parse_taxonomy(&self.read_text(taxonomy_path).await?);
        tracing::info!(
            "Loaded {} categories with {} subcategories from {}",
            taxonomy.category_count(),
            taxonomy.subcategory_count(),
            taxonomy_path
        );

        let transactions_path = self.config.transactions_path();
        let data = self.storage.read_file(transactions_path).await?;
        let batch = read_transactions(&data)?;
        tracing::info!(
            "Loaded {} transactions from {}",
            batch.len(),
            transactions_path
        );
        tracing::info!("Columns found: {:?}", batch.headers());

        Ok(ExtractedData { taxonomy, batch })
    }

    async fn transform(&self, data: ExtractedData) -> Result<TransactionBatch> {
        let ExtractedData {
            taxonomy,
            mut batch,
        } = data;
        let total = batch.len();
        let interval = self.config.progress_interval().max(1);
        let strict = self.config.strict_labels();

        for (idx, txn) in batch.transactions.iter_mut().enumerate() {
            let outcome = match self.classifier.classify(txn, &taxonomy).await {
                Ok(Classification::Label(label))
                    if strict && !taxonomy.contains_subcategory(&label) =>
                {
                    tracing::warn!(
                        "Row {}: '{}' is not a known subcategory, marking as Uncategorized",
                        idx + 1,
                        label
                    );
                    Classification::Uncategorized
                }
                Ok(classification) => classification,
                Err(e) => {
                    tracing::error!("Error processing transaction {}: {}", idx + 1, e);
                    Classification::Error
                }
            };
            txn.subcategory = Some(outcome);

            if (idx + 1) % interval == 0 {
                tracing::info!("Processed {}/{} transactions", idx + 1, total);
            }
        }

        Ok(batch)
    }

    async fn load(&self, batch: TransactionBatch) -> Result<String> {
        let output_path = self.output_path();
        let data = write_transactions(&batch)?;

        tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        tracing::info!(
            "Done! Saved {} categorized transactions to {}",
            batch.len(),
            output_path
        );
        for txn in batch.transactions.iter().take(PREVIEW_ROWS) {
            tracing::info!(
                "  {} | {} | {} | {}",
                txn.date,
                txn.description,
                format_amount(txn.amount),
                txn.subcategory.as_ref().map(|c| c.as_str()).unwrap_or("")
            );
        }

        Ok(output_path)
    }
}
