use crate::core::Pipeline;
use crate::domain::model::RunOutcome;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// Sequences a categorization run: availability check, load, classify, write.
pub struct CategorizeEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> CategorizeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// Nothing is read or written when the model is unavailable.
    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting transaction categorization...");

        if !self.pipeline.preflight().await? {
            tracing::error!("Exiting: the model is not accessible");
            return Ok(RunOutcome::ModelUnavailable);
        }

        tracing::info!("Loading taxonomy and transactions...");
        let data = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        tracing::info!("Categorizing {} transactions...", data.batch.len());
        let batch = self.pipeline.transform(data).await?;
        self.monitor.log_stats("Classify");

        let rows = batch.len();
        let output_path = self.pipeline.load(batch).await?;
        self.monitor.log_stats("Write");
        self.monitor.log_final_stats();

        Ok(RunOutcome::Completed { rows, output_path })
    }
}
