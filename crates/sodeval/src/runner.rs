//! Multi-dataset orchestration and report glue.

use sodeval_metric::DatasetResult;
use sodeval_report::{normalize_name, MetricValues, ReportRecorder};

use crate::{
    config::{DatasetSpec, EvalConfig},
    error::EvalResult,
    evaluator::DatasetEvaluator,
    source::{BatchSource, Predictor},
};

/// One dataset's aggregated outcome.
#[derive(Debug, Clone)]
pub struct DatasetRun {
    /// Case-normalized dataset name.
    pub name: String,
    pub result: DatasetResult,
}

/// Per-dataset results of one run, in evaluation order. Datasets that
/// failed are absent.
#[derive(Debug, Clone, Default)]
pub struct RunResults {
    runs: Vec<DatasetRun>,
}

impl RunResults {
    pub fn get(&self, name: &str) -> Option<&DatasetResult> {
        let key = normalize_name(name);
        self.runs
            .iter()
            .find(|run| run.name == key)
            .map(|run| &run.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetRun> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, name: String, result: DatasetResult) {
        self.runs.push(DatasetRun { name, result });
    }

    /// Rows in recorder form: per dataset, metric name → value.
    pub fn to_metric_values(&self) -> Vec<(String, MetricValues)> {
        self.runs
            .iter()
            .map(|run| {
                let values = run
                    .result
                    .iter()
                    .map(|(measure, value)| (measure.name().to_owned(), value))
                    .collect();
                (run.name.clone(), values)
            })
            .collect()
    }
}

/// Evaluates every configured dataset in order, isolating failures.
pub struct MultiDatasetRunner {
    config: EvalConfig,
}

impl MultiDatasetRunner {
    pub const fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Runs the configured datasets. `make_source` builds a fresh sample
    /// source per dataset; a dataset that fails is logged and left out of
    /// the results while the rest proceed.
    pub fn run<S, P, F>(&self, predictor: &mut P, mut make_source: F) -> RunResults
    where
        S: BatchSource,
        P: Predictor<S::Input>,
        F: FnMut(&DatasetSpec) -> EvalResult<S>,
    {
        let mut results = RunResults::default();
        for spec in &self.config.datasets {
            tracing::info!(
                dataset = %spec.name,
                path = %spec.path.display(),
                "evaluating dataset"
            );
            match self.run_dataset(spec, predictor, &mut make_source) {
                Ok(result) => results.push(normalize_name(&spec.name), result),
                Err(error) => tracing::error!(
                    dataset = %spec.name,
                    %error,
                    "dataset evaluation failed, continuing"
                ),
            }
        }
        results
    }

    fn run_dataset<S, P, F>(
        &self,
        spec: &DatasetSpec,
        predictor: &mut P,
        make_source: &mut F,
    ) -> EvalResult<DatasetResult>
    where
        S: BatchSource,
        P: Predictor<S::Input>,
        F: FnMut(&DatasetSpec) -> EvalResult<S>,
    {
        let mut source = make_source(spec)?;
        let evaluator = DatasetEvaluator::new(
            self.config.save_root.join(&spec.name),
            self.config.mode,
            self.config.save_predictions,
            self.config.measures.clone(),
        );
        evaluator.evaluate(&mut source, predictor)
    }

    /// Persists one run into the configured report file.
    pub fn record(&self, results: &RunResults) -> EvalResult<()> {
        let metrics: Vec<String> = self
            .config
            .measures
            .iter()
            .map(|measure| measure.name().to_owned())
            .collect();
        let recorder = ReportRecorder::open(&self.config.report_path, &self.config.model, metrics)?;
        recorder.record(&self.config.experiment, &results.to_metric_values())?;
        Ok(())
    }
}
