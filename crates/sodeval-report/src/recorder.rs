//! Load-mutate-save recording of run results.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    datasets::normalize_name,
    error::{ReportError, ReportResult},
    workbook::Workbook,
};

/// Metric name → value map for one dataset, as handed to the recorder.
pub type MetricValues = BTreeMap<String, f64>;

/// Persists evaluation runs into the report file.
///
/// Every write goes through load → mutate → save, so concurrent writers
/// are out of scope but successive runs compose: recording the same
/// experiment twice leaves an identical file.
#[derive(Debug, Clone)]
pub struct ReportRecorder {
    path: PathBuf,
    model: String,
    metrics: Vec<String>,
}

impl ReportRecorder {
    /// Opens the report at `path`, creating a header-only file when none
    /// exists. `metrics` fixes the column order used when sheets are first
    /// created.
    pub fn open(
        path: impl Into<PathBuf>,
        model: impl Into<String>,
        metrics: Vec<String>,
    ) -> ReportResult<Self> {
        let recorder = Self {
            path: path.into(),
            model: model.into(),
            metrics,
        };
        if !recorder.path.exists() {
            tracing::info!(path = %recorder.path.display(), "creating report file");
            recorder.save(&Workbook::new(recorder.metrics.clone()))?;
        }
        Ok(recorder)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one run's per-dataset results under `experiment`.
    ///
    /// Dataset names are case-normalized; unknown datasets and metrics
    /// extend the header at its edge, and re-recording an experiment
    /// overwrites its cells in place.
    pub fn record(&self, experiment: &str, run: &[(String, MetricValues)]) -> ReportResult<()> {
        let mut workbook = self.load()?;

        let extra: Vec<&str> = run
            .iter()
            .flat_map(|(_, values)| values.keys())
            .map(String::as_str)
            .collect();
        workbook
            .results
            .ensure_metrics(self.metrics.iter().map(String::as_str).chain(extra.clone()));

        for (name, _) in run {
            workbook.results.ensure_dataset(&normalize_name(name));
        }
        let row = workbook.results.row_mut(experiment);
        for (name, values) in run {
            row.cells.insert(normalize_name(name), values.clone());
        }

        let sheet = workbook.model_sheet_mut(&self.model, &self.metrics);
        for name in extra {
            if !sheet.metrics.iter().any(|m| m == name) {
                sheet.metrics.push(name.to_owned());
            }
        }
        for (name, values) in run {
            sheet.row_mut(&normalize_name(name)).values = values.clone();
        }

        self.save(&workbook)?;
        tracing::info!(
            experiment = %experiment,
            datasets = run.len(),
            path = %self.path.display(),
            "run recorded"
        );
        Ok(())
    }

    /// Reads the current workbook, verifying layout before anything is
    /// mutated. A file without a `results` sheet is fatal.
    pub fn load(&self) -> ReportResult<Workbook> {
        let file = File::open(&self.path).map_err(|source| ReportError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ReportError::Malformed {
                    path: self.path.clone(),
                    source,
                }
            })?;
        if !value.get("results").is_some_and(Value::is_object) {
            return Err(ReportError::IncompatibleLayout {
                path: self.path.clone(),
                reason: "no 'results' sheet".to_owned(),
            });
        }
        serde_json::from_value(value).map_err(|source| ReportError::IncompatibleLayout {
            path: self.path.clone(),
            reason: source.to_string(),
        })
    }

    fn save(&self, workbook: &Workbook) -> ReportResult<()> {
        let io_err = |source| ReportError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, workbook).map_err(|source| {
            ReportError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn metrics() -> Vec<String> {
        vec!["MAXF".to_owned(), "MEANF".to_owned(), "MAE".to_owned()]
    }

    fn run() -> Vec<(String, MetricValues)> {
        let mut values = MetricValues::new();
        values.insert("MAXF".to_owned(), 0.9);
        values.insert("MEANF".to_owned(), 0.85);
        values.insert("MAE".to_owned(), 0.04);
        vec![("ecssd".to_owned(), values)]
    }

    #[test]
    fn open_creates_a_seeded_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        let wb = recorder.load().unwrap();
        assert_eq!(wb.results.metrics, metrics());
        assert_eq!(wb.results.datasets.len(), 8);
        assert!(wb.results.rows.is_empty());
    }

    #[test]
    fn open_does_not_clobber_an_existing_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        recorder.record("exp-1", &run()).unwrap();
        let reopened = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        assert_eq!(reopened.load().unwrap().results.rows.len(), 1);
    }

    #[test]
    fn recording_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        recorder.record("exp-1", &run()).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        recorder.record("exp-1", &run()).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
        let wb = recorder.load().unwrap();
        assert_eq!(wb.results.rows.len(), 1);
    }

    #[test]
    fn dataset_keys_are_normalized_and_backfilled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        recorder.record("exp-1", &run()).unwrap();
        let wb = recorder.load().unwrap();
        let row = &wb.results.rows[0];
        assert!(row.cells.contains_key("ECSSD"));
        let idx = wb.results.dataset_index("ECSSD").unwrap();
        assert_eq!(wb.results.datasets[idx].samples, Some(1000));
    }

    #[test]
    fn unknown_datasets_and_metrics_extend_the_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        let mut values = MetricValues::new();
        values.insert("MAE".to_owned(), 0.1);
        values.insert("S-measure".to_owned(), 0.8);
        recorder
            .record("exp-1", &[("myset".to_owned(), values)])
            .unwrap();
        let wb = recorder.load().unwrap();
        assert_eq!(wb.results.datasets.last().map(|d| d.name.as_str()), Some("MYSET"));
        assert_eq!(wb.results.datasets.last().and_then(|d| d.samples), None);
        assert_eq!(wb.results.metrics.last().map(String::as_str), Some("S-measure"));
        assert_eq!(&wb.results.metrics[..3], &metrics()[..]);
    }

    #[test]
    fn model_sheets_accumulate_per_family() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        ReportRecorder::open(&path, "vgg16", metrics())
            .unwrap()
            .record("exp-1", &run())
            .unwrap();
        ReportRecorder::open(&path, "res50", metrics())
            .unwrap()
            .record("exp-2", &run())
            .unwrap();
        let wb = ReportRecorder::open(&path, "vgg16", metrics())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(wb.models.len(), 2);
        assert_eq!(wb.models[0].model, "vgg16");
        assert_eq!(wb.models[0].rows[0].dataset, "ECSSD");
        assert_eq!(wb.models[0].rows[0].samples, Some(1000));
        assert_eq!(wb.results.rows.len(), 2);
    }

    #[test]
    fn incompatible_layout_is_fatal_and_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "{\"unrelated\": 1}").unwrap();
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        let err = recorder.record("exp-1", &run()).unwrap_err();
        assert!(matches!(err, ReportError::IncompatibleLayout { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"unrelated\": 1}");
    }

    #[test]
    fn malformed_json_is_reported_as_such() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "not json").unwrap();
        let recorder = ReportRecorder::open(&path, "vgg16", metrics()).unwrap();
        assert!(matches!(
            recorder.load().unwrap_err(),
            ReportError::Malformed { .. }
        ));
    }
}
