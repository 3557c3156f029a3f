//! Typed in-memory model of the report.
//!
//! The grid replaces cell-address arithmetic: column groups per dataset,
//! rows per experiment, a transposed sheet per model family. Serialization
//! happens only at the file boundary (see [`crate::recorder`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::datasets::{builtin_size, BUILTIN_DATASETS};

/// One dataset column group in the results sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetColumn {
    pub name: String,
    /// Sample count, known only for built-in benchmark datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<u64>,
}

/// One experiment row: cells keyed by dataset name, then metric name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub experiment: String,
    #[serde(default)]
    pub cells: BTreeMap<String, BTreeMap<String, f64>>,
}

/// The flat sheet: one row per experiment, columns grouped by dataset.
///
/// Both header dimensions are append-only; existing entries never move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSheet {
    /// Metric order within every dataset group.
    pub metrics: Vec<String>,
    /// Dataset column groups, left to right.
    pub datasets: Vec<DatasetColumn>,
    #[serde(default)]
    pub rows: Vec<ExperimentRow>,
}

impl ResultsSheet {
    pub fn dataset_index(&self, name: &str) -> Option<usize> {
        self.datasets.iter().position(|d| d.name == name)
    }

    /// Appends a dataset column group at the right edge if absent.
    pub fn ensure_dataset(&mut self, name: &str) {
        if self.dataset_index(name).is_none() {
            self.datasets.push(DatasetColumn {
                name: name.to_owned(),
                samples: builtin_size(name),
            });
        }
    }

    /// Appends unseen metric names at the end of the metric order.
    pub fn ensure_metrics<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if !self.metrics.iter().any(|m| m == name) {
                self.metrics.push(name.to_owned());
            }
        }
    }

    /// Row for `experiment`, appended if absent.
    pub fn row_mut(&mut self, experiment: &str) -> &mut ExperimentRow {
        if let Some(idx) = self.rows.iter().position(|r| r.experiment == experiment) {
            &mut self.rows[idx]
        } else {
            self.rows.push(ExperimentRow {
                experiment: experiment.to_owned(),
                cells: BTreeMap::new(),
            });
            let last = self.rows.len() - 1;
            &mut self.rows[last]
        }
    }
}

/// One dataset row of a per-model sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub dataset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<u64>,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

/// The transposed per-model-family sheet: datasets as rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSheet {
    pub model: String,
    pub metrics: Vec<String>,
    #[serde(default)]
    pub rows: Vec<DatasetRow>,
}

impl ModelSheet {
    /// Row for `dataset`, appended if absent.
    pub fn row_mut(&mut self, dataset: &str) -> &mut DatasetRow {
        if let Some(idx) = self.rows.iter().position(|r| r.dataset == dataset) {
            &mut self.rows[idx]
        } else {
            self.rows.push(DatasetRow {
                dataset: dataset.to_owned(),
                samples: builtin_size(dataset),
                values: BTreeMap::new(),
            });
            let last = self.rows.len() - 1;
            &mut self.rows[last]
        }
    }
}

/// The whole two-part report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub results: ResultsSheet,
    #[serde(default)]
    pub models: Vec<ModelSheet>,
}

impl Workbook {
    /// A header-only workbook seeded with the built-in benchmark datasets
    /// and the given metric order.
    pub fn new(metrics: Vec<String>) -> Self {
        Self {
            results: ResultsSheet {
                metrics,
                datasets: BUILTIN_DATASETS
                    .iter()
                    .map(|&(name, samples)| DatasetColumn {
                        name: name.to_owned(),
                        samples: Some(samples),
                    })
                    .collect(),
                rows: Vec::new(),
            },
            models: Vec::new(),
        }
    }

    /// Sheet for `model`, created with the given metric order if absent.
    pub fn model_sheet_mut(&mut self, model: &str, metrics: &[String]) -> &mut ModelSheet {
        if let Some(idx) = self.models.iter().position(|s| s.model == model) {
            &mut self.models[idx]
        } else {
            self.models.push(ModelSheet {
                model: model.to_owned(),
                metrics: metrics.to_vec(),
                rows: Vec::new(),
            });
            let last = self.models.len() - 1;
            &mut self.models[last]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_workbook_is_seeded_with_builtins() {
        let wb = Workbook::new(vec!["MAE".to_owned()]);
        assert_eq!(wb.results.datasets.len(), BUILTIN_DATASETS.len());
        assert_eq!(wb.results.datasets[0].name, "DUTS");
        assert_eq!(wb.results.datasets[0].samples, Some(5019));
        assert!(wb.results.rows.is_empty());
        assert!(wb.models.is_empty());
    }

    #[test]
    fn datasets_append_at_the_right_edge() {
        let mut wb = Workbook::new(vec![]);
        let before: Vec<String> = wb.results.datasets.iter().map(|d| d.name.clone()).collect();
        wb.results.ensure_dataset("MYSET");
        wb.results.ensure_dataset("MYSET");
        assert_eq!(wb.results.datasets.len(), before.len() + 1);
        let after: Vec<String> = wb.results.datasets.iter().map(|d| d.name.clone()).collect();
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().map(String::as_str), Some("MYSET"));
        assert_eq!(wb.results.datasets.last().and_then(|d| d.samples), None);
    }

    #[test]
    fn metric_growth_is_append_only() {
        let mut sheet = ResultsSheet {
            metrics: vec!["MAE".to_owned(), "MAXF".to_owned()],
            datasets: Vec::new(),
            rows: Vec::new(),
        };
        sheet.ensure_metrics(["MAXF", "S-measure"]);
        assert_eq!(sheet.metrics, ["MAE", "MAXF", "S-measure"]);
    }

    #[test]
    fn rows_are_found_or_appended() {
        let mut wb = Workbook::new(vec![]);
        wb.results.row_mut("exp-a");
        wb.results.row_mut("exp-b");
        wb.results.row_mut("exp-a");
        assert_eq!(wb.results.rows.len(), 2);
    }
}
