//! Dataset-level aggregation of per-sample measures.

use std::collections::BTreeMap;

use crate::{
    engine::SampleMeasures,
    f_measure::PrCurve,
    measures::{Measure, MeasureSet},
    F_BETA_SQ,
};

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvgMeter {
    sum: f64,
    count: usize,
}

impl AvgMeter {
    pub fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Mean of the updates so far, 0 with no updates.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Elementwise running mean over equal-length precision/recall curves.
#[derive(Debug, Clone, Default)]
pub struct CurveMean {
    precision: Vec<f64>,
    recall: Vec<f64>,
    count: usize,
}

impl CurveMean {
    pub fn push(&mut self, precision: &[f64], recall: &[f64]) {
        if self.count == 0 {
            self.precision = vec![0.0; precision.len()];
            self.recall = vec![0.0; recall.len()];
        }
        for (acc, &p) in self.precision.iter_mut().zip(precision) {
            *acc += p;
        }
        for (acc, &r) in self.recall.iter_mut().zip(recall) {
            *acc += r;
        }
        self.count += 1;
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    /// Maximum F (β² = 0.3) over the mean curve.
    ///
    /// Per-threshold non-finite F values become 0 before the maximum is
    /// taken; an empty stack yields 0.
    pub fn max_f(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let mut best = 0.0;
        for (&p_sum, &r_sum) in self.precision.iter().zip(&self.recall) {
            let p = p_sum / n;
            let r = r_sum / n;
            let mut f = (1.0 + F_BETA_SQ) * p * r / (F_BETA_SQ * p + r);
            if !f.is_finite() {
                f = 0.0;
            }
            if f > best {
                best = f;
            }
        }
        best
    }
}

/// Folds per-sample measures into one dataset result.
#[derive(Debug, Clone)]
pub struct DatasetAccumulator {
    measures: MeasureSet,
    scalars: BTreeMap<Measure, AvgMeter>,
    legacy_curves: CurveMean,
    strict_curves: CurveMean,
    tolerant_curves: CurveMean,
    samples: usize,
}

impl DatasetAccumulator {
    pub fn new(measures: MeasureSet) -> Self {
        Self {
            measures,
            scalars: BTreeMap::new(),
            legacy_curves: CurveMean::default(),
            strict_curves: CurveMean::default(),
            tolerant_curves: CurveMean::default(),
            samples: 0,
        }
    }

    pub fn push(&mut self, sample: &SampleMeasures) {
        self.samples += 1;
        if let Some(legacy) = &sample.legacy {
            self.scalar(Measure::Mae).update(legacy.mae);
            self.scalar(Measure::MeanFLegacy).update(legacy.mean_f);
            self.legacy_curves.push(&legacy.precision, &legacy.recall);
        }
        for (&measure, &value) in &sample.scalars {
            self.scalar(measure).update(value);
        }
        if let Some(PrCurve { precision, recall }) = &sample.strict_curve {
            self.strict_curves.push(precision, recall);
        }
        if let Some(PrCurve { precision, recall }) = &sample.tolerant_curve {
            self.tolerant_curves.push(precision, recall);
        }
    }

    fn scalar(&mut self, measure: Measure) -> &mut AvgMeter {
        self.scalars.entry(measure).or_default()
    }

    /// Number of samples pushed.
    pub const fn len(&self) -> usize {
        self.samples
    }

    pub const fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Final per-measure values. Every enabled measure is present and
    /// finite; measures nothing contributed to are 0.
    pub fn finish(self) -> DatasetResult {
        let mut values = BTreeMap::new();
        for measure in self.measures.iter() {
            let value = match measure {
                Measure::MaxFLegacy => self.legacy_curves.max_f(),
                Measure::MaxF => self.strict_curves.max_f(),
                Measure::ModMaxF => self.tolerant_curves.max_f(),
                scalar => self.scalars.get(&scalar).map_or(0.0, AvgMeter::avg),
            };
            values.insert(measure, if value.is_finite() { value } else { 0.0 });
        }
        DatasetResult { values }
    }
}

/// Aggregated measure values of one dataset, in canonical measure order.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetResult {
    values: BTreeMap<Measure, f64>,
}

impl DatasetResult {
    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.values.get(&measure).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measure, f64)> + '_ {
        self.values.iter().map(|(&m, &v)| (m, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
