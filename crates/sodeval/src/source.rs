//! Collaborator interfaces: sample delivery and prediction.

use std::path::PathBuf;

use ndarray::Array2;

use crate::error::EvalResult;

/// One batch of evaluation samples, as delivered by a sample source.
///
/// The three vectors are parallel: index `i` of each describes the same
/// sample.
#[derive(Debug, Clone)]
pub struct SampleBatch<I> {
    /// Model inputs, opaque to the evaluation core.
    pub inputs: Vec<I>,
    /// Ground-truth mask file per sample.
    pub mask_paths: Vec<PathBuf>,
    /// Stable sample identifiers; also the prediction file stems.
    pub names: Vec<String>,
}

impl<I> SampleBatch<I> {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A lazy, finite sequence of sample batches.
///
/// A source is consumed by one orchestration call; the runner builds a
/// fresh one per dataset.
pub trait BatchSource {
    type Input;

    /// The next batch, or `None` once the sequence is exhausted.
    fn next_batch(&mut self) -> EvalResult<Option<SampleBatch<Self::Input>>>;
}

/// The external saliency predictor.
///
/// Returns one confidence map in `[0, 1]` per input, in input order; the
/// call blocks until the whole batch is done. Map dimensions may differ
/// from the ground truth's, the orchestrator resizes.
pub trait Predictor<I> {
    fn predict(&mut self, inputs: &[I]) -> EvalResult<Vec<Array2<f32>>>;
}
