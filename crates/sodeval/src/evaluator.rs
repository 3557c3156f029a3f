//! Single-dataset orchestration: cache policy, prediction, persistence
//! and measurement.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{
    imageops::{self, FilterType},
    GrayImage,
};
use ndarray::Array2;
use sodeval_metric::{DatasetAccumulator, DatasetResult, MeasureEngine, MeasureSet};

use crate::{
    cache::{must_regenerate, prediction_path, RunMode},
    error::{EvalError, EvalResult},
    source::{BatchSource, Predictor, SampleBatch},
};

/// Runs one dataset through the cache policy, the predictor and the
/// measure engine, then aggregates the outcome.
pub struct DatasetEvaluator {
    save_dir: PathBuf,
    mode: RunMode,
    save_predictions: bool,
    engine: MeasureEngine,
}

impl DatasetEvaluator {
    pub fn new(
        save_dir: impl Into<PathBuf>,
        mode: RunMode,
        save_predictions: bool,
        measures: MeasureSet,
    ) -> Self {
        Self {
            save_dir: save_dir.into(),
            mode,
            save_predictions,
            engine: MeasureEngine::new(measures),
        }
    }

    /// Drains `source`, scoring every sample. A sample whose ground truth
    /// cannot be read is logged and dropped; everything else is fatal for
    /// the dataset.
    pub fn evaluate<S, P>(&self, source: &mut S, predictor: &mut P) -> EvalResult<DatasetResult>
    where
        S: BatchSource,
        P: Predictor<S::Input>,
    {
        fs::create_dir_all(&self.save_dir).map_err(|source| EvalError::OutputDirectory {
            path: self.save_dir.clone(),
            source,
        })?;

        let mut accumulator = DatasetAccumulator::new(self.engine.measures().clone());
        while let Some(batch) = source.next_batch()? {
            if batch.is_empty() {
                continue;
            }
            self.process_batch(&batch, predictor, &mut accumulator)?;
        }
        tracing::info!(samples = accumulator.len(), "dataset aggregated");
        Ok(accumulator.finish())
    }

    fn process_batch<I, P>(
        &self,
        batch: &SampleBatch<I>,
        predictor: &mut P,
        accumulator: &mut DatasetAccumulator,
    ) -> EvalResult<()>
    where
        P: Predictor<I>,
    {
        // Reuse is decided per batch: a batched predictor produces whole
        // batches, so one missing file regenerates all of them.
        let fresh = if must_regenerate(self.mode, &self.save_dir, &batch.names) {
            let maps = predictor.predict(&batch.inputs)?;
            if maps.len() != batch.len() {
                return Err(EvalError::BatchSizeMismatch {
                    expected: batch.len(),
                    actual: maps.len(),
                });
            }
            Some(maps)
        } else {
            tracing::debug!(first = %batch.names[0], len = batch.len(), "reusing saved batch");
            None
        };

        for idx in 0..batch.len() {
            let name = &batch.names[idx];
            let mask_path = &batch.mask_paths[idx];
            let gt = match load_gray(mask_path) {
                Ok(gt) => gt,
                Err(source) => {
                    tracing::error!(
                        sample = %name,
                        path = %mask_path.display(),
                        error = %source,
                        "ground truth unreadable, dropping sample"
                    );
                    continue;
                }
            };

            let pred = match &fresh {
                Some(maps) => {
                    let resized = quantize_and_resize(&maps[idx], gt.dim());
                    if self.save_predictions {
                        self.save_prediction(name, &resized)?;
                    }
                    resized
                }
                None => {
                    let path = prediction_path(&self.save_dir, name);
                    match load_gray(&path) {
                        Ok(pred) => pred,
                        Err(source) => {
                            return Err(EvalError::PredictionLoad {
                                name: name.clone(),
                                path,
                                source,
                            });
                        }
                    }
                }
            };

            accumulator.push(&self.engine.evaluate(&pred, &gt));
        }
        Ok(())
    }

    fn save_prediction(&self, name: &str, map: &Array2<u8>) -> EvalResult<()> {
        let path = prediction_path(&self.save_dir, name);
        array_to_gray(map)
            .save(&path)
            .map_err(|source| EvalError::PredictionSave { path, source })
    }
}

/// Loads an image as a single-channel 8-bit map in row-major `(h, w)`.
fn load_gray(path: &Path) -> Result<Array2<u8>, image::ImageError> {
    let img = image::open(path)?.into_luma8();
    Ok(gray_to_array(&img))
}

fn gray_to_array(img: &GrayImage) -> Array2<u8> {
    let (w, h) = img.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        img.get_pixel(x as u32, y as u32)[0]
    })
}

fn array_to_gray(map: &Array2<u8>) -> GrayImage {
    let (h, w) = map.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        image::Luma([map[[y as usize, x as usize]]])
    })
}

/// Quantizes a confidence map to 8 bits and brings it to the ground
/// truth's resolution with nearest-neighbor sampling.
fn quantize_and_resize(map: &Array2<f32>, (h, w): (usize, usize)) -> Array2<u8> {
    let (mh, mw) = map.dim();
    let img = GrayImage::from_fn(mw as u32, mh as u32, |x, y| {
        let v = map[[y as usize, x as usize]].clamp(0.0, 1.0);
        image::Luma([(v * 255.0).round() as u8])
    });
    if (mh, mw) == (h, w) {
        gray_to_array(&img)
    } else {
        gray_to_array(&imageops::resize(&img, w as u32, h as u32, FilterType::Nearest))
    }
}
