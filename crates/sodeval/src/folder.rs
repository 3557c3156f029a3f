//! Directory-backed sample source.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;
use walkdir::WalkDir;

use crate::{
    error::{EvalError, EvalResult},
    source::{BatchSource, SampleBatch},
};

/// Errors specific to directory scanning.
#[derive(Error, Debug)]
pub enum FolderError {
    #[error("image directory not found: {path}")]
    ImageDirectoryNotFound { path: PathBuf },

    #[error("mask directory not found: {path}")]
    MaskDirectoryNotFound { path: PathBuf },

    #[error("no image/mask pairs under: {path}")]
    NoValidPairs { path: PathBuf },

    #[error("failed to open image: {path}")]
    ImageOpenFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A [`BatchSource`] over `<root>/Image` inputs paired with
/// `<root>/Mask/<stem>.<mask_ext>` ground truths.
///
/// Pairs are collected up front in name order; images are decoded lazily,
/// one batch at a time. Inputs without a matching mask are skipped.
pub struct FolderSource {
    pairs: Vec<(PathBuf, PathBuf, String)>,
    cursor: usize,
    batch_size: usize,
}

impl FolderSource {
    /// Scans with the conventional `.jpg` image / `.png` mask suffixes.
    pub fn new(root: impl AsRef<Path>, batch_size: usize) -> EvalResult<Self> {
        Self::with_suffixes(root, batch_size, "jpg", "png")
    }

    pub fn with_suffixes(
        root: impl AsRef<Path>,
        batch_size: usize,
        image_ext: &str,
        mask_ext: &str,
    ) -> EvalResult<Self> {
        let root = root.as_ref();
        let image_dir = root.join("Image");
        let mask_dir = root.join("Mask");
        if !image_dir.is_dir() {
            return Err(EvalError::source_failure(
                FolderError::ImageDirectoryNotFound { path: image_dir },
            ));
        }
        if !mask_dir.is_dir() {
            return Err(EvalError::source_failure(
                FolderError::MaskDirectoryNotFound { path: mask_dir },
            ));
        }

        let mut pairs = Vec::new();
        for entry in WalkDir::new(&image_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(image_ext));
            if !matches_ext {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let mask = mask_dir.join(format!("{stem}.{mask_ext}"));
            if mask.is_file() {
                pairs.push((path.to_path_buf(), mask, stem.to_owned()));
            } else {
                tracing::warn!(image = %path.display(), "no matching mask, skipping");
            }
        }
        pairs.sort_by(|a, b| a.2.cmp(&b.2));

        if pairs.is_empty() {
            return Err(EvalError::source_failure(FolderError::NoValidPairs {
                path: root.to_path_buf(),
            }));
        }
        tracing::debug!(root = %root.display(), pairs = pairs.len(), "folder source ready");

        Ok(Self {
            pairs,
            cursor: 0,
            batch_size: batch_size.max(1),
        })
    }

    /// Number of image/mask pairs found.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl BatchSource for FolderSource {
    type Input = DynamicImage;

    fn next_batch(&mut self) -> EvalResult<Option<SampleBatch<DynamicImage>>> {
        if self.cursor >= self.pairs.len() {
            return Ok(None);
        }
        let end = (self.cursor + self.batch_size).min(self.pairs.len());
        let mut batch = SampleBatch {
            inputs: Vec::with_capacity(end - self.cursor),
            mask_paths: Vec::with_capacity(end - self.cursor),
            names: Vec::with_capacity(end - self.cursor),
        };
        for (image_path, mask_path, name) in &self.pairs[self.cursor..end] {
            let input = image::open(image_path).map_err(|source| {
                EvalError::source_failure(FolderError::ImageOpenFailed {
                    path: image_path.clone(),
                    source,
                })
            })?;
            batch.inputs.push(input);
            batch.mask_paths.push(mask_path.clone());
            batch.names.push(name.clone());
        }
        self.cursor = end;
        Ok(Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::GrayImage;
    use tempfile::tempdir;

    use super::*;

    fn write_pair(root: &Path, name: &str) {
        let image = GrayImage::from_pixel(4, 4, image::Luma([120]));
        image.save(root.join("Image").join(format!("{name}.jpg"))).unwrap();
        let mask = GrayImage::from_pixel(4, 4, image::Luma([255]));
        mask.save(root.join("Mask").join(format!("{name}.png"))).unwrap();
    }

    fn scaffold(root: &Path) {
        fs::create_dir_all(root.join("Image")).unwrap();
        fs::create_dir_all(root.join("Mask")).unwrap();
    }

    #[test]
    fn batches_come_in_name_order() {
        let dir = tempdir().unwrap();
        scaffold(dir.path());
        write_pair(dir.path(), "b");
        write_pair(dir.path(), "a");
        write_pair(dir.path(), "c");
        let mut source = FolderSource::new(dir.path(), 2).unwrap();
        assert_eq!(source.len(), 3);
        let first = source.next_batch().unwrap().unwrap();
        assert_eq!(first.names, ["a", "b"]);
        let second = source.next_batch().unwrap().unwrap();
        assert_eq!(second.names, ["c"]);
        assert!(source.next_batch().unwrap().is_none());
    }

    #[test]
    fn unmatched_images_are_skipped() {
        let dir = tempdir().unwrap();
        scaffold(dir.path());
        write_pair(dir.path(), "a");
        let orphan = GrayImage::from_pixel(4, 4, image::Luma([10]));
        orphan
            .save(dir.path().join("Image").join("orphan.jpg"))
            .unwrap();
        let source = FolderSource::new(dir.path(), 8).unwrap();
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn missing_directories_fail_up_front() {
        let dir = tempdir().unwrap();
        assert!(FolderSource::new(dir.path(), 4).is_err());
        fs::create_dir_all(dir.path().join("Image")).unwrap();
        assert!(FolderSource::new(dir.path(), 4).is_err());
    }

    #[test]
    fn empty_pairing_is_an_error() {
        let dir = tempdir().unwrap();
        scaffold(dir.path());
        assert!(matches!(
            FolderSource::new(dir.path(), 4),
            Err(EvalError::Source { .. })
        ));
    }
}
