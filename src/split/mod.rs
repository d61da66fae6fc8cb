//! Train/val/test partition assignment.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::annotation::{ImageId, ImageRecord, Partition};
use crate::error::SegsetError;

/// Split fractions. The test share is whatever train and val leave over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
}

impl SplitRatios {
    pub fn test(&self) -> f64 {
        (1.0 - self.train - self.val).max(0.0)
    }

    /// Checks that both fractions are in [0, 1] and sum to at most 1.
    pub fn validate(&self) -> Result<(), SegsetError> {
        for (name, value) in [("train", self.train), ("val", self.val)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SegsetError::InvalidSplit {
                    message: format!("{} fraction must be in [0.0, 1.0], got {}", name, value),
                });
            }
        }
        if self.train + self.val > 1.0 + 1e-9 {
            return Err(SegsetError::InvalidSplit {
                message: format!(
                    "train + val must not exceed 1.0, got {}",
                    self.train + self.val
                ),
            });
        }
        Ok(())
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            val: 0.1,
        }
    }
}

/// Number of images assigned to each partition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Randomly assigns every image to a partition.
///
/// Images are ordered by file name before shuffling, so a given seed always
/// produces the same assignment regardless of input order. Partition sizes
/// are rounded from the ratios; the test partition takes the remainder.
pub fn assign_partitions(
    images: &mut [ImageRecord],
    ratios: SplitRatios,
    seed: Option<u64>,
) -> Result<SplitSummary, SegsetError> {
    ratios.validate()?;

    let total = images.len();
    let mut order = sorted_positions(images);
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        order.shuffle(&mut rng);
    }

    let n_train = ((total as f64 * ratios.train).round() as usize).min(total);
    let n_val = ((total as f64 * ratios.val).round() as usize).min(total - n_train);

    for (rank, &pos) in order.iter().enumerate() {
        images[pos].partition = if rank < n_train {
            Partition::Train
        } else if rank < n_train + n_val {
            Partition::Val
        } else {
            Partition::Test
        };
    }

    let summary = SplitSummary {
        train: n_train,
        val: n_val,
        test: total - n_train - n_val,
    };
    log::info!(
        "split {} image(s): {} train, {} val, {} test",
        total,
        summary.train,
        summary.val,
        summary.test
    );
    Ok(summary)
}

/// Positions of `images` ordered by file name, then id.
fn sorted_positions(images: &[ImageRecord]) -> Vec<usize> {
    let mut rows: Vec<(&str, ImageId, usize)> = images
        .iter()
        .enumerate()
        .map(|(pos, image)| (image.file_name.as_str(), image.id, pos))
        .collect();
    rows.sort();
    rows.into_iter().map(|(_, _, pos)| pos).collect()
}
