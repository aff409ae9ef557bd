//! Class-balanced few-shot sampling.
//!
//! The whole `train` split is shuffled with a seeded permutation, then split
//! per label. Each label contributes `min(available / 2, cap)` examples to
//! `train` and the same number of different examples to `validation`.
//! Contributions are concatenated in ascending label order.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::datasets::{
    DatasetBundle, DatasetSplit, Example, LabelOrdinalError, SampleError, SplitNotFoundError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FewShotSampler {
    pub num_labels: usize,
    /// Per-label cap on examples in each output split.
    pub cap: usize,
    pub seed: u64,
    /// Fail with [`SampleError::InsufficientData`] instead of letting a label
    /// contribute nothing.
    pub require_every_label: bool,
}

impl FewShotSampler {
    pub fn new(num_labels: usize, cap: usize, seed: u64) -> Self {
        Self {
            num_labels,
            cap,
            seed,
            require_every_label: false,
        }
    }

    pub fn require_every_label(mut self, require: bool) -> Self {
        self.require_every_label = require;
        self
    }

    /// Replaces `train` and `validation` of `bundle` with balanced subsets of
    /// the original `train` split. Other splits pass through untouched.
    pub fn sample(&self, mut bundle: DatasetBundle) -> Result<DatasetBundle, SampleError> {
        let (train, validation) = {
            let source = bundle
                .get(DatasetSplit::Train.name())
                .ok_or_else(|| SplitNotFoundError(DatasetSplit::Train.name().to_owned()))?;
            self.sample_split(source)?
        };

        log::info!(
            "Sampled {} train / {} validation examples (seed {}, cap {})",
            train.len(),
            validation.len(),
            self.seed,
            self.cap
        );
        bundle.insert(DatasetSplit::Train.name(), train);
        bundle.insert(DatasetSplit::Validation.name(), validation);
        Ok(bundle)
    }

    /// Returns the balanced `(train, validation)` pair drawn from `data`.
    pub fn sample_split(
        &self,
        data: &[Example],
    ) -> Result<(Vec<Example>, Vec<Example>), SampleError> {
        let partitions = self.partition(data)?;

        let mut train = Vec::new();
        let mut validation = Vec::new();
        for (label, indices) in partitions.iter().enumerate() {
            let per_label = (indices.len() / 2).min(self.cap);
            log::debug!(
                "label {label}: {} available, taking {per_label}",
                indices.len()
            );
            if per_label == 0 && self.require_every_label && self.cap > 0 {
                return Err(SampleError::InsufficientData {
                    label,
                    available: indices.len(),
                });
            }
            train.extend(indices[..per_label].iter().map(|&i| data[i].clone()));
            validation.extend(indices[per_label..2 * per_label].iter().map(|&i| data[i].clone()));
        }
        Ok((train, validation))
    }

    /// Indices of `data` grouped by label, each group in shuffled order.
    fn partition(&self, data: &[Example]) -> Result<Vec<Vec<usize>>, SampleError> {
        if self.num_labels == 0 {
            return Err(SampleError::NoLabels);
        }
        if let Some(ex) = data.iter().find(|ex| ex.label >= self.num_labels) {
            return Err(LabelOrdinalError {
                found: ex.label,
                max: self.num_labels,
            }
            .into());
        }

        // The whole split is permuted before grouping by label.
        let mut order: Vec<usize> = (0..data.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        let mut partitions = vec![Vec::new(); self.num_labels];
        for i in order {
            partitions[data[i].label].push(i);
        }
        Ok(partitions)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn labelled(counts: &[usize]) -> Vec<Example> {
        let mut data = Vec::new();
        for (label, &n) in counts.iter().enumerate() {
            for i in 0..n {
                data.push(Example::from_source(format!("{label}-{i}"), label));
            }
        }
        data
    }

    fn bundle(counts: &[usize]) -> DatasetBundle {
        DatasetBundle::new().with_split("train", labelled(counts))
    }

    fn labels(examples: &[Example]) -> Vec<usize> {
        examples.iter().map(|e| e.label).collect()
    }

    #[test]
    fn test_ten_and_three() {
        let out = FewShotSampler::new(2, 10, 42).sample(bundle(&[10, 3])).unwrap();
        assert_eq!(labels(&out["train"]), vec![0, 0, 0, 0, 0, 1]);
        assert_eq!(labels(&out["validation"]), vec![0, 0, 0, 0, 0, 1]);

        let train: HashSet<_> = out["train"].iter().map(|e| e.source().unwrap()).collect();
        assert!(out["validation"]
            .iter()
            .all(|e| !train.contains(e.source().unwrap())));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = FewShotSampler::new(3, 4, 7).sample(bundle(&[20, 20, 20])).unwrap();
        let b = FewShotSampler::new(3, 4, 7).sample(bundle(&[20, 20, 20])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_selection() {
        let a = FewShotSampler::new(1, 5, 1).sample(bundle(&[200])).unwrap();
        let b = FewShotSampler::new(1, 5, 2).sample(bundle(&[200])).unwrap();
        assert_ne!(a["train"], b["train"]);
    }

    #[test]
    fn test_sorted_input_is_not_taken_in_order() {
        let data = labelled(&[100, 100]);
        let out = FewShotSampler::new(2, 8, 3).sample(bundle(&[100, 100])).unwrap();
        assert_ne!(out["train"][..8], data[..8]);
    }

    #[test]
    fn test_size_bound_and_balance() {
        let out = FewShotSampler::new(3, 4, 0).sample(bundle(&[50, 9, 3])).unwrap();
        let train = out.label_counts("train").unwrap();
        let dev = out.label_counts("validation").unwrap();
        assert_eq!(train, dev);
        assert_eq!(train.get(&0), Some(&4));
        assert_eq!(train.get(&1), Some(&4));
        assert_eq!(train.get(&2), Some(&1));
        assert!(out["train"].len() <= 3 * 4);
    }

    #[test]
    fn test_full_when_every_label_has_enough() {
        let out = FewShotSampler::new(4, 5, 9).sample(bundle(&[10, 11, 30, 12])).unwrap();
        assert_eq!(out["train"].len(), 20);
        assert_eq!(out["validation"].len(), 20);
    }

    #[test]
    fn test_degenerate_labels_contribute_nothing() {
        let out = FewShotSampler::new(3, 5, 0).sample(bundle(&[6, 1, 0])).unwrap();
        assert_eq!(labels(&out["train"]), vec![0, 0, 0]);
        assert_eq!(labels(&out["validation"]), vec![0, 0, 0]);
    }

    #[test]
    fn test_strict_mode_rejects_degenerate_label() {
        let err = FewShotSampler::new(2, 5, 0)
            .require_every_label(true)
            .sample(bundle(&[6, 1]))
            .unwrap_err();
        assert_eq!(
            err,
            SampleError::InsufficientData {
                label: 1,
                available: 1
            }
        );
    }

    #[test]
    fn test_zero_cap_yields_empty_splits() {
        let out = FewShotSampler::new(2, 0, 0).sample(bundle(&[4, 4])).unwrap();
        assert!(out["train"].is_empty());
        assert!(out["validation"].is_empty());
    }

    #[test]
    fn test_other_splits_untouched() {
        let test = labelled(&[2, 2]);
        let input = bundle(&[4, 4]).with_split("test", test.clone());
        let out = FewShotSampler::new(2, 1, 0).sample(input).unwrap();
        assert_eq!(out["test"], test[..]);
    }

    #[test]
    fn test_missing_train_split() {
        let err = FewShotSampler::new(2, 1, 0)
            .sample(DatasetBundle::new().with_split("test", labelled(&[2])))
            .unwrap_err();
        assert_eq!(err, SampleError::SplitNotFound(SplitNotFoundError("train".into())));
    }

    #[test]
    fn test_label_out_of_range() {
        let err = FewShotSampler::new(2, 1, 0).sample(bundle(&[1, 1, 1])).unwrap_err();
        assert_eq!(err, SampleError::LabelOrdinal(LabelOrdinalError { found: 2, max: 2 }));
    }

    #[test]
    fn test_no_labels() {
        let err = FewShotSampler::new(0, 1, 0).sample(bundle(&[])).unwrap_err();
        assert_eq!(err, SampleError::NoLabels);
    }
}
