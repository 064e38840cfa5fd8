//! Batch assembly for training loops.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Dataset, DatasetError, Label};

/// Samples and their labels, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<S> {
    pub samples: Vec<S>,
    pub labels: Vec<Label>,
}

impl<S> Batch<S> {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Split `(sample, label)` pairs into a [`Batch`], preserving order.
pub fn collate<S>(pairs: impl IntoIterator<Item = (S, Label)>) -> Batch<S> {
    let (samples, labels) = pairs.into_iter().unzip();
    Batch { samples, labels }
}

/// Iterates a dataset in fixed-size batches.
///
/// Visits positions in order unless [`DataLoader::shuffled`] is used. The
/// last batch may be short unless `drop_last` is set.
#[derive(Debug)]
pub struct DataLoader<'a, D> {
    dataset: &'a D,
    batch_size: usize,
    order: Vec<usize>,
    cursor: usize,
    drop_last: bool,
}

impl<'a, D: Dataset> DataLoader<'a, D> {
    pub fn new(dataset: &'a D, batch_size: usize) -> Result<Self, DatasetError> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        Ok(Self {
            dataset,
            batch_size,
            order: (0..dataset.len()).collect(),
            cursor: 0,
            drop_last: false,
        })
    }

    /// Permute the visiting order with a seeded generator.
    pub fn shuffled(mut self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        self.order.shuffle(&mut rng);
        self
    }

    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Number of batches a full pass yields.
    pub fn num_batches(&self) -> usize {
        let len = self.order.len();
        if self.drop_last {
            len / self.batch_size
        } else {
            len.div_ceil(self.batch_size)
        }
    }
}

impl<D: Dataset> Iterator for DataLoader<'_, D> {
    type Item = Result<Batch<D::Sample>, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len() - self.cursor;
        if remaining == 0 || (self.drop_last && remaining < self.batch_size) {
            return None;
        }
        let end = self.cursor + remaining.min(self.batch_size);
        let positions = &self.order[self.cursor..end];
        self.cursor = end;
        let pairs = positions
            .iter()
            .map(|&index| self.dataset.get(index))
            .collect::<Result<Vec<_>, _>>();
        Some(pairs.map(collate))
    }
}
