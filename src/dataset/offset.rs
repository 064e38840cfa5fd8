use super::{Dataset, DatasetError, Label};

/// Shifts every label of the wrapped dataset by a fixed amount.
///
/// Lets independently indexed datasets share one label space when they are
/// concatenated. The offset is not validated.
#[derive(Debug, Clone)]
pub struct OffsetDataset<D> {
    inner: D,
    offset: Label,
}

impl<D: Dataset> OffsetDataset<D> {
    pub fn new(inner: D, offset: Label) -> Self {
        Self { inner, offset }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn offset(&self) -> Label {
        self.offset
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Dataset> Dataset for OffsetDataset<D> {
    type Sample = D::Sample;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Result<(D::Sample, Label), DatasetError> {
        let (sample, label) = self.inner.get(index)?;
        Ok((sample, label + self.offset))
    }
}
