use crate::error::{PushfitError, Result};
use rand::Rng;
use std::fmt;

/// Fixed-length sequence of positions into a test-case set. Values may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIndices {
    indices: Vec<usize>,
}

impl SampleIndices {
    pub fn zeroed(sample_size: usize) -> Self {
        Self {
            indices: vec![0; sample_size],
        }
    }

    /// Copies the first `sample_size` entries of `indices`. A shorter slice
    /// is rejected; extra entries are ignored.
    pub fn from_slice(indices: &[usize], sample_size: usize) -> Result<Self> {
        if indices.len() < sample_size {
            return Err(PushfitError::SampleLength {
                expected: sample_size,
                actual: indices.len(),
            });
        }
        Ok(Self {
            indices: indices[..sample_size].to_vec(),
        })
    }

    /// Uniform indices in `0..case_count`. With no cases the sample stays
    /// zeroed and fails validation later.
    pub fn random<R: Rng>(sample_size: usize, case_count: usize, rng: &mut R) -> Self {
        if case_count == 0 {
            return Self::zeroed(sample_size);
        }
        Self {
            indices: (0..sample_size).map(|_| rng.gen_range(0..case_count)).collect(),
        }
    }

    /// Fails on the first index that does not address one of `case_count` cases.
    pub fn validate(&self, case_count: usize) -> Result<()> {
        match self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &index)| index >= case_count)
        {
            Some((position, &index)) => Err(PushfitError::IndexOutOfRange {
                index,
                position,
                len: case_count,
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.indices.iter()
    }
}

impl fmt::Display for SampleIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}
