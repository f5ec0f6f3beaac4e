//! Owned, resizable sequence of complex I/Q samples
//!
//! The C original represents this as a `(pointer, length)` pair with the
//! invariant `buffer != null <=> length > 0`. In Rust that invariant is
//! simply "a `Vec` of length zero owns no heap allocation" — `IqSequence` is
//! a thin, explicitly-named wrapper around `Vec<Complex>` so the pipeline's
//! vocabulary (`resize`, `append`, `from_complex`) stays domain-specific
//! instead of leaking `Vec` method names into call sites.

use crate::complex::Complex;
use crate::error::{LrptError, LrptResult};

/// An ordered, owned sequence of complex baseband samples.
#[derive(Debug, Clone, Default)]
pub struct IqSequence {
    samples: Vec<Complex>,
}

impl IqSequence {
    /// Allocate a sequence of `len` samples, zero-filled. `len == 0` is
    /// allowed and yields an empty sequence.
    pub fn new(len: usize) -> Self {
        Self { samples: vec![Complex::zero(); len] }
    }

    /// Build a sequence by copying an existing slice of complex samples.
    pub fn from_complex(samples: &[Complex]) -> Self {
        Self { samples: samples.to_vec() }
    }

    /// Build a sequence from interleaved (I, Q) doubles; `doubles.len()`
    /// must be even.
    pub fn from_doubles(doubles: &[f64]) -> LrptResult<Self> {
        if doubles.len() % 2 != 0 {
            return Err(LrptError::InvalidParam(
                "from_doubles requires an even number of values".into(),
            ));
        }
        let samples = doubles
            .chunks_exact(2)
            .map(|pair| Complex::new(pair[0], pair[1]))
            .collect();
        Ok(Self { samples })
    }

    /// Build a sequence from separate I and Q slices of equal length.
    pub fn from_iq(i: &[f64], q: &[f64]) -> LrptResult<Self> {
        if i.len() != q.len() {
            return Err(LrptError::InvalidParam(
                "from_iq requires equal-length I and Q slices".into(),
            ));
        }
        let samples = i.iter().zip(q).map(|(&i, &q)| Complex::new(i, q)).collect();
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex] {
        &mut self.samples
    }

    /// Grow or shrink to `new_len`. Growth zero-fills the new tail; shrinking
    /// truncates and discards the dropped tail.
    pub fn resize(&mut self, new_len: usize) {
        self.samples.resize(new_len, Complex::zero());
    }

    /// Append another sequence's samples to the end of this one.
    pub fn append(&mut self, other: &IqSequence) {
        self.samples.extend_from_slice(&other.samples);
    }

    /// Append samples from a raw slice.
    pub fn append_slice(&mut self, other: &[Complex]) {
        self.samples.extend_from_slice(other);
    }

    /// Replace every sample with its sanitized (NaN/Inf-free) form.
    pub fn sanitize(&mut self) {
        for s in &mut self.samples {
            *s = s.sanitize();
        }
    }
}

impl std::ops::Index<usize> for IqSequence {
    type Output = Complex;
    fn index(&self, idx: usize) -> &Complex {
        &self.samples[idx]
    }
}

impl std::ops::IndexMut<usize> for IqSequence {
    fn index_mut(&mut self, idx: usize) -> &mut Complex {
        &mut self.samples[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zero_len_is_empty() {
        let seq = IqSequence::new(0);
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn test_resize_grows_zero_filled_tail() {
        let mut seq = IqSequence::from_complex(&[Complex::new(1.0, 2.0), Complex::new(3.0, 4.0)]);
        seq.resize(4);
        assert_eq!(seq.len(), 4);
        assert_eq!(seq[0], Complex::new(1.0, 2.0));
        assert_eq!(seq[1], Complex::new(3.0, 4.0));
        assert_eq!(seq[2], Complex::zero());
        assert_eq!(seq[3], Complex::zero());
    }

    #[test]
    fn test_resize_shrink_then_grow_preserves_prefix() {
        let mut seq = IqSequence::new(2);
        seq[0] = Complex::new(5.0, 6.0);
        seq[1] = Complex::new(7.0, 8.0);
        seq.resize(1);
        seq.resize(3);
        assert_eq!(seq[0], Complex::new(5.0, 6.0));
        assert_eq!(seq[1], Complex::zero());
        assert_eq!(seq[2], Complex::zero());
    }

    #[test]
    fn test_append() {
        let mut a = IqSequence::from_complex(&[Complex::new(1.0, 1.0)]);
        let b = IqSequence::from_complex(&[Complex::new(2.0, 2.0)]);
        a.append(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[1], Complex::new(2.0, 2.0));
    }

    #[test]
    fn test_from_iq_mismatched_lengths_errors() {
        let err = IqSequence::from_iq(&[1.0, 2.0], &[1.0]);
        assert!(err.is_err());
    }

    #[test]
    fn test_sanitize_clears_non_finite() {
        let mut seq = IqSequence::from_complex(&[Complex::new(f64::NAN, 1.0)]);
        seq.sanitize();
        assert_eq!(seq[0], Complex::new(0.0, 1.0));
    }
}
