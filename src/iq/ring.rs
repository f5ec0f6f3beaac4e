//! Single-producer / single-consumer lock-free I/Q ring buffer (§4.6, §5)
//!
//! Fixed capacity `C`, backed by `C+1` slots so that `head == tail`
//! unambiguously means empty and `(head+1) mod (C+1) == tail` means full.
//! Exactly one thread may call [`IqRing::push`]; exactly one (possibly
//! different) thread may call [`IqRing::pop`]. `head`/`tail` are plain
//! `AtomicUsize` with release-on-publish, acquire-on-observe ordering — the
//! only cross-thread contract in this crate (§5).

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::complex::Complex;
use crate::error::{LrptError, LrptResult};
use crate::iq::sequence::IqSequence;

pub struct IqRing {
    /// Usable capacity `C`; the backing store holds `C+1` slots.
    capacity: usize,
    slots: Box<[UnsafeCell<Complex>]>,
    /// Advanced only by the producer.
    head: AtomicUsize,
    /// Advanced only by the consumer.
    tail: AtomicUsize,
}

// SAFETY: `push` only ever mutates slots in `[tail, head)`'s complement
// (the free region) and only the producer calls it; `pop` only mutates
// slots it alone reads and only the consumer calls it. The two regions
// never overlap because `head`/`tail` are published with Release and
// observed with Acquire before any slot access past them.
unsafe impl Sync for IqRing {}
unsafe impl Send for IqRing {}

impl IqRing {
    /// Allocate a ring with room for `capacity` samples. `capacity` must be
    /// at least 1.
    pub fn new(capacity: usize) -> LrptResult<Self> {
        if capacity == 0 {
            return Err(LrptError::InvalidParam("ring capacity must be >= 1".into()));
        }
        let slots = (0..capacity + 1)
            .map(|_| UnsafeCell::new(Complex::zero()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            capacity,
            slots,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        })
    }

    #[inline]
    fn slot_count(&self) -> usize {
        self.capacity + 1
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently stored.
    pub fn used(&self) -> usize {
        // Snapshot tail before head so a concurrently-advancing producer
        // cannot make this answer understate occupancy (§4.6).
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (head + self.slot_count() - tail) % self.slot_count()
    }

    /// Free capacity for new samples.
    pub fn avail(&self) -> usize {
        self.capacity - self.used()
    }

    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    pub fn is_full(&self) -> bool {
        self.used() == self.capacity
    }

    /// Producer-side: write exactly `n` samples from `source[offset..offset+n]`.
    /// Fails with `NoSpace` rather than partially writing if there is not
    /// enough room.
    pub fn push(&self, source: &[Complex], offset: usize, n: usize) -> LrptResult<()> {
        if offset + n > source.len() {
            return Err(LrptError::InvalidParam(
                "push source slice too short for offset + n".into(),
            ));
        }
        let avail = self.avail();
        if avail < n {
            log::debug!("IqRing::push: no space for {n} samples ({avail} available)");
            return Err(LrptError::NoSpace { requested: n, available: avail });
        }
        if n == 0 {
            return Ok(());
        }

        let head = self.head.load(Ordering::Relaxed);
        let slot_count = self.slot_count();
        let first_len = n.min(slot_count - head);
        for k in 0..first_len {
            // SAFETY: single producer, slot [head+k] is in the free region.
            unsafe { *self.slots[head + k].get() = source[offset + k]; }
        }
        let remaining = n - first_len;
        for k in 0..remaining {
            unsafe { *self.slots[k].get() = source[offset + first_len + k]; }
        }

        let new_head = (head + n) % slot_count;
        self.head.store(new_head, Ordering::Release);
        Ok(())
    }

    /// Consumer-side: pop up to `n` samples into `dest` (which is resized to
    /// the number actually read). Returns `NoData` if the ring is empty and
    /// `n > 0`; otherwise returns the number of samples popped, which may be
    /// fewer than `n` if the ring held less.
    pub fn pop(&self, dest: &mut IqSequence, n: usize) -> LrptResult<usize> {
        let used = self.used();
        if used == 0 {
            if n == 0 {
                dest.resize(0);
                return Ok(0);
            }
            return Err(LrptError::NoData);
        }
        let to_read = used.min(n);
        dest.resize(to_read);

        let tail = self.tail.load(Ordering::Relaxed);
        let slot_count = self.slot_count();
        let first_len = to_read.min(slot_count - tail);
        for k in 0..first_len {
            // SAFETY: single consumer, slot [tail+k] is in the occupied region.
            dest.as_mut_slice()[k] = unsafe { *self.slots[tail + k].get() };
        }
        let remaining = to_read - first_len;
        for k in 0..remaining {
            dest.as_mut_slice()[first_len + k] = unsafe { *self.slots[k].get() };
        }

        let new_tail = (tail + to_read) % slot_count;
        self.tail.store(new_tail, Ordering::Release);
        Ok(to_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize, start: f64) -> Vec<Complex> {
        (0..n).map(|i| Complex::new(start + i as f64, -(start + i as f64))).collect()
    }

    #[test]
    fn test_capacity_zero_rejected() {
        assert!(IqRing::new(0).is_err());
    }

    #[test]
    fn test_used_avail_invariant() {
        let ring = IqRing::new(8).unwrap();
        let data = samples(5, 0.0);
        ring.push(&data, 0, 5).unwrap();
        assert_eq!(ring.used() + ring.avail(), ring.capacity());
        assert_eq!(ring.used(), 5);
        assert_eq!(ring.avail(), 3);
    }

    #[test]
    fn test_push_pop_roundtrip() {
        let ring = IqRing::new(8).unwrap();
        let data = samples(5, 0.0);
        ring.push(&data, 0, 5).unwrap();

        let mut out = IqSequence::new(0);
        let n = ring.pop(&mut out, 5).unwrap();
        assert_eq!(n, 5);
        assert_eq!(out.as_slice(), data.as_slice());
        assert!(ring.is_empty());
    }

    #[test]
    fn test_push_overflow_fails_with_no_space() {
        let ring = IqRing::new(4).unwrap();
        let data = samples(5, 0.0);
        let err = ring.push(&data, 0, 5).unwrap_err();
        assert!(matches!(err, LrptError::NoSpace { requested: 5, available: 4 }));
    }

    #[test]
    fn test_pop_empty_yields_no_data() {
        let ring = IqRing::new(4).unwrap();
        let mut out = IqSequence::new(0);
        let err = ring.pop(&mut out, 1).unwrap_err();
        assert!(matches!(err, LrptError::NoData));
    }

    #[test]
    fn test_pop_fewer_than_requested_when_ring_short() {
        let ring = IqRing::new(8).unwrap();
        let data = samples(3, 0.0);
        ring.push(&data, 0, 3).unwrap();

        let mut out = IqSequence::new(0);
        let n = ring.pop(&mut out, 10).unwrap();
        assert_eq!(n, 3);
    }

    /// Capacity 8: push 5, pop 3, push 5 -> used = 7, popped bytes equal the
    /// concatenation of the two pushes minus the first 3 (scenario 2, §8).
    #[test]
    fn test_wrap_around_scenario() {
        let ring = IqRing::new(8).unwrap();
        let first = samples(5, 0.0);
        ring.push(&first, 0, 5).unwrap();

        let mut popped = IqSequence::new(0);
        ring.pop(&mut popped, 3).unwrap();

        let second = samples(5, 100.0);
        ring.push(&second, 0, 5).unwrap();

        assert_eq!(ring.used(), 7);

        let mut expected: Vec<Complex> = first.clone();
        expected.extend_from_slice(&second);
        let expected = &expected[3..];

        let mut rest = IqSequence::new(0);
        let n = ring.pop(&mut rest, 7).unwrap();
        assert_eq!(n, 7);
        assert_eq!(rest.as_slice(), expected);
    }

    #[test]
    fn test_full_ring_rejects_single_extra_push() {
        let ring = IqRing::new(4).unwrap();
        let data = samples(4, 0.0);
        ring.push(&data, 0, 4).unwrap();
        assert!(ring.is_full());
        let extra = samples(1, 99.0);
        assert!(ring.push(&extra, 0, 1).is_err());
    }
}
