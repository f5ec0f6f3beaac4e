//! Soft/hard QPSK symbol containers and the dead-zone clamp used when the
//! demodulator decides a symbol (§3, §4.5, §8).

mod sequence;

pub use sequence::{clamp_i8, QpskSequence, SoftSymbol};
