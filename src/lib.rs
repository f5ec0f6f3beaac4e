//! liblrpt — receive-side baseband pipeline for LRPT weather-satellite
//! downlinks.
//!
//! This crate covers the signal-acquisition and demodulation core: a
//! Chebyshev IIR pre-filter, an RRC interpolating matched filter, an AGC
//! with DC-bias tracking, a Costas PLL with hysteretic lock detection for
//! QPSK and offset QPSK, and the Gardner-timed demodulator orchestrator
//! that turns a stream of complex baseband samples into soft QPSK symbols.
//! The CCSDS frame decoder, image assembly, and file-format boundary live
//! outside this crate's core and are exposed here only as the thin readers/
//! writers in [`io`].

pub mod complex;
pub mod dsp;
pub mod error;
pub mod io;
pub mod iq;
pub mod qpsk;

pub use complex::Complex;
pub use dsp::{Agc, ChebyshevFilter, CostasPll, Demodulator, DemodulatorConfig, FilterKind, PllMode};
pub use error::{LrptError, LrptResult};
pub use iq::{IqRing, IqSequence};
pub use qpsk::{clamp_i8, QpskSequence, SoftSymbol};
