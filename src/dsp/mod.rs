//! The signal-acquisition and demodulation core (§4): Chebyshev IIR
//! pre-filter, RRC interpolating matched filter, AGC, Costas PLL, and the
//! Gardner-timed demodulator orchestrator that ties them together.

mod agc;
mod cheby;
mod costas;
mod demod;
mod rrc;

pub use agc::Agc;
pub use cheby::{ChebyshevFilter, FilterKind};
pub use costas::{CostasPll, PllMode};
pub use demod::{Demodulator, DemodulatorConfig};
pub use rrc::RrcFilter;
