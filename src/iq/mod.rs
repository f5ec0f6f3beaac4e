//! I/Q data containers: the owned sequence type and the SPSC ring buffer
//! that let a producer (SDR front end) and consumer (demod) exchange
//! complex samples without copies across the pipeline boundary (§3, §4.6).

mod ring;
mod sequence;

pub use ring::IqRing;
pub use sequence::IqSequence;
