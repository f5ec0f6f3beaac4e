//! Bit-exact on-disk readers/writers and the portable double format (§6, §13).
//! These are straightforward wrappers once the DSP core is correct; the
//! only nontrivial logic is `dfloat`'s frexp/ldexp-based encoding.

mod dfloat;
mod iqfile;
mod qpskfile;

pub use iqfile::{read_iq_file, write_iq_file, IqFileHeader};
pub use qpskfile::{read_qpsk_file, write_qpsk_file, QpskFileHeader};

pub use dfloat::{read_double, write_double};
