//! Bit-exact reader/writer for the `.lrptiq` I/Q capture format (§6, §13)
//!
//! `lrptiq` magic, one-byte version, big-endian metadata (sample rate,
//! device-name length + name, sample count), then the samples themselves
//! as portable doubles (§13 `dfloat`). A straightforward wrapper: all the
//! real work is `dfloat`'s.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{LrptError, LrptResult};
use crate::io::dfloat;
use crate::iq::IqSequence;

const MAGIC: &[u8; 6] = b"lrptiq";
pub const VERSION: u8 = 1;

pub struct IqFileHeader {
    pub sample_rate_hz: u32,
    pub device_name: String,
}

pub fn write_iq_file<W: Write>(
    w: &mut W,
    header: &IqFileHeader,
    samples: &IqSequence,
) -> LrptResult<()> {
    if header.device_name.len() > u8::MAX as usize {
        return Err(LrptError::InvalidParam("device_name too long for a u8 length prefix".into()));
    }
    w.write_all(MAGIC)?;
    w.write_u8(VERSION)?;
    w.write_u32::<BigEndian>(header.sample_rate_hz)?;
    w.write_u8(header.device_name.len() as u8)?;
    w.write_all(header.device_name.as_bytes())?;
    w.write_u64::<BigEndian>(samples.len() as u64)?;
    for sample in samples.as_slice() {
        dfloat::write_double(w, sample.i)?;
        dfloat::write_double(w, sample.q)?;
    }
    Ok(())
}

pub fn read_iq_file<R: Read>(r: &mut R) -> LrptResult<(IqFileHeader, IqSequence)> {
    let mut magic = [0u8; 6];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(LrptError::DataCorrupt("bad lrptiq magic".into()));
    }
    let version = r.read_u8()?;
    if version != VERSION {
        return Err(LrptError::Unsupported(version));
    }
    let sample_rate_hz = r.read_u32::<BigEndian>()?;
    let name_len = r.read_u8()? as usize;
    let mut name_bytes = vec![0u8; name_len];
    r.read_exact(&mut name_bytes)?;
    let device_name = String::from_utf8(name_bytes)
        .map_err(|_| LrptError::DataCorrupt("device_name is not valid UTF-8".into()))?;
    let sample_count = r.read_u64::<BigEndian>()? as usize;

    let mut samples = IqSequence::new(sample_count);
    for i in 0..sample_count {
        let re = dfloat::read_double(r)?;
        let im = dfloat::read_double(r)?;
        samples.as_mut_slice()[i] = crate::complex::Complex::new(re, im);
    }

    Ok((IqFileHeader { sample_rate_hz, device_name }, samples))
}
