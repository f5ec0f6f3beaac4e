//! Portable serialisation of IEEE-754 doubles (§6, §13)
//!
//! Each double is split the way `frexp`/`ldexp` split it — a mantissa `m`
//! in `[0.5, 1)` times `2^exponent` — then stored as a big-endian 2-byte
//! exponent and an 8-byte mantissa scaled by `2^53` so it round-trips
//! through an integer without losing precision. NaN and infinity are
//! rejected at the boundary per the error-handling policy (§7).

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{LrptError, LrptResult};

const MANTISSA_SCALE: f64 = 9_007_199_254_740_992.0; // 2^53

fn frexp(x: f64) -> (f64, i16) {
    if x == 0.0 {
        return (0.0, 0);
    }
    let bits = x.to_bits();
    let sign = bits & (1 << 63);
    let exponent = ((bits >> 52) & 0x7ff) as i64;
    let mantissa_bits = bits & 0x000f_ffff_ffff_ffff;

    if exponent == 0 {
        // Subnormal: normalise by hand, values this small never occur on
        // the receive path but the helper should still be total.
        let mut m = x.abs();
        let mut e = 0i64;
        while m < 0.5 {
            m *= 2.0;
            e -= 1;
        }
        let signed = if x.is_sign_negative() { -m } else { m };
        return (signed, e as i16);
    }

    let biased = (1022u64) << 52;
    let m = f64::from_bits(sign | biased | mantissa_bits);
    (m, (exponent - 1022) as i16)
}

fn ldexp(m: f64, exponent: i16) -> f64 {
    m * 2.0_f64.powi(exponent as i32)
}

/// Write one double in the portable wire format.
pub fn write_double<W: Write>(w: &mut W, value: f64) -> LrptResult<()> {
    if !value.is_finite() {
        return Err(LrptError::DataCorrupt("cannot serialise NaN or infinite value".into()));
    }
    let (m, exponent) = frexp(value);
    let mantissa = (m * MANTISSA_SCALE).round() as i64;
    w.write_i16::<BigEndian>(exponent)?;
    w.write_i64::<BigEndian>(mantissa)?;
    Ok(())
}

/// Read one double in the portable wire format.
pub fn read_double<R: Read>(r: &mut R) -> LrptResult<f64> {
    let exponent = r.read_i16::<BigEndian>()?;
    let mantissa = r.read_i64::<BigEndian>()?;
    let value = ldexp(mantissa as f64 / MANTISSA_SCALE, exponent);
    if !value.is_finite() {
        return Err(LrptError::DataCorrupt("decoded double is NaN or infinite".into()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(x: f64) -> f64 {
        let mut buf = Vec::new();
        write_double(&mut buf, x).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        read_double(&mut cursor).unwrap()
    }

    #[test]
    fn test_roundtrip_common_values() {
        for &x in &[0.0, 1.0, -1.0, 0.5, 180.0, -3.14159265358979, 1e10, -1e-10] {
            let back = roundtrip(x);
            assert!((back - x).abs() <= x.abs() * 1e-15 + 1e-300, "x={x} back={back}");
        }
    }

    #[test]
    fn test_rejects_nan_on_write() {
        let mut buf = Vec::new();
        assert!(write_double(&mut buf, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_infinity_on_write() {
        let mut buf = Vec::new();
        assert!(write_double(&mut buf, f64::INFINITY).is_err());
    }
}
