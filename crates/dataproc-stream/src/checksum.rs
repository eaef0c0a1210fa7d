//! CRC-32 integrity trailers
//!
//! A checksummed payload carries the IEEE CRC-32 of its body as a 4-byte
//! little-endian trailer.

use dataproc_core::{Error, Result};

/// Length of the trailer in bytes
pub const CHECKSUM_LEN: usize = 4;

/// IEEE CRC-32 of `data`
pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Append the trailer for the current contents of `buf`
pub fn append_checksum(buf: &mut Vec<u8>) {
    let crc = checksum(buf);
    buf.extend_from_slice(&crc.to_le_bytes());
}

/// Verify the trailer and return the body without it
pub fn verify_and_strip(data: &[u8]) -> Result<&[u8]> {
    if data.len() < CHECKSUM_LEN {
        return Err(Error::RuntimeFailure("checksum missing".to_string()));
    }
    let (body, trailer) = data.split_at(data.len() - CHECKSUM_LEN);
    let mut stored = [0u8; CHECKSUM_LEN];
    stored.copy_from_slice(trailer);

    if u32::from_le_bytes(stored) != checksum(body) {
        return Err(Error::checksum_mismatch());
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        // Standard CRC-32 check value
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn test_append_then_verify() {
        let mut buf = b"payload".to_vec();
        append_checksum(&mut buf);
        assert_eq!(buf.len(), 7 + CHECKSUM_LEN);
        assert_eq!(verify_and_strip(&buf).unwrap(), b"payload");
    }

    #[test]
    fn test_empty_body_has_valid_trailer() {
        let mut buf = Vec::new();
        append_checksum(&mut buf);
        assert_eq!(verify_and_strip(&buf).unwrap(), b"");
    }

    #[test]
    fn test_short_input_is_missing() {
        let err = verify_and_strip(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, Error::RuntimeFailure("checksum missing".to_string()));
    }

    #[test]
    fn test_corrupted_trailer() {
        let mut buf = b"payload".to_vec();
        append_checksum(&mut buf);
        let last = buf.len() - 1;
        buf[last] ^= 0x80;
        assert_eq!(verify_and_strip(&buf).unwrap_err(), Error::checksum_mismatch());
    }

    proptest! {
        #[test]
        fn prop_single_bit_flip_detected(
            body in proptest::collection::vec(any::<u8>(), 1..512),
            bit in 0usize..4096,
        ) {
            let mut buf = body.clone();
            append_checksum(&mut buf);
            let bit = bit % (buf.len() * 8);
            buf[bit / 8] ^= 1 << (bit % 8);
            prop_assert_eq!(verify_and_strip(&buf), Err(Error::checksum_mismatch()));
        }
    }
}
