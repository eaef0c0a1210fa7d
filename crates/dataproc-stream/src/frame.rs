//! Encoding of processor input and output
//!
//! A frame is the payload compressed with the configured codec, followed by
//! a CRC-32 trailer when checksums are enabled. Processor output is a frame
//! under the same configuration as its input.

use crate::checksum::{append_checksum, verify_and_strip};
use crate::codec::Codec;
use crate::config::StreamConfig;
use dataproc_core::{Error, Result};

/// Build a frame that `config` accepts as processor input
pub fn seal(config: &StreamConfig, payload: &[u8]) -> Result<Vec<u8>> {
    let codec = crate::codec::codec_for(config.compression);
    encode(codec.as_ref(), config, payload)
}

/// Decode a frame produced under `config`
pub fn open(config: &StreamConfig, frame: &[u8]) -> Result<Vec<u8>> {
    let codec = crate::codec::codec_for(config.compression);
    decode(codec.as_ref(), config, frame)
}

pub(crate) fn encode(codec: &dyn Codec, config: &StreamConfig, payload: &[u8]) -> Result<Vec<u8>> {
    let mut out = codec
        .compress(payload)
        .map_err(|e| Error::runtime("compression", e))?;
    if config.enable_checksum {
        append_checksum(&mut out);
    }
    if out.len() > config.max_memory {
        return Err(Error::RuntimeFailure(format!(
            "output of {} bytes exceeds max_memory ({})",
            out.len(),
            config.max_memory
        )));
    }
    Ok(out)
}

pub(crate) fn decode(codec: &dyn Codec, config: &StreamConfig, frame: &[u8]) -> Result<Vec<u8>> {
    let body = if config.enable_checksum {
        verify_and_strip(frame)?
    } else {
        frame
    };
    codec
        .decompress(body, config.max_memory)
        .map_err(|e| Error::runtime("decompression", e))
}
