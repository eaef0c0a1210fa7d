//! Per-block transforms applied by stream workers

use dataproc_core::Result;
use std::fmt;
use std::sync::Arc;

/// A transformation applied to each block of a partition
///
/// Workers call `apply` once per `buffer_size` block, in order, appending
/// the transformed bytes to `out`. Implementations are shared by every
/// worker of a job, so they must be `Send + Sync`.
pub trait ChunkTransform: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Append the transformed form of `block` to `out`
    fn apply(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()>;
}

/// Copies each block unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ChunkTransform for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(block);
        Ok(())
    }
}

/// Substitutes every byte through a 256-entry table
#[derive(Clone)]
pub struct ByteMap {
    name: String,
    table: Arc<[u8; 256]>,
}

impl ByteMap {
    /// Table built from a byte function
    pub fn from_fn(name: impl Into<String>, f: impl Fn(u8) -> u8) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = f(i as u8);
        }
        Self {
            name: name.into(),
            table: Arc::new(table),
        }
    }

    /// XOR every byte with `mask`; applying it twice restores the input
    pub fn xor(mask: u8) -> Self {
        Self::from_fn(format!("xor-{mask:#04x}"), move |b| b ^ mask)
    }

    /// Transformed value of a single byte
    pub fn map_byte(&self, byte: u8) -> u8 {
        self.table[byte as usize]
    }
}

impl fmt::Debug for ByteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteMap").field("name", &self.name).finish()
    }
}

impl ChunkTransform for ByteMap {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, block: &[u8], out: &mut Vec<u8>) -> Result<()> {
        out.extend(block.iter().map(|&b| self.table[b as usize]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_copies() {
        let mut out = vec![9];
        Identity.apply(&[1, 2, 3], &mut out).unwrap();
        assert_eq!(out, vec![9, 1, 2, 3]);
    }

    #[test]
    fn test_xor_is_involution() {
        let map = ByteMap::xor(0x5a);
        let input: Vec<u8> = (0..=255).collect();
        let mut once = Vec::new();
        map.apply(&input, &mut once).unwrap();
        assert_ne!(once, input);
        let mut twice = Vec::new();
        map.apply(&once, &mut twice).unwrap();
        assert_eq!(twice, input);
        assert_eq!(map.name(), "xor-0x5a");
    }

    #[test]
    fn test_from_fn_table() {
        let upper = ByteMap::from_fn("upper", |b| b.to_ascii_uppercase());
        let mut out = Vec::new();
        upper.apply(b"Hello, world", &mut out).unwrap();
        assert_eq!(out, b"HELLO, WORLD");
        assert_eq!(upper.map_byte(b'q'), b'Q');
    }
}
