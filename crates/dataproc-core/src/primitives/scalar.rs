//! Scalar backend implementation
//!
//! Plain iterator implementations with no SIMD.

use crate::primitives::ComputePrimitives;

/// Scalar backend
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ComputePrimitives for ScalarBackend {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }

    // All operations use the default implementations from the trait
}
