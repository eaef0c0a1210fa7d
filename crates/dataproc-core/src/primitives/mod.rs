//! Numeric primitives used by the analysis layer
//!
//! Mean, variance, dot product, vector norms and the centered moments that
//! Pearson correlation is built from. Algorithms take a `ComputePrimitives`
//! backend instead of reimplementing linear algebra inline.
//!
//! # Usage
//!
//! ```rust
//! use dataproc_core::primitives::{scalar_backend, ComputePrimitives, NormType};
//!
//! let backend = scalar_backend();
//! assert_eq!(backend.norm(&[3.0, 4.0], NormType::L2), 5.0);
//! ```

mod scalar;
pub mod traits;

pub use scalar::ScalarBackend;
pub use traits::{CenteredMoments, ComputePrimitives, NormType};

/// Create a scalar backend (always available)
pub fn scalar_backend() -> ScalarBackend {
    ScalarBackend::new()
}
