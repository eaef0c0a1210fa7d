//! Numeric pattern analysis
//!
//! This crate looks for structure in time series and tables of variables.
//!
//! # Detectors
//!
//! - **Periodic**: autocorrelation peak after the first local minimum
//! - **Trending**: least-squares fit, scored by R²
//! - **Anomaly**: fraction of points with a large robust z-score
//! - **Cluster**: gap-threshold grouping of sorted values
//!
//! [`PatternAnalyzer::analyze_time_series`] runs the requested detectors and
//! returns the best one above [`MIN_CONFIDENCE`].
//!
//! ## Usage
//!
//! ```rust
//! use dataproc_analysis::{PatternAnalyzer, PatternType};
//!
//! let analyzer = PatternAnalyzer::new();
//! let result = analyzer
//!     .analyze_time_series(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0, 1, 2, 3, 4], &[PatternType::Trending])
//!     .unwrap();
//!
//! assert!(result.pattern_found());
//! assert!(result.confidence() > 0.95);
//! ```

pub mod analyzer;
pub mod anomaly;
pub mod cluster;
pub mod correlation;
pub mod periodic;
pub mod traits;
pub mod trending;
pub mod types;

pub use analyzer::{AnalyzerConfig, PatternAnalyzer, MIN_CONFIDENCE};
pub use anomaly::{detect_anomalies, robust_scores, AnomalyDetector, BASE_THRESHOLD, DEFAULT_SENSITIVITY};
pub use cluster::{split_at_gaps, ClusterDetector, ValueCluster};
pub use correlation::{compute_correlation_matrix, correlation_matrix_with};
pub use periodic::PeriodicDetector;
pub use traits::{Detection, PatternDetector};
pub use trending::{LinearFit, TrendDetector};
pub use types::{AnalysisResult, CorrelationMatrix, PatternType};
