//! Types produced by pattern analysis

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// Patterns the analyzer can look for
///
/// Declaration order is the tie-break priority: when two detectors report
/// the same confidence the lower variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternType {
    /// Repeating structure found through autocorrelation
    Periodic,
    /// Linear dependence on time
    Trending,
    /// Points far from the robust center
    Anomaly,
    /// Values grouped into separated runs
    Cluster,
}

impl PatternType {
    /// All pattern types in priority order
    pub const ALL: [PatternType; 4] = [
        PatternType::Periodic,
        PatternType::Trending,
        PatternType::Anomaly,
        PatternType::Cluster,
    ];
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::Periodic => write!(f, "Periodic"),
            PatternType::Trending => write!(f, "Trending"),
            PatternType::Anomaly => write!(f, "Anomaly"),
            PatternType::Cluster => write!(f, "Cluster"),
        }
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Outcome of a time-series analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pattern_found: bool,
    confidence: f64,
    pattern_type: PatternType,
    metadata: HashMap<String, String>,
}

impl AnalysisResult {
    /// A detected pattern
    pub fn found(pattern_type: PatternType, confidence: f64) -> Self {
        Self {
            pattern_found: true,
            confidence: clamp_confidence(confidence),
            pattern_type,
            metadata: HashMap::new(),
        }
    }

    /// No pattern; `confidence` is the best score that fell short
    pub fn not_found(pattern_type: PatternType, confidence: f64) -> Self {
        Self {
            pattern_found: false,
            ..Self::found(pattern_type, confidence)
        }
    }

    /// The vacuous result for empty input
    pub fn empty() -> Self {
        Self::not_found(PatternType::Periodic, 0.0)
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn pattern_found(&self) -> bool {
        self.pattern_found
    }

    /// Confidence in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Look up one metadata entry
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pattern_found {
            write!(
                f,
                "{} pattern (confidence: {:.3})",
                self.pattern_type, self.confidence
            )
        } else {
            write!(f, "No pattern (best: {} at {:.3})", self.pattern_type, self.confidence)
        }
    }
}

/// Square matrix of Pearson correlation coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    rows: Vec<Vec<f64>>,
    degenerate_columns: Vec<usize>,
    metadata: HashMap<String, String>,
}

impl CorrelationMatrix {
    pub(crate) fn new(rows: Vec<Vec<f64>>, degenerate_columns: Vec<usize>) -> Self {
        let mut metadata = HashMap::new();
        if !degenerate_columns.is_empty() {
            metadata.insert("warning".to_string(), "zero_variance".to_string());
            let list: Vec<String> = degenerate_columns.iter().map(usize::to_string).collect();
            metadata.insert("degenerate_columns".to_string(), list.join(","));
        }
        Self {
            rows,
            degenerate_columns,
            metadata,
        }
    }

    /// A matrix over zero variables
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Coefficient between variables `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Consume the matrix, keeping only the coefficients
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Indices of zero-variance variables
    pub fn degenerate_columns(&self) -> &[usize] {
        &self.degenerate_columns
    }

    /// Whether any coefficient was replaced because a variable was constant
    pub fn has_warning(&self) -> bool {
        !self.degenerate_columns.is_empty()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

impl Index<(usize, usize)> for CorrelationMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.rows[i][j]
    }
}
