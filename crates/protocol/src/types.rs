use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resolution slot a model file is uploaded into.
///
/// Each map has one low-resolution and one high-resolution model slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "high")]
    High,
}

impl Resolution {
    /// Returns the wire representation (`"low"` / `"high"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::High => "high",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a resolution string fails.
#[derive(Debug, thiserror::Error)]
#[error("unknown resolution: {0} (expected \"low\" or \"high\")")]
pub struct ParseResolutionError(String);

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Resolution::Low),
            "high" => Ok(Resolution::High),
            other => Err(ParseResolutionError(other.to_string())),
        }
    }
}

/// Client-local progress snapshot for an in-flight upload.
///
/// Recomputed after every successful chunk; never persisted. Percentages are
/// monotonically non-decreasing across a session and never exceed 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub total_chunks: u32,
    pub uploaded_chunks: u32,
    pub percentage: f64,
    pub current_chunk: u32,
    pub bytes_uploaded: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Derives the snapshot after chunk `chunk_index` (0-based) succeeded.
    ///
    /// The last chunk may be shorter than `chunk_size`, so the byte count is
    /// clamped to `file_size`.
    pub fn after_chunk(chunk_index: u32, total_chunks: u32, chunk_size: u64, file_size: u64) -> Self {
        let bytes_uploaded = (u64::from(chunk_index) + 1)
            .saturating_mul(chunk_size)
            .min(file_size);
        let percentage = if file_size == 0 {
            100.0
        } else {
            bytes_uploaded as f64 / file_size as f64 * 100.0
        };
        Self {
            total_chunks,
            uploaded_chunks: chunk_index + 1,
            percentage,
            current_chunk: chunk_index,
            bytes_uploaded,
            total_bytes: file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_serialization() {
        assert_eq!(serde_json::to_string(&Resolution::Low).unwrap(), "\"low\"");
        assert_eq!(serde_json::to_string(&Resolution::High).unwrap(), "\"high\"");
    }

    #[test]
    fn resolution_from_str() {
        assert_eq!("low".parse::<Resolution>().unwrap(), Resolution::Low);
        assert_eq!("high".parse::<Resolution>().unwrap(), Resolution::High);
        assert!("medium".parse::<Resolution>().is_err());
    }

    #[test]
    fn resolution_display_matches_wire() {
        assert_eq!(Resolution::Low.to_string(), "low");
        assert_eq!(Resolution::High.to_string(), "high");
    }

    #[test]
    fn progress_after_first_chunk() {
        let p = UploadProgress::after_chunk(0, 3, 10, 25);
        assert_eq!(p.uploaded_chunks, 1);
        assert_eq!(p.current_chunk, 0);
        assert_eq!(p.bytes_uploaded, 10);
        assert!((p.percentage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_last_chunk_clamps_to_file_size() {
        let p = UploadProgress::after_chunk(2, 3, 10, 25);
        assert_eq!(p.bytes_uploaded, 25);
        assert!((p.percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_monotonic_over_session() {
        let mut last = -1.0f64;
        for i in 0..7 {
            let p = UploadProgress::after_chunk(i, 7, 4096, 7 * 4096 - 100);
            assert!(p.percentage >= last);
            assert!(p.percentage <= 100.0);
            last = p.percentage;
        }
        assert!((last - 100.0).abs() < f64::EPSILON);
    }
}
