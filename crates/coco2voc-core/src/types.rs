//! Core data types shared between the library and the CLI.

use serde::{Deserialize, Serialize};

/// Statistics for a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConversionStats {
    /// Images visited before the run finished or hit its cap
    pub images_seen: usize,

    /// Images that produced output files and a manifest line
    pub images_converted: usize,

    /// Images skipped because they had no (remaining) annotations
    pub images_skipped: usize,

    /// Annotations painted onto rasters
    pub annotations_composited: usize,

    /// Annotations without any geometry
    pub annotations_skipped: usize,

    /// Crowd annotations dropped before compositing
    pub crowd_dropped: usize,

    /// First unique instance id handed out by this run
    pub first_id: u64,

    /// Unique instance id the next run should start from
    pub next_id: u64,

    /// Conversion rate in images per second
    pub images_per_second: f64,

    /// Total conversion time in seconds
    pub total_seconds: f64,
}

impl ConversionStats {
    /// Unique ids allocated during the run.
    pub fn ids_allocated(&self) -> u64 {
        self.next_id.saturating_sub(self.first_id)
    }

    /// Fill in timing fields from the run's elapsed time.
    pub fn finish(&mut self, total_seconds: f64) {
        self.total_seconds = total_seconds;
        self.images_per_second = if total_seconds > 0.0 {
            self.images_converted as f64 / total_seconds
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serializes_to_json() {
        let stats = ConversionStats {
            images_converted: 4,
            first_id: 1,
            next_id: 11,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"images_converted\":4"));
        assert!(json.contains("\"next_id\":11"));
    }

    #[test]
    fn test_ids_allocated() {
        let stats = ConversionStats {
            first_id: 5,
            next_id: 9,
            ..Default::default()
        };
        assert_eq!(stats.ids_allocated(), 4);
    }

    #[test]
    fn test_finish_computes_rate() {
        let mut stats = ConversionStats {
            images_converted: 10,
            ..Default::default()
        };
        stats.finish(2.0);
        assert_eq!(stats.total_seconds, 2.0);
        assert_eq!(stats.images_per_second, 5.0);

        stats.finish(0.0);
        assert_eq!(stats.images_per_second, 0.0);
    }
}
