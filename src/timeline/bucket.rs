use crate::timeline::round1;
use serde::Serialize;

/// Historical days that share one offset from the target date.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimelineBucket {
    pub offset: i32,
    /// Days whose exceedance flag is known.
    pub sample_count: u32,
    /// Days that exceeded the thresholds. Never larger than `sample_count`.
    pub exceed_count: u32,
    /// The condition's metric for every day at this offset that reported one.
    pub raw_metric_values: Vec<f64>,
}

impl TimelineBucket {
    pub(crate) fn empty(offset: i32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, exceed: Option<bool>, metric: Option<f64>) {
        if let Some(exceeded) = exceed {
            self.sample_count += 1;
            if exceeded {
                self.exceed_count += 1;
            }
        }
        if let Some(value) = metric {
            self.raw_metric_values.push(value);
        }
    }

    /// Share of known days that exceeded, as a percentage rounded to one decimal.
    pub fn probability_pct(&self) -> Option<f64> {
        (self.sample_count > 0)
            .then(|| round1(self.exceed_count as f64 / self.sample_count as f64 * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability() {
        let mut bucket = TimelineBucket::empty(0);
        assert_eq!(bucket.probability_pct(), None);

        for exceed in [true, true, false, true] {
            bucket.record(Some(exceed), None);
        }
        assert_eq!(bucket.probability_pct(), Some(75.0));

        bucket.record(Some(false), None);
        bucket.record(Some(false), None);
        // 3 of 6.
        assert_eq!(bucket.probability_pct(), Some(50.0));
        bucket.record(Some(false), None);
        // 3 of 7 = 42.857...
        assert_eq!(bucket.probability_pct(), Some(42.9));
    }

    #[test]
    fn test_unknown_exceed_only_adds_metric() {
        let mut bucket = TimelineBucket::empty(-2);
        bucket.record(None, Some(12.5));
        bucket.record(None, None);
        assert_eq!(bucket.sample_count, 0);
        assert_eq!(bucket.exceed_count, 0);
        assert_eq!(bucket.raw_metric_values, [12.5]);
    }
}
