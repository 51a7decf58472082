//! Area bucketing for grouping keys.

use std::fmt;

use unitsheet_model::format_number;

/// Global bucket size in square metres when no per-type size applies.
pub const DEFAULT_BUCKET_SIZE: f64 = 25.0;

/// Half-open area range `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBucket {
    pub lower: f64,
    pub upper: f64,
}

impl AreaBucket {
    /// Bucket holding `area`. The lower edge is inclusive, so `100` falls
    /// into `[100,125)` with a size of 25. Non-positive or non-finite sizes
    /// use [`DEFAULT_BUCKET_SIZE`].
    pub fn for_area(area: f64, size: f64) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            DEFAULT_BUCKET_SIZE
        };
        let lower = (area / size).floor() * size;
        Self {
            lower,
            upper: lower + size,
        }
    }

    /// Key value, e.g. `[100,125)`.
    pub fn key_value(&self) -> String {
        format!(
            "[{},{})",
            format_number(self.lower),
            format_number(self.upper)
        )
    }

    /// Parses a value produced by [`Self::key_value`].
    pub fn parse_key_value(value: &str) -> Option<Self> {
        let inner = value.strip_prefix('[')?.strip_suffix(')')?;
        let (lower, upper) = inner.split_once(',')?;
        Some(Self {
            lower: lower.trim().parse().ok()?,
            upper: upper.trim().parse().ok()?,
        })
    }

    pub fn contains(&self, area: f64) -> bool {
        area >= self.lower && area < self.upper
    }
}

impl fmt::Display for AreaBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} m²",
            format_number(self.lower),
            format_number(self.upper)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_edge_is_inclusive() {
        let bucket = AreaBucket::for_area(117.0, 25.0);
        assert_eq!(bucket.key_value(), "[100,125)");
        assert_eq!(AreaBucket::for_area(100.0, 25.0), bucket);
        assert_eq!(AreaBucket::for_area(125.0, 25.0).key_value(), "[125,150)");
        assert!(bucket.contains(100.0));
        assert!(!bucket.contains(125.0));
    }

    #[test]
    fn invalid_size_uses_default() {
        assert_eq!(AreaBucket::for_area(30.0, 0.0).key_value(), "[25,50)");
        assert_eq!(AreaBucket::for_area(30.0, -5.0).key_value(), "[25,50)");
    }

    #[test]
    fn key_value_round_trips() {
        let bucket = AreaBucket::for_area(62.0, 12.5);
        assert_eq!(bucket.key_value(), "[50,62.5)");
        assert_eq!(AreaBucket::parse_key_value("[50,62.5)"), Some(bucket));
        assert_eq!(bucket.to_string(), "50-62.5 m²");
    }
}
