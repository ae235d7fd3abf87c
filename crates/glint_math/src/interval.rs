/// A closed range of ray parameters or coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Every strictly positive distance along a ray.
    pub const POSITIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_positive_excludes_origin() {
        assert!(!Interval::POSITIVE.surrounds(0.0));
        assert!(Interval::POSITIVE.surrounds(1e-6));
        assert!(Interval::POSITIVE.surrounds(1e30));
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // Expanded by 2.0 on each side (4.0 / 2)
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_interval_empty_and_universe() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(1e10));
        assert!(Interval::UNIVERSE.contains(-1e10));

        let merged = Interval::surrounding(&Interval::EMPTY, &Interval::new(1.0, 2.0));
        assert_eq!(merged, Interval::new(1.0, 2.0));
    }
}
