use num_traits::Num;
use serde::{Deserialize, Serialize};

use crate::CartesianPoint2d;

/// Axis-aligned 2d rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect<N: Num + Copy + PartialOrd = f64> {
    /// Minimum X.
    pub x_min: N,
    /// Minimum Y.
    pub y_min: N,
    /// Maximum X.
    pub x_max: N,
    /// Maximum Y.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd> BoundingRect<N> {
    /// Creates a new rectangle.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: if self.x_min < other.x_min {
                self.x_min
            } else {
                other.x_min
            },
            y_min: if self.y_min < other.y_min {
                self.y_min
            } else {
                other.y_min
            },
            x_max: if self.x_max > other.x_max {
                self.x_max
            } else {
                other.x_max
            },
            y_max: if self.y_max > other.y_max {
                self.y_max
            } else {
                other.y_max
            },
        }
    }

    /// Grows the rectangle to include the given coordinates.
    pub fn expand(&mut self, x: N, y: N) {
        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// Zero-size rectangle at the point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = N>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Rectangle containing all the points, or `None` if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut rect = Self::from_point(first);
        for p in points {
            rect.expand(p.x(), p.y());
        }

        Some(rect)
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Returns true if the rectangles overlap. Touching borders count as overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_max >= other.x_min
            && self.x_min <= other.x_max
            && self.y_max >= other.y_min
            && self.y_min <= other.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    #[test]
    fn intersects() {
        let rect = BoundingRect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect.intersects(&BoundingRect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(rect.intersects(&BoundingRect::new(10.0, 10.0, 15.0, 15.0)));
        assert!(rect.intersects(&BoundingRect::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!rect.intersects(&BoundingRect::new(10.1, 0.0, 15.0, 15.0)));
        assert!(!rect.intersects(&BoundingRect::new(0.0, -5.0, 15.0, -0.1)));
    }

    #[test]
    fn from_points() {
        let points = [Coord::xy(1.0, 5.0), Coord::xy(-3.0, 2.0), Coord::xy(4.0, -1.0)];
        let rect = BoundingRect::from_points(points.iter()).expect("not empty");
        assert_eq!(rect, BoundingRect::new(-3.0, -1.0, 4.0, 5.0));

        assert!(BoundingRect::<f64>::from_points(std::iter::empty::<&Coord>()).is_none());
    }

    #[test]
    fn merge_many() {
        let merged = [
            BoundingRect::new(0.0, 0.0, 1.0, 1.0),
            BoundingRect::new(-1.0, 0.5, 0.5, 3.0),
        ]
        .into_iter()
        .reduce(|acc, rect| acc.merge(rect));

        assert_eq!(merged, Some(BoundingRect::new(-1.0, 0.0, 1.0, 3.0)));
    }
}
