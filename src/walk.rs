//! Marker movement along a found path.
//!
//! Searches return states; this turns the positions of those states into the
//! small steps a marker takes when replaying the path. Nothing here feeds back
//! into searching.

use derive_more::Display;

/// A position on the plane.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq)]
#[display("({x:.3}, {y:.3})")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Moves `from` towards `to`, at most `step` along each axis.
#[inline(always)]
fn approach(from: f64, to: f64, step: f64) -> f64 {
    let delta = to - from;
    if delta.abs() <= step {
        to
    } else {
        from + step.copysign(delta)
    }
}

/// Walks through waypoints, `step` units per axis at a time.
///
/// Starts on the first waypoint and yields every intermediate position,
/// landing exactly on each waypoint before heading for the next one. Both
/// axes move at once, so diagonal legs finish their shorter axis first.
///
/// ```
/// use pathsearch::walk::Point;
/// use pathsearch::walk::Walker;
///
/// let walker = Walker::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 1.0)], 1.0).unwrap();
/// let steps: Vec<Point> = walker.collect();
/// assert_eq!(steps, vec![Point::new(1.0, 1.0), Point::new(2.0, 1.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct Walker {
    waypoints: Vec<Point>,
    /// Index of the waypoint being approached.
    next: usize,
    position: Point,
    step: f64,
}

impl Walker {
    /// Returns `None` without waypoints, or when `step` is not a positive
    /// finite distance.
    pub fn new(waypoints: Vec<Point>, step: f64) -> Option<Self> {
        if !(step.is_finite() && step > 0.0) {
            return None;
        }
        if !waypoints.iter().all(Point::is_finite) {
            return None;
        }
        let position = *waypoints.first()?;

        Some(Self {
            waypoints,
            next: 1,
            position,
            step,
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.waypoints.len()
    }
}

impl Iterator for Walker {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip waypoints we are already standing on.
        while self.waypoints.get(self.next) == Some(&self.position) {
            self.next += 1;
        }
        let target = *self.waypoints.get(self.next)?;

        self.position = Point {
            x: approach(self.position.x, target.x, self.step),
            y: approach(self.position.y, target.y, self.step),
        };
        if self.position == target {
            self.next += 1;
        }
        Some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_input() {
        assert!(Walker::new(vec![], 1.0).is_none());
        assert!(Walker::new(vec![Point::new(0.0, 0.0)], 0.0).is_none());
        assert!(Walker::new(vec![Point::new(0.0, 0.0)], f64::NAN).is_none());
        assert!(Walker::new(vec![Point::new(f64::INFINITY, 0.0)], 1.0).is_none());
    }

    #[test]
    fn single_waypoint_stays() {
        let mut walker = Walker::new(vec![Point::new(3.0, 4.0)], 1.0).unwrap();
        assert!(walker.is_done());
        assert_eq!(walker.next(), None);
        assert_eq!(walker.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn lands_on_every_waypoint() {
        let waypoints = vec![
            Point::new(0.0, 0.0),
            Point::new(2.5, -1.5),
            Point::new(2.5, -1.5),
            Point::new(0.0, 0.0),
        ];
        let steps: Vec<Point> = Walker::new(waypoints.clone(), 1.0).unwrap().collect();

        assert_eq!(
            steps,
            vec![
                Point::new(1.0, -1.0),
                Point::new(2.0, -1.5),
                Point::new(2.5, -1.5),
                Point::new(1.5, -0.5),
                Point::new(0.5, 0.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn step_count_follows_longest_axis() {
        let a = Point::new(913.067, 675.260);
        let b = Point::new(1337.014, 564.125);
        let walker = Walker::new(vec![a, b], 1.0).unwrap();
        // 423.947 along x, rounded up.
        assert_eq!(walker.count(), 424);
        assert!((a.distance(&b) - 438.2716).abs() < 1e-3);
    }
}
