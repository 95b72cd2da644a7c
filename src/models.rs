use serde::{Deserialize, Serialize};

/// Integer pixel coordinate. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance to `other`.
    pub fn distance_sq(&self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Points in emission order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSequence(pub Vec<Point>);

impl PointSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, p: Point) {
        self.0.push(p);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Inclusive `(min, max)` corners, `None` when empty.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.0.first()?;
        Some(self.0.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    pub fn as_tuples(&self) -> Vec<(i32, i32)> {
        self.0.iter().map(|&p| p.into()).collect()
    }
}

impl<'a> IntoIterator for &'a PointSequence {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Point> for PointSequence {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_pairs() {
        let seq: PointSequence = [Point::new(1, -2), Point::new(3, 4)].into_iter().collect();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "[[1,-2],[3,4]]");
        let back: PointSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn bounds_cover_all_points() {
        let seq: PointSequence = [Point::new(2, 5), Point::new(-1, 7), Point::new(4, 0)]
            .into_iter()
            .collect();
        assert_eq!(seq.bounds(), Some((Point::new(-1, 0), Point::new(4, 7))));
        assert_eq!(PointSequence::new().bounds(), None);
    }
}
