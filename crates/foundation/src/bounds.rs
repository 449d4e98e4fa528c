/// Axis-aligned bounding box in lon/lat degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Smallest box containing both inputs.
    pub fn union(a: Aabb2, b: Aabb2) -> Aabb2 {
        Aabb2 {
            min: [a.min[0].min(b.min[0]), a.min[1].min(b.min[1])],
            max: [a.max[0].max(b.max[0]), a.max[1].max(b.max[1])],
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = [f64; 2]>) -> Option<Aabb2> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        Some(Aabb2 { min, max })
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;

    #[test]
    fn from_points_spans_all_inputs() {
        let b = Aabb2::from_points([[1.0, 2.0], [-3.0, 5.0], [0.0, -1.0]]).unwrap();
        assert_eq!(b.min, [-3.0, -1.0]);
        assert_eq!(b.max, [1.0, 5.0]);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Aabb2::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn union_covers_both() {
        let a = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        let b = Aabb2::new([-2.0, 0.5], [0.5, 3.0]);
        let u = Aabb2::union(a, b);
        assert!(u.contains([0.9, 0.9]));
        assert!(u.contains([-2.0, 3.0]));
    }
}
