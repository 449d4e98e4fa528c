/// The ordered set of year columns a table is defined over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearAxis {
    years: Vec<i32>,
}

impl YearAxis {
    /// Builds a sorted, de-duplicated axis from arbitrary year input.
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        Self { years }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn index_of(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn min(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn max(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Smallest gap between consecutive years (the native cadence).
    pub fn step(&self) -> Option<i32> {
        self.years.windows(2).map(|w| w[1] - w[0]).min()
    }
}

#[cfg(test)]
mod tests {
    use super::YearAxis;

    #[test]
    fn sorts_and_dedups() {
        let axis = YearAxis::new([2000, 1990, 1995, 2000]);
        assert_eq!(axis.years(), &[1990, 1995, 2000]);
        assert_eq!(axis.index_of(1995), Some(1));
        assert_eq!(axis.index_of(1991), None);
    }

    #[test]
    fn step_is_native_cadence() {
        let axis = YearAxis::new([1990, 1995, 2000, 2005]);
        assert_eq!(axis.step(), Some(5));
        assert_eq!(axis.max(), Some(2005));
    }
}
