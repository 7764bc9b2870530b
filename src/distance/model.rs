//! Distance model trait.

/// Read-only travel cost between any two stops of an instance.
///
/// Costs are non-negative, a stop's cost to itself is zero, and the model need
/// not be symmetric.
pub trait DistanceModel: Send + Sync {
    /// Number of stops the model covers.
    fn size(&self) -> usize;

    /// Travel cost from stop `from` to stop `to`.
    fn cost(&self, from: usize, to: usize) -> f64;

    /// Returns `true` if `cost(a, b) == cost(b, a)` for every pair.
    ///
    /// Operators use this to take O(1) shortcuts when reversing segments.
    /// The default is the conservative `false`.
    fn is_symmetric(&self) -> bool {
        false
    }

    /// Cost of visiting `stops` in order, starting and ending at `depot`.
    fn path_cost(&self, depot: usize, stops: &[usize]) -> f64 {
        if stops.is_empty() {
            return 0.0;
        }
        let mut cost = self.cost(depot, stops[0]);
        for w in stops.windows(2) {
            cost += self.cost(w[0], w[1]);
        }
        cost + self.cost(stops[stops.len() - 1], depot)
    }
}

impl<T: DistanceModel + ?Sized> DistanceModel for &T {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        (**self).cost(from, to)
    }

    fn is_symmetric(&self) -> bool {
        (**self).is_symmetric()
    }
}
