//! Incremental prefix-load bookkeeping for capacity feasibility.

use crate::models::{DemandModel, Route};

/// Tracks the cumulative load at every position of one route.
///
/// Keeps `prefix[i]` (load after the `i`-th stop) and `suffix_max[i]`
/// (largest prefix load at or after position `i`), so that insertion and
/// replacement checks run in O(1). After a route is edited, [`sync`]
/// recomputes only from the first modified position onward, walking back
/// over earlier suffix maxima just until they stop changing.
///
/// Loads are kept in `i64`, so sums of `i32` demands never overflow even
/// when capacities sit near `i32::MAX`. Incoming demands are assumed
/// non-negative, which instance validation guarantees.
///
/// [`sync`]: CapacityTracker::sync
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::CapacityTracker;
/// use u_cvrp::models::{Route, Vehicle};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let demands = vec![0, 10, 15];
/// let route = Route::with_stops(&Vehicle::new(0, 30), 0, vec![1, 2], &dm, &demands);
///
/// let tracker = CapacityTracker::for_route(&route, &demands);
/// assert_eq!(tracker.total(), 25);
/// assert!(tracker.can_insert(1, 5));
/// assert!(!tracker.can_insert(1, 6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityTracker {
    capacity: i64,
    prefix: Vec<i64>,
    suffix_max: Vec<i64>,
}

impl CapacityTracker {
    /// Creates a tracker for an empty route.
    pub fn new(capacity: i32) -> Self {
        Self {
            capacity: i64::from(capacity),
            prefix: Vec::new(),
            suffix_max: Vec::new(),
        }
    }

    /// Builds a tracker for an existing route.
    pub fn for_route<M: DemandModel + ?Sized>(route: &Route, demands: &M) -> Self {
        let mut tracker = Self::new(route.capacity());
        tracker.sync(route.stops(), demands, 0);
        tracker
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Number of tracked positions.
    pub fn len(&self) -> usize {
        self.prefix.len()
    }

    /// Returns `true` if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Load carried over the whole route.
    pub fn total(&self) -> i64 {
        self.prefix.last().copied().unwrap_or(0)
    }

    /// Cumulative load before position `pos` (0 at the depot).
    pub fn load_before(&self, pos: usize) -> i64 {
        if pos == 0 {
            0
        } else {
            self.prefix[pos - 1]
        }
    }

    /// Cumulative load after the stop at `pos`.
    pub fn load_at(&self, pos: usize) -> i64 {
        self.prefix[pos]
    }

    /// Load of the `len` stops starting at `start`.
    pub fn segment_load(&self, start: usize, len: usize) -> i64 {
        self.load_before(start + len) - self.load_before(start)
    }

    fn max_from(&self, pos: usize) -> Option<i64> {
        self.suffix_max.get(pos).copied()
    }

    /// Can a load of `load` be inserted before position `pos` without any
    /// prefix exceeding capacity?
    pub fn can_insert(&self, pos: usize, load: i64) -> bool {
        self.load_before(pos) + load <= self.capacity
            && self.max_from(pos).is_none_or(|m| m + load <= self.capacity)
    }

    /// Can the `len` stops starting at `start` be replaced by stops totalling
    /// `incoming` without any prefix exceeding capacity?
    pub fn can_replace(&self, start: usize, len: usize, incoming: i64) -> bool {
        let delta = incoming - self.segment_load(start, len);
        self.load_before(start) + incoming <= self.capacity
            && self.max_from(start + len).is_none_or(|m| m + delta <= self.capacity)
    }

    /// Returns `true` if no prefix exceeds capacity.
    pub fn is_feasible(&self) -> bool {
        self.max_from(0).is_none_or(|m| m <= self.capacity)
    }

    /// First position whose cumulative load exceeds capacity, with that load.
    pub fn first_violation(&self) -> Option<(usize, i64)> {
        self.prefix
            .iter()
            .position(|&l| l > self.capacity)
            .map(|pos| (pos, self.prefix[pos]))
    }

    /// Brings the tracker in line with `stops` after an edit that left
    /// positions before `from` untouched.
    pub fn sync<M: DemandModel + ?Sized>(&mut self, stops: &[usize], demands: &M, from: usize) {
        let n = stops.len();
        let from = from.min(n).min(self.prefix.len());

        self.prefix.truncate(from);
        let mut load = self.load_before(from);
        for &stop in &stops[from..] {
            load += i64::from(demands.demand(stop));
            self.prefix.push(load);
        }

        // suffix_max[..from] still holds the old maxima.
        self.suffix_max.truncate(from);
        self.suffix_max.resize(n, 0);
        let mut running = i64::MIN;
        for i in (from..n).rev() {
            running = running.max(self.prefix[i]);
            self.suffix_max[i] = running;
        }
        for i in (0..from).rev() {
            let value = match self.suffix_max.get(i + 1) {
                Some(&next) if i + 1 < n => self.prefix[i].max(next),
                _ => self.prefix[i],
            };
            if value == self.suffix_max[i] {
                break;
            }
            self.suffix_max[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(stops: &[usize], demands: &[i32], capacity: i32) -> CapacityTracker {
        let mut t = CapacityTracker::new(capacity);
        t.sync(stops, demands, 0);
        t
    }

    #[test]
    fn test_prefix_loads() {
        let demands = [0, 5, 10, 12];
        let t = tracker(&[1, 2, 3], &demands, 30);
        assert_eq!(t.len(), 3);
        assert_eq!(t.load_before(0), 0);
        assert_eq!(t.load_at(0), 5);
        assert_eq!(t.load_at(2), 27);
        assert_eq!(t.total(), 27);
        assert_eq!(t.segment_load(1, 2), 22);
        assert!(t.is_feasible());
    }

    #[test]
    fn test_can_insert_boundaries() {
        let demands = [0, 5, 10, 12];
        let t = tracker(&[1, 2, 3], &demands, 30);
        assert!(t.can_insert(0, 3));
        assert!(t.can_insert(3, 3));
        assert!(!t.can_insert(0, 4));
        assert!(!t.can_insert(3, 4));
    }

    #[test]
    fn test_empty_route() {
        let t = CapacityTracker::new(10);
        assert!(t.is_empty());
        assert_eq!(t.total(), 0);
        assert!(t.can_insert(0, 10));
        assert!(!t.can_insert(0, 11));
        assert!(t.is_feasible());
    }

    #[test]
    fn test_can_replace() {
        let demands = [0, 5, 10, 12, 9];
        let t = tracker(&[1, 2, 3], &demands, 30);
        // swap stop 2 (10) for stop 4 (9): total 26
        assert!(t.can_replace(1, 1, 9));
        // replace stop 1 (5) with 9: total 31
        assert!(!t.can_replace(0, 1, 9));
        // drop the whole tail for 25
        assert!(t.can_replace(1, 2, 25));
        assert!(!t.can_replace(1, 2, 26));
    }

    #[test]
    fn test_sync_after_insert_matches_rebuild() {
        let demands = [0, 5, 10, 12, 4];
        let mut t = tracker(&[1, 2, 3], &demands, 30);
        t.sync(&[1, 4, 2, 3], &demands[..], 1);
        assert_eq!(t, tracker(&[1, 4, 2, 3], &demands, 30));
    }

    #[test]
    fn test_sync_after_removal_matches_rebuild() {
        let demands = [0, 5, 10, 12, 4];
        let mut t = tracker(&[1, 4, 2, 3], &demands, 30);
        t.sync(&[1, 4], &demands[..], 2);
        assert_eq!(t, tracker(&[1, 4], &demands, 30));
        t.sync(&[], &demands[..], 0);
        assert_eq!(t, tracker(&[], &demands, 30));
    }

    #[test]
    fn test_loads_near_i32_max_do_not_wrap() {
        let demands = [0, 2_000_000_000, 2_000_000_000];
        let t = tracker(&[1], &demands, i32::MAX);
        assert!(t.is_feasible());
        assert!(!t.can_insert(0, 2_000_000_000));
        assert!(!t.can_insert(1, 2_000_000_000));
        assert!(!t.can_replace(0, 0, 2_000_000_000));

        let both = tracker(&[1, 2], &demands, i32::MAX);
        assert_eq!(both.total(), 4_000_000_000);
        assert_eq!(both.first_violation(), Some((1, 4_000_000_000)));
    }

    #[test]
    fn test_first_violation() {
        let demands = [0, 20, 15, 1];
        let t = tracker(&[1, 2, 3], &demands, 30);
        assert!(!t.is_feasible());
        assert_eq!(t.first_violation(), Some((1, 35)));
    }
}
