use std::cmp::Ordering;

/// Open-set entry of the grid search
#[derive(Copy, Clone, PartialEq)]
pub(super) struct State {
    pub(super) f_score: f64,
    pub(super) cell: usize,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by estimated total cost (reversed from standard Rust BinaryHeap)
        other.f_score.total_cmp(&self.f_score)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
