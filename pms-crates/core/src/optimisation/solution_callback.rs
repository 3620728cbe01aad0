use crate::results::Solution;

/// Called by the search for every solution which improves on the best solution found so far.
pub trait SolutionCallback {
    fn on_solution_callback(&self, solution: &Solution);
}

impl<T: Fn(&Solution)> SolutionCallback for T {
    fn on_solution_callback(&self, solution: &Solution) {
        (self)(solution)
    }
}

impl<T: SolutionCallback> SolutionCallback for Option<T> {
    fn on_solution_callback(&self, solution: &Solution) {
        if let Some(callback) = self {
            callback.on_solution_callback(solution)
        }
    }
}
