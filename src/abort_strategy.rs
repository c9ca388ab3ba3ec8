use crate::memory::*;

/// Enum with possible abort strategies.
/// These strategies specify when a running EM calculation is considered converged.
///
/// Independent of the strategy, a calculation never runs more than `max_iter` iterations
/// (see [`crate::KMeans::kmeans_em`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// Stops as soon as the error metric of an iteration is exactly (bit-)equal to the error metric
	/// of the previous iteration.
	///
	/// This is prone to never terminating when the least significant bits of the sum keep changing,
	/// and to terminating early when two different partitions happen to have the same sum.
	ExactError,
	/// This strategy aborts the calculation directly after an iteration changed the error metric by
	/// less than `threshold` (in either direction).
	/// ## Fields:
	/// - **threshold**: Smallest change of the error metric that still counts as progress
	NoImprovement { threshold: T },
	/// Stops once an assignment step did not move a single point to another cluster.
	StablePartition
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self { AbortStrategy::StablePartition }
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::ExactError => Box::new(ExactErrorLogic {
				prev_error: None
			}),
			AbortStrategy::NoImprovement{threshold} => Box::new(NoImprovementLogic {
				threshold,
				prev_error: T::infinity()
			}),
			AbortStrategy::StablePartition => Box::new(StablePartitionLogic {
				first: true
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once the assignment step of an iteration finished.
	/// ## Arguments
	/// - **error**: The new error metric (distsum) after the assignment step
	/// - **reassigned**: Amount of samples that changed their cluster in this assignment step
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation converged
	fn next(&mut self, error: T, reassigned: usize) -> bool;
}


pub(crate) struct ExactErrorLogic<T: Primitive> {
	prev_error: Option<T>
}
impl<T: Primitive> AbortStrategyLogic<T> for ExactErrorLogic<T> {
	fn next(&mut self, error: T, _reassigned: usize) -> bool {
		let prev_error = self.prev_error.replace(error);
		prev_error != Some(error)
	}
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_error: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, error: T, _reassigned: usize) -> bool {
		let improvement = self.prev_error - error;
		self.prev_error = error;
		// NaN never compares below the threshold, so a corrupted run keeps going until max_iter
		!(improvement.abs() < self.threshold)
	}
}


pub(crate) struct StablePartitionLogic {
	first: bool
}
impl<T: Primitive> AbortStrategyLogic<T> for StablePartitionLogic {
	fn next(&mut self, _error: T, reassigned: usize) -> bool {
		// The first assignment step always counts as a change, the initial assignments are meaningless
		if std::mem::replace(&mut self.first, false) {
			return true;
		}
		reassigned != 0
	}
}
