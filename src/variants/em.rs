use crate::{CentroidUpdate, EmptyClusterPolicy, KMeans, KMeansConfig, KMeansError, KMeansState, Result, memory::*};
use tracing::{debug, info, warn};

pub(crate) struct Em<T: Primitive> {
	_p: std::marker::PhantomData<T>
}
impl<T: Primitive> Em<T> {
	/// Applies the configured [`EmptyClusterPolicy`].
	///
	/// ## Returns
	/// `true` if centroids were moved, those still need an assignment step before the run can end.
	fn handle_empty_clusters(config: &KMeansConfig<'_, T>, state: &mut KMeansState<T>, empty: &[usize], iteration: usize) -> Result<bool> {
		match config.empty_cluster_policy {
			EmptyClusterPolicy::KeepCentroid => {
				warn!(iteration, clusters = ?empty, "clusters without samples, keeping their centroids");
				Ok(false)
			},
			EmptyClusterPolicy::Reseed => {
				warn!(iteration, clusters = ?empty, "clusters without samples, reseeding their centroids");
				for &ci in empty {
					let reseeded: Vec<T> = (0..state.sample_dims).map(|_| config.random_coordinate()).collect();
					state.set_centroid_from_iter(ci, reseeded.into_iter());
				}
				Ok(true)
			},
			EmptyClusterPolicy::Fail => Err(KMeansError::DegenerateCluster { cluster: empty[0], iteration })
		}
	}

	pub fn calculate<'a, F>(data: &KMeans<T>, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
				where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
		if k == 0 || k > data.sample_cnt {
			return Err(KMeansError::Configuration(
				format!("cluster count must be within [1, {}], got {}", data.sample_cnt, k)));
		}
		if max_iter == 0 {
			return Err(KMeansError::Configuration("max_iter must be at least 1".to_string()));
		}
		config.validate()?;

		let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
		state.distsum = T::infinity();

		// Initialize clusters and notify subscriber
		init(data, &mut state, config)?;
		(config.init_done)(&state);
		let mut abort_strategy = config.abort_strategy.create_logic();

		for i in 1..=max_iter {
			let prev_distsum = state.distsum;
			let reassigned = data.update_cluster_assignments(&mut state);
			state.iterations = i;
			let mut converged = !abort_strategy.next(state.distsum, reassigned);
			debug!(iteration = i, distsum = %state.distsum, improvement = %(prev_distsum - state.distsum), reassigned, "assignment step done");

			if let CentroidUpdate::EmptyClusters(empty) = data.update_centroids(&mut state) {
				if Self::handle_empty_clusters(config, &mut state, &empty, i)? {
					converged = false;
				}
			}

			// Notify subscriber about finished iteration
			(config.iteration_done)(&state, i, prev_distsum);
			if converged {
				info!(iterations = i, distsum = %state.distsum, "k-means converged");
				return Ok(state);
			}
		}

		Err(KMeansError::ConvergenceTimeout {
			iterations: max_iter,
			distsum: num::cast(state.distsum).unwrap_or(f64::NAN)
		})
	}
}
