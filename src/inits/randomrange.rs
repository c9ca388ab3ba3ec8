use crate::{KMeans, KMeansState, KMeansConfig, Result, memory::*};
use tracing::trace;

#[inline(always)] pub fn calculate<T: Primitive>(_kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()> {
	// centroid by centroid, dimension by dimension
	state.centroids.iter_mut().for_each(|c| *c = config.random_coordinate());
	trace!(k = state.k, range = ?config.init_range, "seeded centroids from coordinate range");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::prelude::*;

	#[test]
	fn centroids_within_range() {
		let kmean = KMeans::new(vec![100.0f64, 200.0, 300.0, 400.0], 2, 2).unwrap();
		let mut state = KMeansState::new(2, 2, 2);
		let conf = KMeansConfig::build()
			.random_generator(StdRng::seed_from_u64(5))
			.init_range(1.0, 2.0)
			.build();
		calculate(&kmean, &mut state, &conf).unwrap();
		assert!(state.centroids.iter().all(|&c| c >= 1.0 && c < 2.0), "{:?}", state.centroids);
	}

	#[test]
	fn same_seed_same_centroids() {
		let kmean = KMeans::new(vec![0.0f32; 30], 10, 3).unwrap();
		let run = |seed| {
			let mut state = KMeansState::new(10, 3, 4);
			let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build();
			calculate(&kmean, &mut state, &conf).unwrap();
			state.centroids
		};
		assert_eq!(run(11), run(11));
		assert_ne!(run(11), run(12));
	}
}
