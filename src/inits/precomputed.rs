use crate::{KMeans, KMeansError, KMeansState, Result, memory::*};

#[inline(always)] pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, computed: Vec<T>) -> Result<()> {
	if computed.len() != state.k * kmean.sample_dims {
		return Err(KMeansError::Configuration(format!(
			"expected {} precomputed centroids with {} dimensions ({} values), got {} values",
			state.k, kmean.sample_dims, state.k * kmean.sample_dims, computed.len())));
	}
	computed.chunks_exact(kmean.sample_dims).enumerate().for_each(|(ci, c)| {
		state.set_centroid_from_iter(ci, c.iter().cloned());
	});
	Ok(())
}
