use crate::{KMeans, KMeansState, KMeansConfig, Result, memory::*};
use rand::prelude::*;
use std::ops::DerefMut;

#[inline(always)] pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()> {
	kmean.samples.chunks_exact(kmean.sample_dims)
		.choose_multiple(config.rnd.borrow_mut().deref_mut(), state.k).iter().cloned()
		.enumerate()
		.for_each(|(ci, c)| { // Copy randomly chosen centroids into state.centroids
			state.set_centroid_from_iter(ci, c.iter().cloned());
		});
	Ok(())
}
