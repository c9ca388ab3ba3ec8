use crate::memory::Primitive;

/// Euclidean (non-squared) distance between two equally sized points.
#[inline(always)] pub(crate) fn euclidean_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter().cloned().zip(b.iter().cloned())
        .map(|(av,bv)| av - bv)         // <sample> - <centroid>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum::<T>()                     // sum(<vec_components>^2)
        .sqrt()
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}
