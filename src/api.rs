use crate::{helpers, memory::*, AbortStrategy, KMeansError, Result};
use std::cell::RefCell;
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);

/// Policy applied by the EM loop when the update step leaves a cluster without any assigned samples
/// (the mean of zero samples is undefined).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Leave the empty cluster's centroid where it is.
    #[default]
    KeepCentroid,
    /// Draw a new random centroid from the configured initialization range, using the
    /// calculation's random number generator.
    Reseed,
    /// Abort the calculation with [`KMeansError::DegenerateCluster`].
    Fail
}

/// Outcome of the update (maximization) step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CentroidUpdate {
    /// Every cluster had at least one sample, all centroids were recomputed.
    Updated,
    /// The listed clusters have no samples. Their centroids were left untouched, all others
    /// were recomputed.
    EmptyClusters(Vec<usize>)
}

/// This is a structure holding various configuration options for the a k-means calculations, such as
/// the random number generator to use, or a couple of callbacks, that can be set to get status information from
/// a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current[`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: Distance sum of the previous iteration (**state** contains the new distsum)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// Half-open coordinate range `[lo, hi)` used by [`KMeans::init_random_range`] and for reseeding
    pub(crate) init_range: (T, T),
    /// What to do with clusters that lost all of their samples
    pub(crate) empty_cluster_policy: EmptyClusterPolicy
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::<T>::default(),
            init_range: (T::from(-10.0).unwrap(), T::from(10.0).unwrap()),
            empty_cluster_policy: EmptyClusterPolicy::default()
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (lo, hi) = self.init_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(KMeansError::Configuration(
                format!("initialization range [{}, {}) is empty or not finite", lo, hi)));
        }
        if let AbortStrategy::NoImprovement { threshold } = self.abort_strategy {
            if !(threshold > T::zero()) {
                return Err(KMeansError::Configuration(
                    format!("convergence threshold must be positive, got {}", threshold)));
            }
        }
        Ok(())
    }

    /// Draws one coordinate uniformly from the initialization range.
    pub(crate) fn random_coordinate(&self) -> T {
        let (lo, hi) = self.init_range;
        self.rnd.borrow_mut().gen_range(lo..hi)
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("abort_strategy", &self.abort_strategy)
            .field("init_range", &self.init_range)
            .field("empty_cluster_policy", &self.empty_cluster_policy)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::StablePartition`]
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Set the half-open coordinate range `[lo, hi)` random centroids are drawn from.
    /// The range is not derived from the samples, a range far away from the data leads to empty clusters.
    /// ## Default
    /// `[-10, 10)`
    pub fn init_range(mut self, lo: T, hi: T) -> Self {
        self.config.init_range = (lo, hi); self
    }
    /// Set the policy for clusters that end up without any assigned sample.
    /// ## Default
    /// [`EmptyClusterPolicy::KeepCentroid`]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The error metric: sum of (non-squared) euclidean distances from all samples to their assigned centroid
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's distance to its centroid
/// - **iterations**: Amount of EM iterations that were run
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,

    pub(crate) sample_dims: usize
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: vec![T::zero();sample_dims * k],
            centroid_frequency: vec![0usize;k],
            assignments: vec![0usize;sample_cnt],
            centroid_distances: vec![T::infinity();sample_cnt],
            iterations: 0,
            sample_dims
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.iter_mut().skip(self.sample_dims * idx).take(self.sample_dims)
                .zip(src)
                .for_each(|(c,s)| *c = s);
    }

    /// Coordinates of the centroid with index **idx**.
    pub fn centroid(&self, idx: usize) -> &[T] {
        &self.centroids[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }
}




/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the point table you want to cluster. The primitive type
/// of the passed samples array will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure.
///
/// ## Supported variants
/// - Expectation-Maximization k-Means clustering [`KMeans::kmeans_em`]
///
/// ## Supported initialization methods
/// - Random-Range [`KMeans::init_random_range`]
/// - Random-Sample [`KMeans::init_random_sample`]
/// - Precomputed [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    ///
    /// ## Errors
    /// [`KMeansError::Input`] if the table is empty or **samples** is not `sample_cnt * sample_dims` long.
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 || sample_dims == 0 {
            return Err(KMeansError::Input(
                format!("point table must not be empty (got {} samples with {} dimensions)", sample_cnt, sample_dims)));
        }
        if samples.len() != sample_cnt * sample_dims {
            return Err(KMeansError::Input(
                format!("point table is not rectangular: {} values can not be split into {} samples of {} dimensions",
                    samples.len(), sample_cnt, sample_dims)));
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Amount of samples in the point table.
    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    /// Dimensionality of each sample.
    pub fn sample_dims(&self) -> usize { self.sample_dims }
    /// Coordinates of the sample with index **idx**.
    pub fn sample(&self, idx: usize) -> &[T] {
        &self.samples[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }


    /// Assignment (expectation) step: assigns every sample to its nearest centroid and recomputes
    /// the error metric from scratch.
    ///
    /// Ties are resolved in favor of the lowest centroid index, a centroid is only preferred over a
    /// previous one when it is strictly closer. Non-finite centroids are not guarded against, they
    /// propagate into the error metric.
    ///
    /// ## Returns
    /// Amount of samples whose assignment changed.
    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>) -> usize {
        let centroids = &state.centroids;
        let mut reassigned = 0;

        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter_mut())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let (best_idx, best_dist) = centroids.chunks_exact(self.sample_dims)
                    .map(|c| helpers::euclidean_distance(s, c))
                    .enumerate()
                    .fold((0, T::infinity()), |(best_idx, best_dist), (idx, dist)| {
                        if dist < best_dist { (idx, dist) } else { (best_idx, best_dist) }
                    });
                if *assignment != best_idx {
                    reassigned += 1;
                }
                *assignment = best_idx;
                *centroid_dist = best_dist;
            });
        state.distsum = state.centroid_distances.iter().cloned().sum();
        reassigned
    }

    /// Re-evaluates every sample's distance to its currently assigned centroid, without changing any assignment.
    ///
    /// ## Returns
    /// The resulting error metric (also stored in the state).
    #[cfg(test)]
    pub(crate) fn update_centroid_distances(&self, state: &mut KMeansState<T>) -> T {
        let centroids = &state.centroids;
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter().cloned())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let centroid = &centroids[assignment * self.sample_dims..(assignment + 1) * self.sample_dims];
                *centroid_dist = helpers::euclidean_distance(s, centroid);
            });
        state.distsum = state.centroid_distances.iter().cloned().sum();
        state.distsum
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut[usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Update (maximization) step: moves every centroid to the mean of the samples currently assigned to it.
    ///
    /// Centroids of clusters without samples are not touched, they are reported back instead.
    pub(crate) fn update_centroids(&self, state: &mut KMeansState<T>) -> CentroidUpdate {
        let used_centroids_cnt = self.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);

        // Sum all samples in a cluster together into new_centroids
        let mut new_centroids = vec![T::zero();state.centroids.len()];
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                new_centroids.iter_mut().skip(centroid_id * self.sample_dims).take(self.sample_dims)
                    .zip(s.iter())
                    .for_each(|(cv, sv)| *cv += sv);
            });

        state.centroids.chunks_exact_mut(self.sample_dims)
            .zip(new_centroids.chunks_exact(self.sample_dims))
            .zip(state.centroid_frequency.iter().cloned())
            .filter(|(_, cfreq)| *cfreq > 0)
            .for_each(|((c, nc), cfreq)| {
                let cfreq = T::from(cfreq).unwrap();
                c.iter_mut().zip(nc.iter().cloned()).for_each(|(cv, ncv)| *cv = ncv / cfreq);
            });

        if used_centroids_cnt == state.k {
            CentroidUpdate::Updated
        } else {
            CentroidUpdate::EmptyClusters(state.centroid_frequency.iter().enumerate()
                .filter(|&(_, &cfreq)| cfreq == 0)
                .map(|(idx, _)| idx)
                .collect())
        }
    }



    /// Expectation-Maximization k-Means. Alternates the assignment step (every sample is assigned to its
    /// nearest centroid) and the update step (every centroid moves to the mean of its samples), until the
    /// configured [`AbortStrategy`] reports convergence.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for (`1 <= k <= sample_cnt`)
    /// - **max_iter**: Hard limit for the amount of iterations
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result). Its `distsum` and `assignments`
    /// stem from the last assignment step, its `centroids` from the update step that followed it.
    ///
    /// ## Errors
    /// - [`KMeansError::Configuration`] for an invalid **k**, **max_iter** or configuration
    /// - [`KMeansError::DegenerateCluster`] if a cluster runs empty under [`EmptyClusterPolicy::Fail`]
    /// - [`KMeansError::ConvergenceTimeout`] if **max_iter** iterations did not converge
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_em::*;
    /// use rand::prelude::*;
    ///
    /// let samples = vec![0.0f64, 0.0, 0.0, 1.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 11.0, 10.0];
    /// let kmean = KMeans::new(samples, 6, 2).unwrap();
    /// let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(7)).build();
    /// let result = kmean.kmeans_em(2, 100, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// assert_eq!(result.assignments[0], result.assignments[1]);
    /// assert_ne!(result.assignments[0], result.assignments[3]);
    /// ```
    pub fn kmeans_em<'a, F>(&self, k: usize, max_iter: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
                where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        crate::variants::Em::calculate(self, k, max_iter, init, config)
    }

    /// Random-Range initialization method
    ///
    /// ## Description
    /// Every coordinate of every centroid is drawn independently and uniformly from the configured
    /// initialization range (see [`KMeansConfigBuilder::init_range`]), regardless of where the samples lie.
    ///
    /// A centroid drawn far from all samples stays empty. Whether the run still separates all groups
    /// then depends on the seed and on the [`EmptyClusterPolicy`]: with [`EmptyClusterPolicy::KeepCentroid`]
    /// the empty centroid is returned unchanged, [`EmptyClusterPolicy::Reseed`] keeps drawing until it is used.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_range<'a>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'a, T>) -> Result<()> {
        crate::inits::randomrange::calculate(kmean, state, config)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method randomly selects k samples as initial centroids.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample<'a>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'a, T>) -> Result<()> {
        crate::inits::randomsample::calculate(kmean, state, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given centroids [row-major] as initial centroids. Fails with [`KMeansError::Configuration`]
    /// if **centroids** does not contain exactly `k * sample_dims` values.
    pub fn init_precomputed(centroids: Vec<T>) -> impl for<'c> FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        move |kmean, state, _config| {
            crate::inits::precomputed::calculate(kmean, state, centroids)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_shape() {
        assert!(matches!(KMeans::<f64>::new(vec![], 0, 2), Err(KMeansError::Input(_))));
        assert!(matches!(KMeans::<f64>::new(vec![], 3, 0), Err(KMeansError::Input(_))));
        assert!(matches!(KMeans::new(vec![1.0f64, 2.0, 3.0], 2, 2), Err(KMeansError::Input(_))));

        let kmean = KMeans::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
        assert_eq!(kmean.sample_cnt(), 3);
        assert_eq!(kmean.sample_dims(), 2);
        assert_eq!(kmean.sample(1), &[3.0, 4.0]);
    }

    #[test]
    fn config_validation() {
        assert!(KMeansConfig::<f64>::default().validate().is_ok());
        assert!(matches!(KMeansConfig::<f64>::build().init_range(5.0, 5.0).build().validate(),
            Err(KMeansError::Configuration(_))));
        assert!(matches!(KMeansConfig::<f64>::build().init_range(1.0, f64::INFINITY).build().validate(),
            Err(KMeansError::Configuration(_))));
        assert!(matches!(KMeansConfig::<f32>::build().abort_strategy(AbortStrategy::NoImprovement { threshold: 0.0 }).build().validate(),
            Err(KMeansError::Configuration(_))));
    }

    #[test]
    fn random_coordinates_stay_in_range() {
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(3))
            .init_range(-0.5f64, 0.25)
            .build();
        for _ in 0..1000 {
            let v = conf.random_coordinate();
            assert!(v >= -0.5 && v < 0.25, "{} out of range", v);
        }
    }

    #[test]
    fn cluster_assignments() {
        calculate_cluster_assignments_multiplex(1);
        calculate_cluster_assignments_multiplex(2);
        calculate_cluster_assignments_multiplex(3);
        calculate_cluster_assignments_multiplex(17);
    }

    fn calculate_cluster_assignments_multiplex(sample_dims: usize) {
        calculate_cluster_assignments::<f64>(sample_dims, 1e-10f64);
        calculate_cluster_assignments::<f32>(sample_dims, 1e-5f32);
    }

    fn calculate_cluster_assignments<T: Primitive>(sample_dims: usize, max_diff: T) {
        let sample_cnt = 1000;
        let k = 5;

        let mut rnd = StdRng::seed_from_u64(1337);
        let mut samples = vec![T::zero();sample_cnt * sample_dims];
        samples.iter_mut().for_each(|i| *i = rnd.gen_range(T::zero()..T::one()));

        let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();

        let mut state = KMeansState::new(kmean.sample_cnt, kmean.sample_dims, k);
        state.centroids.iter_mut()
            .zip(kmean.samples.iter())
            .for_each(|(c,s)| *c = *s);

        // calculate distances using a plain loop
        let mut should_assignments = state.assignments.clone();
        let mut should_centroid_distances = state.centroid_distances.clone();
        for s in 0..sample_cnt {
            let mut best = (0, T::infinity());
            for c in 0..k {
                let dist = (0..sample_dims)
                    .map(|d| kmean.sample(s)[d] - state.centroid(c)[d])
                    .map(|v| v * v)
                    .fold(T::zero(), |acc, v| acc + v)
                    .sqrt();
                if dist < best.1 {
                    best = (c, dist);
                }
            }
            should_assignments[s] = best.0;
            should_centroid_distances[s] = best.1;
        }

        // the first k samples are the centroids themselves
        let reassigned = kmean.update_cluster_assignments(&mut state);

        for i in 0..should_assignments.len() {
            assert_approx_eq!(state.centroid_distances[i], should_centroid_distances[i], max_diff);
        }
        assert_eq!(state.assignments, should_assignments);
        assert_eq!(reassigned, should_assignments.iter().filter(|&&a| a != 0).count());
        assert_approx_eq!(state.distsum, should_centroid_distances.iter().cloned().sum::<T>(), max_diff * T::from(sample_cnt).unwrap());
        (0..k).for_each(|c| assert_eq!(state.assignments[c], c));
    }

    #[test]
    fn assignment_is_optimal_per_sample() {
        let mut rnd = StdRng::seed_from_u64(99);
        let (sample_cnt, sample_dims, k) = (300, 3, 7);
        let samples: Vec<f64> = (0..sample_cnt * sample_dims).map(|_| rnd.gen_range(-10.0..10.0)).collect();
        let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
        let conf = KMeansConfig::build().random_generator(rnd).build();

        let mut state = KMeansState::new(sample_cnt, sample_dims, k);
        KMeans::init_random_range(&kmean, &mut state, &conf).unwrap();
        kmean.update_cluster_assignments(&mut state);

        for s in 0..sample_cnt {
            let assigned = state.assignments[s];
            let assigned_dist = helpers::euclidean_distance(kmean.sample(s), state.centroid(assigned));
            for c in 0..k {
                let dist = helpers::euclidean_distance(kmean.sample(s), state.centroid(c));
                assert!(assigned_dist <= dist);
                if c < assigned {
                    assert!(assigned_dist < dist, "tie not resolved to lowest index for sample {}", s);
                }
            }
        }
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let kmean = KMeans::new(vec![0.0f64, 0.0, 5.0, 0.0], 2, 2).unwrap();
        let mut state = KMeansState::new(2, 2, 3);
        state.centroids = vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        kmean.update_cluster_assignments(&mut state);
        assert_eq!(state.assignments, vec![0, 0]);
        assert_eq!(state.centroid_distances, vec![1.0, 4.0]);
        assert_eq!(state.distsum, 5.0);

        state.centroids = vec![-1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(kmean.update_cluster_assignments(&mut state), 1);
        assert_eq!(state.assignments, vec![0, 1]);
    }

    #[test]
    fn update_moves_centroids_to_means() {
        let samples = vec![0.0f64, 0.0, 0.0, 1.0, 1.0, 0.0, 10.0, 10.0, 10.0, 11.0, 11.0, 10.0];
        let kmean = KMeans::new(samples, 6, 2).unwrap();
        let mut state = KMeansState::new(6, 2, 2);
        state.assignments = vec![1, 1, 1, 0, 0, 0];

        assert_eq!(kmean.update_centroids(&mut state), CentroidUpdate::Updated);
        assert_eq!(state.centroid_frequency, vec![3, 3]);
        assert_approx_eq!(state.centroid(0)[0], 31.0 / 3.0, 1e-12);
        assert_approx_eq!(state.centroid(0)[1], 31.0 / 3.0, 1e-12);
        assert_approx_eq!(state.centroid(1)[0], 1.0 / 3.0, 1e-12);
        assert_approx_eq!(state.centroid(1)[1], 1.0 / 3.0, 1e-12);
    }

    #[test]
    fn empty_cluster_is_reported_and_untouched() {
        let samples = vec![1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0];
        let kmean = KMeans::new(samples, 3, 2).unwrap();
        let mut state = KMeansState::new(3, 2, 3);
        state.centroids = vec![2.0, 0.0, 1337.0, 0.0, 3.0, 0.0];

        kmean.update_cluster_assignments(&mut state);
        assert_eq!(&state.assignments, &[0, 0, 2]);
        assert_eq!(kmean.update_centroids(&mut state), CentroidUpdate::EmptyClusters(vec![1]));
        assert_eq!(&state.centroids, &[1.5, 0.0, 1337.0, 0.0, 3.0, 0.0]);
        assert_eq!(&state.centroid_frequency, &[2, 0, 1]);
        assert!(state.centroids.iter().all(|c| c.is_finite()));
    }

    #[test] fn error_never_increases_f64() { error_never_increases::<f64>(1e-9); }
    #[test] fn error_never_increases_f32() { error_never_increases::<f32>(1e-3); }

    fn error_never_increases<T: Primitive>(tol: T) {
        let mut rnd = StdRng::seed_from_u64(4242);
        let (sample_cnt, sample_dims, k) = (500, 4, 6);
        let samples: Vec<T> = (0..sample_cnt * sample_dims)
            .map(|_| rnd.gen_range(T::from(-10.0).unwrap()..T::from(10.0).unwrap()))
            .collect();
        let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
        let conf = KMeansConfig::build().random_generator(rnd).build();

        let mut state = KMeansState::new(sample_cnt, sample_dims, k);
        KMeans::init_random_sample(&kmean, &mut state, &conf).unwrap();
        kmean.update_cluster_assignments(&mut state);
        for _ in 0..20 {
            kmean.update_centroids(&mut state);
            let reevaluated = kmean.update_centroid_distances(&mut state);
            kmean.update_cluster_assignments(&mut state);
            assert!(state.distsum <= reevaluated + tol, "{} > {}", state.distsum, reevaluated);
        }
    }
}
