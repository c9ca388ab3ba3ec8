//! Synthetic point tables: uniformly distributed samples, written in the format [`crate::table`] reads.

use crate::{memory::*, KMeansError, Result};
use csv::WriterBuilder;
use rand::prelude::*;
use std::{io::Write, path::Path};
use tracing::debug;

/// Draws **sample_cnt** samples with **sample_dims** coordinates each, every coordinate uniformly
/// from `[lower, upper)`.
///
/// ## Returns
/// The samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
pub fn generate_samples<T: Primitive, R: Rng + ?Sized>(sample_cnt: usize, sample_dims: usize, lower: T, upper: T, rnd: &mut R) -> Result<Vec<T>> {
    if sample_cnt == 0 || sample_dims == 0 {
        return Err(KMeansError::Configuration(
            format!("can not generate {} samples with {} dimensions", sample_cnt, sample_dims)));
    }
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(KMeansError::Configuration(
            format!("sample range [{}, {}) is empty or not finite", lower, upper)));
    }
    Ok((0..sample_cnt * sample_dims).map(|_| rnd.gen_range(lower..upper)).collect())
}

/// Writes samples as comma separated lines, one sample per line.
pub fn write_samples<T: Primitive, W: Write>(writer: W, samples: &[T], sample_dims: usize) -> Result<()> {
    if sample_dims == 0 || samples.len() % sample_dims != 0 {
        return Err(KMeansError::Configuration(
            format!("{} values can not be split into samples of {} dimensions", samples.len(), sample_dims)));
    }
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .from_writer(writer);
    for sample in samples.chunks_exact(sample_dims) {
        wtr.write_record(sample.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes samples (see [`write_samples`]) to the file at **path**, replacing it.
pub fn write_samples_to_path<T: Primitive, P: AsRef<Path>>(path: P, samples: &[T], sample_dims: usize) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_samples(std::io::BufWriter::new(file), samples, sample_dims)?;
    debug!(path = %path.as_ref().display(), rows = samples.len() / sample_dims, sample_dims, "wrote samples");
    Ok(())
}
