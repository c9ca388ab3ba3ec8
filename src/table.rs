//! Reading point tables from delimited text and writing clustering results.

use crate::{memory::*, KMeans, KMeansError, KMeansState, NameMap, Result};
use csv::{ReaderBuilder, Trim};
use std::{fs::File, io::{self, BufWriter, Write}, path::Path};
use tracing::debug;

/// Loads a point table from the comma separated file at **path**.
///
/// One sample per line, one field per dimension, no header. The dimensionality is taken from the
/// first line. Blank lines are skipped.
///
/// ## Errors
/// [`KMeansError::Input`] if the file does not exist, can not be read, contains no samples, a field
/// is not a number, or a line has a different amount of fields than the first one.
pub fn read_samples<T: Primitive, P: AsRef<Path>>(path: P) -> Result<KMeans<T>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(KMeansError::Input(format!("input file {} not found", path.display())));
    }
    let file = File::open(path)
        .map_err(|e| KMeansError::Input(format!("can not open {}: {}", path.display(), e)))?;
    read_samples_from(file, &path.display().to_string())
}

/// Same as [`read_samples`], reading from an arbitrary reader. **source** names the reader in error messages.
pub fn read_samples_from<T: Primitive, R: io::Read>(reader: R, source: &str) -> Result<KMeans<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut sample_dims = None;
    let mut sample_cnt = 0;
    for record in rdr.records() {
        let record = record.map_err(|e| KMeansError::Input(format!("{}: {}", source, e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let dims = *sample_dims.get_or_insert(record.len());
        if record.len() != dims {
            return Err(KMeansError::Input(format!(
                "{}:{}: expected {} fields like the first line, found {}", source, line, dims, record.len())));
        }
        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<T>().map_err(|_| KMeansError::Input(format!(
                "{}:{}: field {} is not a number: {:?}", source, line, column + 1, field)))?;
            samples.push(value);
        }
        sample_cnt += 1;
    }

    let sample_dims = sample_dims
        .ok_or_else(|| KMeansError::Input(format!("{} contains no samples", source)))?;
    debug!(source, sample_cnt, sample_dims, "loaded point table");
    KMeans::new(samples, sample_cnt, sample_dims)
}

/// Serializes a clustering result: an `error = <distsum>` line with three decimals, followed by
/// the display name of every sample's cluster, one per line, in sample order.
///
/// The output only depends on **state** and **names**, writing the same result twice produces
/// identical bytes.
pub fn format_results<T: Primitive, W: Write>(mut writer: W, state: &KMeansState<T>, names: &NameMap) -> Result<()> {
    if names.k() != state.k {
        return Err(KMeansError::Configuration(format!(
            "cluster count mismatch: result has {} clusters but {} names are given", state.k, names.k())));
    }
    writeln!(writer, "error = {:.3}", state.distsum)?;
    for &assignment in state.assignments.iter() {
        // k matches, every assignment is in [0, k)
        let name = names.name(assignment).ok_or_else(|| KMeansError::Configuration(
            format!("no name for cluster {}", assignment)))?;
        writeln!(writer, "{}", name)?;
    }
    Ok(())
}

/// Writes the result (see [`format_results`]) to the file at **path**, replacing it.
pub fn write_results<T: Primitive, P: AsRef<Path>>(path: P, state: &KMeansState<T>, names: &NameMap) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    format_results(&mut writer, state, names)?;
    writer.flush()?;
    debug!(path = %path.as_ref().display(), rows = state.assignments.len(), "wrote results");
    Ok(())
}
