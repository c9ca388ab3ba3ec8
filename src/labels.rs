use crate::{KMeansError, Result};

/// Fixed mapping from cluster index to a display name.
///
/// The n-th name belongs to the cluster with index `n`. Used when serializing results only,
/// the calculation itself works on indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameMap {
    names: Vec<String>
}
impl NameMap {
    /// Creates the mapping for **k** clusters.
    ///
    /// ## Errors
    /// [`KMeansError::Configuration`] if not exactly **k** names are given.
    pub fn new<I, S>(k: usize, names: I) -> Result<Self>
            where I: IntoIterator<Item = S>, S: Into<String> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if k == 0 || names.len() != k {
            return Err(KMeansError::Configuration(
                format!("cluster count mismatch: k = {} but {} cluster names given", k, names.len())));
        }
        Ok(Self { names })
    }

    /// Amount of clusters this mapping covers.
    pub fn k(&self) -> usize { self.names.len() }

    /// Display name of **cluster**, `None` if it is out of range.
    pub fn name(&self, cluster: usize) -> Option<&str> {
        self.names.get(cluster).map(String::as_str)
    }
}
