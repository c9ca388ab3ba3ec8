pub(crate) mod precomputed;
pub(crate) mod randomrange;
pub(crate) mod randomsample;
