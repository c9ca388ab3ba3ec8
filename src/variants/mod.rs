mod em;

pub(crate) use em::Em;
