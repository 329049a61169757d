pub(crate) mod aggregate;
pub(crate) mod counter;
pub(crate) mod rank;
