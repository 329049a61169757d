pub(crate) mod assemble;
pub mod layouts;
pub(crate) mod spec;
