//! Switch input and relay output drivers.

pub mod debounce;
pub mod relay;
