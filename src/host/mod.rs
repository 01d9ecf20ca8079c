//! Host integration: viewport signals, mounting, and final composition.

pub(crate) mod frame;
pub(crate) mod mount;
pub(crate) mod stack;
pub(crate) mod viewport;
