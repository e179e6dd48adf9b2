//! Pointer-driven direct manipulation of layers.

pub(crate) mod gesture;
