//! PNG encoding and delivery of the composited image.

pub(crate) mod png;
pub(crate) mod sink;
