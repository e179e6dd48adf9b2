//! Source images, the segmented image pair, and font resolution.

pub(crate) mod decode;
pub(crate) mod pair;
pub(crate) mod text;
