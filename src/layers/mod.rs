//! Layer store: the text layer model and the ordered, selectable collection.

pub(crate) mod model;
pub(crate) mod store;
