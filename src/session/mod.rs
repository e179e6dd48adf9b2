//! Upload, processing and editing phases around one segmentation job at a time.

pub(crate) mod state;
