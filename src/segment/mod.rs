//! Foreground/background separation behind a [`adapter::Segmenter`] boundary.

pub(crate) mod adapter;
pub(crate) mod command;
