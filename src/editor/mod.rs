//! Property editor: discrete panel inputs mapped onto layer updates.

pub(crate) mod controls;
