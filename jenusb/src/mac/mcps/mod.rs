//! MAC common part sublayer.

pub mod data;
