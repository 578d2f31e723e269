//! Helpers shared by the KLV framing and local set layers.

pub mod hex;
pub(crate) mod reader;
