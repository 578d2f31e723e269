//! Protocol decoding modules.
//!
//! Each layer follows the same structure:
//! - `layout`: byte offsets and constants (source of truth)
//! - `reader`: safe byte access and cursor handling
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! `ber` is the length codec shared by `klv` (packet framing) and `uas`
//! (local set records). Everything here is pure and contains no I/O.

pub mod ber;
pub mod common;
pub mod klv;
pub mod uas;
