//! Execution Strategy Module
//!
//! - Sequential: the functions in `position` (one position at a time)
//! - Parallel: Rayon batch resolution over a shared document

pub mod parallel;

pub use parallel::{encode_parallel, highlight_ids_parallel, resolve_parallel};
