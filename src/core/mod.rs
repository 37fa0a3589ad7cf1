//! Core markup parsing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: entity decoding with Cow (zero-copy when possible)
//! - Attributes: lenient attribute parsing and extraction

pub mod attributes;
pub mod entities;
pub mod scanner;
