//! Shared storage and text helpers for the MedChain contracts.
//!
//! This crate provides:
//! - [`ttl`]: TTL extension for persistent and instance storage.
//! - [`pagination`]: newest-first windows over storage index vectors.
//! - [`sequence`]: append-only lists stored one item per key.
//! - [`text`]: byte-level checks and ASCII case mapping for `soroban_sdk::String`.

#![no_std]

pub mod pagination;
pub mod sequence;
pub mod text;
pub mod ttl;

pub use pagination::*;
pub use sequence::*;
pub use text::*;
pub use ttl::*;
