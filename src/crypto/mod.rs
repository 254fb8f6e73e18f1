//! Cryptography module - SHA-256 hashing and canonical serialization

mod hash;

pub use hash::*;
