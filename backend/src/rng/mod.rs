//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. CRITICAL: all randomness in the simulator MUST go through
//! this module. The kernel's event ordering is only reproducible if every
//! jittered delay is drawn from a seeded generator.

mod xorshift;

pub use xorshift::RngManager;
