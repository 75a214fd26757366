//! World simulation integration tests
//!
//! Entity lifecycle, faction checks, damage and death, and trigger volumes
//! driven through whole ticks rather than unit calls.

mod simulation;
