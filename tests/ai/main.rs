//! Behavior engine integration tests
//!
//! Full controller arcs over live worlds: sensing through area geometry,
//! hostile engagement, and idle routines, each driven tick by tick.

mod encounters;
mod routines;
