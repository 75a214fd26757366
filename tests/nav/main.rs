//! Spatial query integration tests
//!
//! Composite scenes closer to shipped area geometry than the unit fixtures:
//! stacked stories, screen walls, ramps, and hazard pools.

mod queries;
