//! Session integration tests
//!
//! The embedder's view of a running game: an engine wrapping the built-in
//! demo module, driven tick by tick until its little story resolves.

mod courtyard;
