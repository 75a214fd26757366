//! Cross-layer integration tests for Boreal
//!
//! Engine to walkmesh to save file in one pass: sessions run the demo
//! module, their worlds get captured to bytes, and the bytes rebuild a
//! world that has to match the original.

mod determinism;
mod persistence;
