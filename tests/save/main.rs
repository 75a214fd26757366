//! Save pipeline integration tests
//!
//! Whole saves taken over placed, mid-simulation worlds and restored into
//! prepared ones, exercising capture, the wire format, and reference
//! resolution together.

mod recovery;
