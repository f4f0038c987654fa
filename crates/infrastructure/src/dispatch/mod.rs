//! In-process handler engine.
//!
//! Runs [`Api`] handlers directly in the test process: each dispatch builds a
//! fresh handler, runs `validate` then `process`, and reads back what the
//! handler wrote into its [`ResponseWriter`].

mod api;
mod engine;

pub use api::{Api, ResponseWriter};
pub use engine::InProcessEngine;
