//! EduDB Bootstrap Library
//!
//! Document schemas for the educational platform's MongoDB catalog, an
//! in-process evaluator for them, and the one-shot bootstrap that provisions
//! the application account and the validated collections.

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod schema;
