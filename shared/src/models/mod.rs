//! Remote table row models
//!
//! Row types for the tables this client reads and writes. The table
//! schemas are owned by the backend; these mirror only the columns the
//! client touches.

pub mod course;
pub mod learning_path;
pub mod profile;
pub mod progress;

// Re-exports
pub use course::*;
pub use learning_path::*;
pub use profile::*;
pub use progress::*;
