//! Input/output operations, configuration and error handling

/// Command-line interface
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Feature-vector dumping and numeric text input
pub mod features;
/// Image decoding and canvas export
pub mod image;
/// Progress display
pub mod progress;
