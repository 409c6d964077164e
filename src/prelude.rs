//! # nrbf Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! functions from the library. Import this module to get quick access to the
//! essential types for decoding serialization streams.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all decode operations
pub use crate::Error;

/// The result type used throughout the crate
pub use crate::Result;

/// Options controlling a decode
pub use crate::DecodeOptions;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decode a serialization stream into its projected value tree
pub use crate::deserialize;

/// Decode a serialization stream with explicit options
pub use crate::deserialize_with_options;

/// The decoded value tree
pub use crate::Value;

/// Low-level stream cursor
pub use crate::Parser;

// ================================================================================================
// Record Layer
// ================================================================================================

/// The record-stream state machine and decoded object graph
pub use crate::records::{GraphBuilder, ObjectGraph};

/// The format's closed code enumerations
pub use crate::records::{BinaryType, PrimitiveType, RecordType};
