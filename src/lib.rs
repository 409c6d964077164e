// Copyright 2025-2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![deny(unsafe_code)]

//! # nrbf
//!
//! A decoder for the Microsoft .NET Binary Format: Data Structures ([MS-NRBF]), the
//! wire format produced by the .NET Remoting `BinaryFormatter`. Built in pure Rust,
//! `nrbf` reconstructs the object graph serialized into a byte stream and projects it
//! into a plain value tree (maps, arrays, scalars, strings, nulls) suitable for
//! inspection without the .NET runtime.
//!
//! # Architecture
//!
//! The library is organized into layers that compose bottom-up:
//!
//! - **Reader Layer**: Bit-granular, bounds-checked access to the byte stream
//! - **Record Layer**: The record-stream state machine, object table, and deferred
//!   reference resolution
//! - **Projection Layer**: The post-pass that rewrites the decoded graph into the
//!   plain [`Value`] tree, collapsing collection and enum wrapper classes
//!
//! ## Key Components
//!
//! - [`deserialize`] / [`deserialize_with_options`] - Decode a buffered stream
//! - [`Value`] - The decoded value tree
//! - [`crate::records`] - Record parsing and object graph construction
//! - [`Parser`] - Low-level stream cursor for custom record payloads
//! - [`crate::prelude`] - Convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! # Usage Examples
//!
//! ## Quick Start
//!
//! ```rust
//! use nrbf::deserialize;
//!
//! // header, string object id=2 "hello", end
//! let mut data = vec![0x00, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 1, 0, 0, 0, 0, 0, 0, 0];
//! data.extend_from_slice(&[0x06, 2, 0, 0, 0]);
//! data.extend_from_slice(&[0x05, b'h', b'e', b'l', b'l', b'o']);
//! data.push(0x0B);
//!
//! let value = deserialize(&data)?;
//! assert_eq!(value.as_str(), Some("hello"));
//! # Ok::<(), nrbf::Error>(())
//! ```
//!
//! ## Inspecting Decoded Objects
//!
//! Class instances project to name-keyed maps, arrays to ordered sequences:
//!
//! ```rust,no_run
//! use nrbf::{deserialize, Value};
//!
//! # let data: Vec<u8> = vec![];
//! match deserialize(&data)? {
//!     Value::Object(members) => {
//!         for (name, value) in &members {
//!             println!("{name}: {value:?}");
//!         }
//!     }
//!     Value::Array(items) => println!("{} elements", items.len()),
//!     other => println!("scalar root: {other:?}"),
//! }
//! # Ok::<(), nrbf::Error>(())
//! ```
//!
//! # Scope
//!
//! Decode-only: there is no write path. The input is a fully-buffered byte slice;
//! Base64 or file framing around the payload is the caller's concern. Scalars with
//! calendar or precision semantics (`DateTime`, `TimeSpan`, `Decimal`) are surfaced
//! raw, exactly as they appear on the wire.
//!
//! # Standards Compliance
//!
//! The record and type code layout follows the **[MS-NRBF] specification**. Records
//! outside the subset emitted by the common object graph producers (method call
//! records, untyped class records) are rejected as [`Error::UnknownRecord`].
//!
//! ### References
//!
//! - [MS-NRBF](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-nrbf/) - .NET Remoting: Binary Format Data Structure
//!
//! # Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Errors are fatal to the
//! decode; no partial tree is returned:
//!
//! ```rust
//! use nrbf::{deserialize, Error};
//!
//! match deserialize(&[0xFF]) {
//!     Ok(value) => println!("decoded: {:?}", value),
//!     Err(Error::InvalidHeader(tag)) => println!("not a stream, leads with 0x{:02X}", tag),
//!     Err(e) => println!("decode failed: {}", e),
//! }
//! ```
//!
//! # Thread Safety
//!
//! Decoding is synchronous and keeps no shared state; all working tables live for
//! one call. All public types are [`std::marker::Send`] and [`std::marker::Sync`].

#[macro_use]
pub(crate) mod error;
pub(crate) mod projection;
pub(crate) mod reader;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the library, allowing for convenient glob imports.
///
/// # Usage Examples
///
/// ```rust
/// use nrbf::prelude::*;
///
/// let result = deserialize(&[0x0B]);
/// assert!(matches!(result, Err(Error::InvalidHeader(0x0B))));
/// ```
pub mod prelude;

/// Record stream parsing and object graph construction.
///
/// See the [`records`] module documentation for the record layer architecture.
pub mod records;

/// The decoded value tree.
///
/// See [`Value`] for the variants and accessor surface.
pub mod value;

/// `nrbf` Result type.
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`crate::Error`]. This is used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `nrbf` Error type.
///
/// The main error type for all operations in this crate. See [`Error`] for the
/// failure modes a decode can report.
pub use error::Error;

/// Low-level stream cursor.
///
/// [`Parser`] is used internally for record decoding and is exported for advanced
/// users who need to read custom payloads with the format's primitive encodings.
///
/// # Usage Examples
///
/// ```rust
/// use nrbf::Parser;
/// let data = [0x81, 0x02];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_7bit_encoded_len()?, 257);
/// # Ok::<(), nrbf::Error>(())
/// ```
pub use reader::parser::Parser;

/// The decoded value tree type.
pub use value::Value;

/// Options controlling a decode.
///
/// The defaults suit ordinary payloads; [`DecodeOptions::permissive`] raises the
/// projection depth limit for unusually deep object graphs.
///
/// # Usage Examples
///
/// ```rust
/// use nrbf::{deserialize_with_options, DecodeOptions};
///
/// let result = deserialize_with_options(&[], DecodeOptions::permissive());
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of nested objects the projection pass will walk before
    /// failing with [`Error::DepthLimit`]. Guards against cyclic graphs.
    pub max_depth: usize,
}

impl DecodeOptions {
    /// Options with a raised projection depth limit for deeply nested graphs
    #[must_use]
    pub fn permissive() -> Self {
        DecodeOptions { max_depth: 4096 }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions { max_depth: 512 }
    }
}

/// Decode a serialization stream into its projected [`Value`] tree.
///
/// The input must be the raw record stream, fully buffered, starting with the
/// header record tag `0x00` and terminated by a `MessageEnd` record. The returned
/// value is the projection of the stream's root object.
///
/// ## Arguments
/// * 'data' - The raw stream bytes
///
/// # Errors
/// Returns any of the [`Error`] variants; see the [crate documentation](crate)
/// for the error model
pub fn deserialize(data: &[u8]) -> Result<Value> {
    deserialize_with_options(data, DecodeOptions::default())
}

/// Decode a serialization stream with explicit [`DecodeOptions`].
///
/// ## Arguments
/// * 'data' - The raw stream bytes
/// * 'options' - Decode limits
///
/// # Errors
/// Returns any of the [`Error`] variants; see the [crate documentation](crate)
/// for the error model
pub fn deserialize_with_options(data: &[u8], options: DecodeOptions) -> Result<Value> {
    let graph = records::GraphBuilder::new(data)?.run()?;
    projection::project_root(&graph, options.max_depth)
}
