//! Record stream parsing and object graph construction.
//!
//! This module implements the record layer of the format: the self-describing,
//! interleaved stream in which class metadata, object instances, inline primitive
//! values, nulls, references, and arrays appear in mixed order.
//!
//! # Architecture
//!
//! Parsing is a single forward pass with three pieces of state:
//!
//! - **Object table** - every object the stream defines, keyed by object id
//!   ([`ObjectGraph`])
//! - **Open object stack** - instances whose member slots are still being filled;
//!   the innermost one receives the next member value
//! - **Fix-up queue** - deferred writes recorded by `MemberReference` records and
//!   applied once the stream has been fully consumed, so forward references and
//!   cycles resolve correctly
//!
//! # Key Components
//!
//! - [`GraphBuilder`] - the record-stream state machine
//! - [`ObjectGraph`] - object table, root id, libraries, and stream header
//! - [`ClassDescriptor`] / [`ArrayInfo`] / [`Instance`] - class metadata and objects
//!   under construction
//! - [`RecordType`] / [`PrimitiveType`] / [`BinaryType`] / [`AdditionalInfo`] - the
//!   format's closed code enumerations
//!
//! # Usage Examples
//!
//! ```rust
//! use nrbf::records::GraphBuilder;
//!
//! // header, string object id=2 "hi", end
//! let mut data = vec![0x00, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 1, 0, 0, 0, 0, 0, 0, 0];
//! data.extend_from_slice(&[0x06, 2, 0, 0, 0, 0x02, b'h', b'i', 0x0B]);
//!
//! let graph = GraphBuilder::new(&data)?.run()?;
//! assert_eq!(graph.root(), Some(2));
//! assert_eq!(graph.len(), 1);
//! # Ok::<(), nrbf::Error>(())
//! ```
//!
//! ## Reference
//! * [MS-NRBF] - .NET Remoting: Binary Format Data Structure

pub(crate) mod class;
pub(crate) mod graph;
pub(crate) mod parser;
pub(crate) mod typecodes;

pub use class::{ArrayInfo, ClassDescriptor, Instance, InstanceKind, Library, Slot};
pub use graph::{Node, ObjectGraph};
pub use parser::{GraphBuilder, StreamHeader};
pub use typecodes::{AdditionalInfo, BinaryType, PrimitiveType, RecordType};
