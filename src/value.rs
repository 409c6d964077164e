//! Value tree produced by decoding a serialization stream.
//!
//! This module defines [`Value`], the language-neutral representation every decode
//! resolves to: scalars at their wire widths, strings, ordered sequences, and
//! name-to-value maps. Scalars are decoded from the record stream by
//! [`Value::read_primitive`], driven by the primitive type codes of [MS-NRBF] 2.1.2.3.
//!
//! A few representations are deliberately raw:
//! - `Decimal` values travel as strings on the wire and are surfaced unparsed.
//! - `DateTime` and `TimeSpan` are surfaced as their raw 64-bit tick payloads;
//!   no calendar conversion is attempted.
//! - `Char` is a single byte unit as written by the formatter.
//!
//! # Examples
//!
//! ```rust
//! use nrbf::{Parser, Value};
//! use nrbf::records::PrimitiveType;
//!
//! let data = [0x2A, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//! let value = Value::read_primitive(PrimitiveType::Int32, &mut parser)?;
//! assert_eq!(value, Value::Int32(42));
//! assert_eq!(value.as_i64(), Some(42));
//! # Ok::<(), nrbf::Error>(())
//! ```

use std::collections::BTreeMap;

use crate::{reader::parser::Parser, records::PrimitiveType, Result};

/// A decoded value from a serialization stream.
///
/// `Value` is the sum of everything the format can express once class metadata has
/// been projected away: nulls, scalars at their native widths, strings, sequences,
/// and string-keyed maps. Maps use [`BTreeMap`] so iteration order is deterministic.
///
/// # Examples
///
/// ```rust
/// use nrbf::Value;
///
/// let value = Value::Array(vec![Value::Int32(1), Value::Null]);
/// let items = value.as_array().unwrap();
/// assert_eq!(items.len(), 2);
/// assert!(items[1].is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value, from a null record or a primitive null member
    Null,
    /// Boolean value, false=0, true=non-zero (primitive type code 1)
    Boolean(bool),
    /// Unsigned 8-bit integer (primitive type code 2)
    Byte(u8),
    /// Character stored as a single byte unit (primitive type code 3)
    Char(u8),
    /// Decimal number carried as its unparsed wire string (primitive type code 5)
    Decimal(String),
    /// 64-bit floating point, little-endian (primitive type code 6)
    Double(f64),
    /// Signed 16-bit integer, little-endian (primitive type code 7)
    Int16(i16),
    /// Signed 32-bit integer, little-endian (primitive type code 8)
    Int32(i32),
    /// Signed 64-bit integer, little-endian (primitive type code 9)
    Int64(i64),
    /// Signed 8-bit integer stored as 7 magnitude bits plus a sign bit (primitive type code 10)
    SByte(i8),
    /// 32-bit floating point, little-endian (primitive type code 11)
    Single(f32),
    /// Time interval as its raw 64-bit tick payload (primitive type code 12)
    TimeSpan(u64),
    /// Point in time as its raw 64-bit tick payload (primitive type code 13)
    DateTime(u64),
    /// Unsigned 16-bit integer, little-endian (primitive type code 14)
    UInt16(u16),
    /// Unsigned 32-bit integer, little-endian (primitive type code 15)
    UInt32(u32),
    /// Unsigned 64-bit integer, little-endian (primitive type code 16)
    UInt64(u64),
    /// Length-prefixed UTF-8 string (primitive type code 18, or a string record)
    String(String),
    /// Ordered sequence of values (any array shape)
    Array(Vec<Value>),
    /// Class instance projected to a name-to-value map
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Decode one scalar of the given primitive type from the stream.
    ///
    /// This is the single place inline member values, array elements, and primitive
    /// array contents are read. `Null` and `String` are valid scalar codes here:
    /// nulls consume no data, strings are length-prefixed UTF-8.
    ///
    /// ## Arguments
    /// * 'primitive' - The primitive type code governing the wire layout
    /// * 'parser' - The cursor to read from
    ///
    /// # Errors
    /// Returns [`TruncatedInput`](crate::Error::TruncatedInput) if the stream ends
    /// mid-value, or the string errors of
    /// [`Parser::read_prefixed_string_utf8`](crate::Parser::read_prefixed_string_utf8)
    pub fn read_primitive(primitive: PrimitiveType, parser: &mut Parser) -> Result<Self> {
        match primitive {
            PrimitiveType::Boolean => Ok(Value::Boolean(parser.read_le::<u8>()? != 0)),
            PrimitiveType::Byte => Ok(Value::Byte(parser.read_le::<u8>()?)),
            PrimitiveType::Char => Ok(Value::Char(parser.read_le::<u8>()?)),
            PrimitiveType::Decimal => Ok(Value::Decimal(parser.read_prefixed_string_utf8()?)),
            PrimitiveType::Double => Ok(Value::Double(parser.read_le::<f64>()?)),
            PrimitiveType::Int16 => Ok(Value::Int16(parser.read_le::<i16>()?)),
            PrimitiveType::Int32 => Ok(Value::Int32(parser.read_le::<i32>()?)),
            PrimitiveType::Int64 => Ok(Value::Int64(parser.read_le::<i64>()?)),
            PrimitiveType::SByte => Ok(Value::SByte(parser.read_sbyte()?)),
            PrimitiveType::Single => Ok(Value::Single(parser.read_le::<f32>()?)),
            PrimitiveType::TimeSpan => Ok(Value::TimeSpan(parser.read_le::<u64>()?)),
            PrimitiveType::DateTime => Ok(Value::DateTime(parser.read_le::<u64>()?)),
            PrimitiveType::UInt16 => Ok(Value::UInt16(parser.read_le::<u16>()?)),
            PrimitiveType::UInt32 => Ok(Value::UInt32(parser.read_le::<u32>()?)),
            PrimitiveType::UInt64 => Ok(Value::UInt64(parser.read_le::<u64>()?)),
            PrimitiveType::Null => Ok(Value::Null),
            PrimitiveType::String => Ok(Value::String(parser.read_prefixed_string_utf8()?)),
        }
    }

    /// Returns the .NET type name for this value.
    ///
    /// Returns `None` for values without a single corresponding .NET scalar type
    /// (`Null`, `Array`, `Object`).
    ///
    /// # Examples
    ///
    /// ```
    /// use nrbf::Value;
    ///
    /// assert_eq!(Value::Int32(42).type_name(), Some("System.Int32"));
    /// assert_eq!(Value::Null.type_name(), None);
    /// ```
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Value::Boolean(_) => Some("System.Boolean"),
            Value::Byte(_) => Some("System.Byte"),
            Value::Char(_) => Some("System.Char"),
            Value::Decimal(_) => Some("System.Decimal"),
            Value::Double(_) => Some("System.Double"),
            Value::Int16(_) => Some("System.Int16"),
            Value::Int32(_) => Some("System.Int32"),
            Value::Int64(_) => Some("System.Int64"),
            Value::SByte(_) => Some("System.SByte"),
            Value::Single(_) => Some("System.Single"),
            Value::TimeSpan(_) => Some("System.TimeSpan"),
            Value::DateTime(_) => Some("System.DateTime"),
            Value::UInt16(_) => Some("System.UInt16"),
            Value::UInt32(_) => Some("System.UInt32"),
            Value::UInt64(_) => Some("System.UInt64"),
            Value::String(_) => Some("System.String"),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns true for `Value::Null`
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean payload, if this is a `Boolean`
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `String`
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value widened to `i64`, for any integer that fits
    ///
    /// Covers the signed widths plus the unsigned widths below 64 bits.
    /// `UInt64` is excluded since it does not always fit.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(value) => Some(i64::from(*value)),
            Value::SByte(value) => Some(i64::from(*value)),
            Value::Int16(value) => Some(i64::from(*value)),
            Value::Int32(value) => Some(i64::from(*value)),
            Value::Int64(value) => Some(*value),
            Value::UInt16(value) => Some(i64::from(*value)),
            Value::UInt32(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    /// Returns the value widened to `u64`, for any unsigned integer
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Byte(value) => Some(u64::from(*value)),
            Value::UInt16(value) => Some(u64::from(*value)),
            Value::UInt32(value) => Some(u64::from(*value)),
            Value::UInt64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value widened to `f64`, if this is a floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Single(value) => Some(f64::from(*value)),
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the element slice, if this is an `Array`
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the member map, if this is an `Object`
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }
}
