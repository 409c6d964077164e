//! Closed enumerations of the serialization stream's wire codes.
//!
//! Three tag spaces govern the format, each modeled as a closed enum with its wire
//! discriminant:
//!
//! - [`RecordType`] - the leading tag byte of every record in the stream
//! - [`PrimitiveType`] - scalar value layouts (codes 1..=18, with 0 and 4 unassigned)
//! - [`BinaryType`] - member type classifiers carried by class and array metadata
//!
//! A [`BinaryType`] may be followed on the wire by extra type detail; that payload is
//! decoded into [`AdditionalInfo`] by [`AdditionalInfo::read`].
//!
//! ## Reference
//! * [MS-NRBF] 2.1.2 - Enumerations

use strum::{EnumCount, EnumIter};

use crate::{reader::parser::Parser, Error, Result};

/// Record tags handled by this decoder.
///
/// Each variant's discriminant is the tag byte that introduces the record on the wire.
/// Tags defined by [MS-NRBF] but not listed here (`ClassWithMembers` (0x02),
/// `SystemClassWithMembers` (0x03), `MemberPrimitiveTyped` (0x08), the method call
/// records, and the remaining array shapes) are rejected as
/// [`Error::UnknownRecord`] rather than skipped.
///
/// ## Reference
/// * [MS-NRBF] 2.1.2.1 - RecordTypeEnumeration
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
pub enum RecordType {
    /// `SerializedStreamHeader` (0x00) - Stream header with root id and format version.
    SerializedStreamHeader = 0x00,

    /// `ClassWithId` (0x01) - Instance reusing the class metadata of an earlier object.
    ClassWithId = 0x01,

    /// `SystemClassWithMembersAndTypes` (0x04) - Class instance with inline metadata,
    /// resolved against the system library.
    SystemClassWithMembersAndTypes = 0x04,

    /// `ClassWithMembersAndTypes` (0x05) - Class instance with inline metadata and an
    /// explicit library id.
    ClassWithMembersAndTypes = 0x05,

    /// `BinaryObjectString` (0x06) - A string object with its own id.
    BinaryObjectString = 0x06,

    /// `BinaryArray` (0x07) - General array: any rank, any element type, optional
    /// lower bounds.
    BinaryArray = 0x07,

    /// `MemberReference` (0x09) - Forward or backward reference to another object id.
    MemberReference = 0x09,

    /// `ObjectNull` (0x0A) - A single null member value.
    ObjectNull = 0x0A,

    /// `MessageEnd` (0x0B) - End of the record stream.
    MessageEnd = 0x0B,

    /// `BinaryLibrary` (0x0C) - Library name definition referenced by class metadata.
    BinaryLibrary = 0x0C,

    /// `ObjectNullMultiple256` (0x0D) - A run of up to 255 null member values.
    ObjectNullMultiple256 = 0x0D,

    /// `ArraySinglePrimitive` (0x0F) - Single-dimensional array of one primitive type.
    ArraySinglePrimitive = 0x0F,
}

impl RecordType {
    /// Resolve a record tag byte.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRecord`] for any tag not handled by this decoder
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0x00 => Ok(RecordType::SerializedStreamHeader),
            0x01 => Ok(RecordType::ClassWithId),
            0x04 => Ok(RecordType::SystemClassWithMembersAndTypes),
            0x05 => Ok(RecordType::ClassWithMembersAndTypes),
            0x06 => Ok(RecordType::BinaryObjectString),
            0x07 => Ok(RecordType::BinaryArray),
            0x09 => Ok(RecordType::MemberReference),
            0x0A => Ok(RecordType::ObjectNull),
            0x0B => Ok(RecordType::MessageEnd),
            0x0C => Ok(RecordType::BinaryLibrary),
            0x0D => Ok(RecordType::ObjectNullMultiple256),
            0x0F => Ok(RecordType::ArraySinglePrimitive),
            _ => Err(Error::UnknownRecord(tag)),
        }
    }
}

/// Scalar value layouts.
///
/// The discriminants are the wire codes; 0 and 4 are unassigned and rejected.
/// `Null` and `String` are legal member primitives: a null consumes no data, a
/// string is length-prefixed UTF-8.
///
/// ## Reference
/// * [MS-NRBF] 2.1.2.3 - PrimitiveTypeEnumeration
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
pub enum PrimitiveType {
    /// Boolean (1) - one byte, false=0
    Boolean = 1,
    /// Byte (2) - unsigned 8-bit
    Byte = 2,
    /// Char (3) - a single byte unit
    Char = 3,
    /// Decimal (5) - length-prefixed string
    Decimal = 5,
    /// Double (6) - 64-bit IEEE-754
    Double = 6,
    /// Int16 (7) - signed 16-bit little-endian
    Int16 = 7,
    /// Int32 (8) - signed 32-bit little-endian
    Int32 = 8,
    /// Int64 (9) - signed 64-bit little-endian
    Int64 = 9,
    /// SByte (10) - 7 magnitude bits plus a sign bit
    SByte = 10,
    /// Single (11) - 32-bit IEEE-754
    Single = 11,
    /// TimeSpan (12) - raw 64-bit tick payload
    TimeSpan = 12,
    /// DateTime (13) - raw 64-bit tick payload
    DateTime = 13,
    /// UInt16 (14) - unsigned 16-bit little-endian
    UInt16 = 14,
    /// UInt32 (15) - unsigned 32-bit little-endian
    UInt32 = 15,
    /// UInt64 (16) - unsigned 64-bit little-endian
    UInt64 = 16,
    /// Null (17) - no data
    Null = 17,
    /// String (18) - length-prefixed UTF-8
    String = 18,
}

impl PrimitiveType {
    /// Resolve a primitive type code.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPrimitive`] for codes 0, 4, and anything above 18
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(PrimitiveType::Boolean),
            2 => Ok(PrimitiveType::Byte),
            3 => Ok(PrimitiveType::Char),
            5 => Ok(PrimitiveType::Decimal),
            6 => Ok(PrimitiveType::Double),
            7 => Ok(PrimitiveType::Int16),
            8 => Ok(PrimitiveType::Int32),
            9 => Ok(PrimitiveType::Int64),
            10 => Ok(PrimitiveType::SByte),
            11 => Ok(PrimitiveType::Single),
            12 => Ok(PrimitiveType::TimeSpan),
            13 => Ok(PrimitiveType::DateTime),
            14 => Ok(PrimitiveType::UInt16),
            15 => Ok(PrimitiveType::UInt32),
            16 => Ok(PrimitiveType::UInt64),
            17 => Ok(PrimitiveType::Null),
            18 => Ok(PrimitiveType::String),
            _ => Err(Error::UnsupportedPrimitive(code)),
        }
    }
}

/// Member type classifiers carried by class and array metadata.
///
/// Each member of a class (and the element type of an array) is described by one of
/// these codes, optionally followed by [`AdditionalInfo`] narrowing the type.
///
/// ## Reference
/// * [MS-NRBF] 2.1.2.2 - BinaryTypeEnumeration
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash)]
pub enum BinaryType {
    /// Primitive (0) - inline scalar, the primitive type code follows
    Primitive = 0,
    /// String (1) - introduced by a string or reference record
    String = 1,
    /// Object (2) - any object, no further detail
    Object = 2,
    /// SystemClass (3) - class resolved against the system library, name follows
    SystemClass = 3,
    /// Class (4) - user class, name and library id follow
    Class = 4,
    /// ObjectArray (5) - array of objects
    ObjectArray = 5,
    /// StringArray (6) - array of strings
    StringArray = 6,
    /// PrimitiveArray (7) - array of one primitive type, the type code follows
    PrimitiveArray = 7,
}

impl BinaryType {
    /// Resolve a binary type code.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for codes above 7
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(BinaryType::Primitive),
            1 => Ok(BinaryType::String),
            2 => Ok(BinaryType::Object),
            3 => Ok(BinaryType::SystemClass),
            4 => Ok(BinaryType::Class),
            5 => Ok(BinaryType::ObjectArray),
            6 => Ok(BinaryType::StringArray),
            7 => Ok(BinaryType::PrimitiveArray),
            _ => Err(malformed_error!("Invalid binary type code - {}", code)),
        }
    }
}

/// Extra type detail following a [`BinaryType`] in class or array metadata.
///
/// ## Reference
/// * [MS-NRBF] 2.3.1.2 - MemberTypeInfo
#[derive(Clone, PartialEq, Debug)]
pub enum AdditionalInfo {
    /// Primitive type code for `Primitive` and `PrimitiveArray` members
    Primitive(PrimitiveType),
    /// Class name for `SystemClass` members
    SystemClassName(String),
    /// Class name and library id for `Class` members
    Class {
        /// Name of the class
        name: String,
        /// Id of the library the class resolves against
        library_id: u32,
    },
}

impl AdditionalInfo {
    /// Read the additional info mandated by a binary type, if any.
    ///
    /// `String`, `Object`, `ObjectArray`, and `StringArray` carry none and yield
    /// `Ok(None)`.
    ///
    /// ## Arguments
    /// * 'binary_type' - The member classifier the info belongs to
    /// * 'parser' - The cursor to read from
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPrimitive`] for an invalid primitive code, or the
    /// string errors of [`Parser::read_prefixed_string_utf8`]
    pub fn read(binary_type: BinaryType, parser: &mut Parser) -> Result<Option<Self>> {
        match binary_type {
            BinaryType::Primitive | BinaryType::PrimitiveArray => {
                let code = parser.read_le::<u8>()?;
                Ok(Some(AdditionalInfo::Primitive(PrimitiveType::from_code(
                    code,
                )?)))
            }
            BinaryType::SystemClass => Ok(Some(AdditionalInfo::SystemClassName(
                parser.read_prefixed_string_utf8()?,
            ))),
            BinaryType::Class => {
                let name = parser.read_prefixed_string_utf8()?;
                let library_id = parser.read_le::<u32>()?;
                Ok(Some(AdditionalInfo::Class { name, library_id }))
            }
            BinaryType::String
            | BinaryType::Object
            | BinaryType::ObjectArray
            | BinaryType::StringArray => Ok(None),
        }
    }
}
