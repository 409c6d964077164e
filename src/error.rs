use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure mode of a decode is represented here. All errors are fatal to the current
/// decode call; no partial value tree is ever returned.
///
/// # Error Categories
///
/// ## Stream Framing Errors
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::InvalidHeader`] - Input does not start with the serialization header tag
/// - [`Error::TruncatedInput`] - Reader exhausted in the middle of a field
/// - [`Error::MalformedLength`] - Invalid variable-length size prefix
///
/// ## Record Errors
/// - [`Error::UnknownRecord`] - Record tag this decoder does not handle
/// - [`Error::UnsupportedPrimitive`] - Primitive type code with no defined representation
/// - [`Error::Malformed`] - Structurally corrupted record data
///
/// ## Graph Errors
/// - [`Error::DanglingReference`] - Member reference to an object id never defined
/// - [`Error::NoRoot`] - Stream ended without defining a single object
/// - [`Error::DepthLimit`] - Projection exceeded the configured nesting depth
///
/// # Examples
///
/// ```rust
/// use nrbf::{deserialize, Error};
///
/// match deserialize(&[0x0B]) {
///     Ok(value) => println!("decoded: {:?}", value),
///     Err(Error::InvalidHeader(tag)) => eprintln!("not a serialization stream: 0x{:02X}", tag),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("malformed stream: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Provided input was empty.
    ///
    /// This error occurs when an empty buffer is provided where an actual
    /// serialization stream was expected.
    #[error("Provided input was empty")]
    Empty,

    /// The first byte of the input is not the serialization header tag (`0x00`).
    ///
    /// Every valid stream opens with a `SerializedStreamHeader` record. Anything
    /// else is not a serialization stream produced by the binary formatter.
    /// The associated value is the byte that was found instead.
    #[error("Not a valid serialization stream - found leading byte 0x{0:02X}")]
    InvalidHeader(u8),

    /// Encountered a record tag this decoder does not handle.
    ///
    /// This covers both tags that are undefined in [MS-NRBF] and tags that are
    /// defined but not yet implemented here (for example `ClassWithMembers` (0x02),
    /// `SystemClassWithMembers` (0x03), `MemberPrimitiveTyped` (0x08)).
    /// The associated value is the offending tag byte.
    #[error("Unknown record tag - 0x{0:02X}")]
    UnknownRecord(u8),

    /// Encountered a primitive type code with no defined value representation.
    ///
    /// Codes 0 and 4 are unassigned in the primitive type enumeration, and
    /// anything above 18 is out of range. The associated value is the code.
    #[error("Unsupported primitive type code - {0}")]
    UnsupportedPrimitive(u8),

    /// The reader ran out of input in the middle of a field.
    ///
    /// This is a safety check to prevent out of bound reads when decoding
    /// truncated or corrupted streams.
    #[error("Unexpected end of stream")]
    TruncatedInput,

    /// A variable-length size prefix could not be decoded.
    ///
    /// Raised when a 7-bit encoded length does not terminate within five groups,
    /// does not fit in 32 bits, or declares more bytes than the stream holds.
    #[error("Malformed length prefix")]
    MalformedLength,

    /// A member reference named an object id that was never defined.
    ///
    /// References are resolved after the full stream has been consumed; an id
    /// that is still absent from the object table at that point is fatal.
    #[error("Reference to undefined object id - {0}")]
    DanglingReference(u32),

    /// The stream terminated without defining any object.
    ///
    /// The root of the decoded graph is the first object the stream defines.
    /// A stream consisting of only a header and `MessageEnd` has no root to return.
    #[error("Stream ended without a root object")]
    NoRoot,

    /// Projection exceeded the maximum nesting depth allowed.
    ///
    /// Object graphs can contain cycles through member references. The projection
    /// walk is depth-limited so such graphs fail instead of recursing forever.
    /// The associated value shows the limit that was reached.
    #[error("Reached the maximum projection depth allowed - {0}")]
    DepthLimit(usize),

    /// The stream is damaged and could not be parsed.
    ///
    /// This error indicates record data that is structurally inconsistent, such as
    /// invalid type codes, invalid UTF-8 string data, or records appearing where
    /// no open object can receive them. The error includes the source location
    /// where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
