use hex::FromHexError;
use std::io;
use std::string::FromUtf8Error;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data provided is invalid
    BadData(String),
    /// A reader ran past the end of its input
    Truncated,
    /// The script ended in the middle of an operation
    ScriptTooShort,
    /// Script is too large
    ScriptTooLarge,
    /// A pop or peek was attempted beyond the depth of the stack
    StackUnderflow,
    /// The combined stack depth exceeded the limit
    StackOverflow,
    /// A stack element exceeded the element size bound
    ElementTooLarge,
    /// A numeric value did not fit the script number rules
    InvalidNumber,
    /// OP_VERIFY family saw a false value on top of the stack
    VerifyFailed,
    /// OP_RETURN was executed
    EarlyReturn,
    /// Dispatch hit an undefined opcode, the byte is included
    UnknownOpcode(u8),
    /// Dispatch hit a reserved opcode, the byte is included
    ReservedOpcode(u8),
    /// Dispatch hit a disabled opcode, the byte is included
    DisabledOpcode(u8),
    /// A flag-gated strict encoding rule was violated
    MinimalEncoding,
    /// OP_ELSE or OP_ENDIF without OP_IF, or an unterminated conditional
    UnbalancedConditional,
    /// The operation requires a signature checker
    RequiresContext,
    /// The stack was not clean after execution
    CleanStack,
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// secp256k1 library error
    Secp256k1Error(secp256k1::Error),
    /// Standard library IO error
    IOError(io::Error),
    /// String conversion error
    Utf8Error(FromUtf8Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => f.write_str(&format!("Bad argument: {}", s)),
            Error::BadData(s) => f.write_str(&format!("Bad data: {}", s)),
            Error::Truncated => f.write_str("input truncated"),
            Error::ScriptTooShort => f.write_str("script too short"),
            Error::ScriptTooLarge => f.write_str("script too large"),
            Error::StackUnderflow => f.write_str("stack underflow"),
            Error::StackOverflow => f.write_str("stack overflow"),
            Error::ElementTooLarge => f.write_str("stack element too large"),
            Error::InvalidNumber => f.write_str("invalid script number"),
            Error::VerifyFailed => f.write_str("script verify failed"),
            Error::EarlyReturn => f.write_str("script OP_RETURN encountered"),
            Error::UnknownOpcode(op) => f.write_str(&format!("unknown opcode 0x{:02x}", op)),
            Error::ReservedOpcode(op) => f.write_str(&format!("reserved opcode 0x{:02x}", op)),
            Error::DisabledOpcode(op) => f.write_str(&format!("disabled opcode 0x{:02x}", op)),
            Error::MinimalEncoding => f.write_str("strict encoding violation"),
            Error::UnbalancedConditional => f.write_str("script unbalanced conditional"),
            Error::RequiresContext => f.write_str("script requires a signature checker"),
            Error::CleanStack => f.write_str("stack not clean after execution"),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
            Error::Secp256k1Error(e) => f.write_str(&format!("secp256k1 error: {:?}", e)),
            Error::IOError(e) => f.write_str(&format!("IO error: {}", e)),
            Error::Utf8Error(e) => f.write_str(&format!("UTF8 error: {}", e)),
        }
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        // a short read on any of the codec paths is a truncated input, not an IO failure
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::IOError(e)
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Error::Utf8Error(e)
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::Secp256k1Error(e)
    }
}
