//! Error types shared by every codec.

use std::fmt;

use thiserror::Error;

/// Parity class of an edge: the degree parities of its two endpoints.
///
/// The discriminant is the 2-bit symbol the class carries
/// (high bit = source parity, low bit = target parity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParityClass {
    /// even-even, symbol `00`
    EE = 0,
    /// even-odd, symbol `01`
    EO = 1,
    /// odd-even, symbol `10`
    OE = 2,
    /// odd-odd, symbol `11`
    OO = 3,
}

impl ParityClass {
    /// All four classes in symbol order.
    pub const ALL: [ParityClass; 4] = [Self::EE, Self::EO, Self::OE, Self::OO];

    /// Returns the class for a 2-bit symbol (only the two low bits are used).
    pub fn from_symbol(symbol: u8) -> Self {
        Self::ALL[(symbol & 0b11) as usize]
    }

    /// Returns the 2-bit symbol carried by this class.
    pub fn symbol(self) -> u8 {
        self as u8
    }

    /// Lowercase name, used for statistics keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EE => "ee",
            Self::EO => "eo",
            Self::OE => "oe",
            Self::OO => "oo",
        }
    }
}

impl fmt::Display for ParityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EE => "EE",
            Self::EO => "EO",
            Self::OE => "OE",
            Self::OO => "OO",
        };
        f.write_str(name)
    }
}

/// The resource an encoder ran out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// A parity bucket of the bit codec.
    Parity(ParityClass),
    /// A modulo-256 bucket of the byte codec.
    ModSum(u8),
    /// The length field of a header.
    Header,
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parity(class) => write!(f, "{class}"),
            Self::ModSum(value) => write!(f, "{value}"),
            Self::Header => f.write_str("header"),
        }
    }
}

/// Errors that can occur while encoding or decoding a stego network.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Not enough {class}-class capacity: need {required}, have {available}")]
    Capacity {
        /// Bucket (or header field) that ran out.
        class: SymbolClass,
        /// Units the payload needs from it.
        required: u64,
        /// Units it can supply.
        available: u64,
    },

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Inconsistent graph: {0}")]
    InconsistentGraph(String),

    #[error("Edge synthesis failed: {0}")]
    Synthesis(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Line {line}: {reason}")]
    FileFormat { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StegoError>;
