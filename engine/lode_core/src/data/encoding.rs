//! How a value's bytes are interpreted.

use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    #[default]
    Unsigned,
    Signed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// Character set used by [`Value::as_string`](crate::Value::as_string).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    #[default]
    UsAscii,
    Latin1,
    Utf8,
}

impl Charset {
    pub(crate) fn decode(self, bytes: &[u8]) -> String {
        match self {
            // Every byte maps to the code point of the same number.
            Charset::UsAscii | Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub(crate) fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::UsAscii | Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

/// Sign, byte order and character set of a value.
///
/// The default is unsigned, big-endian, US-ASCII.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Encoding {
    pub sign: Sign,
    pub byte_order: ByteOrder,
    pub charset: Charset,
}

impl Encoding {
    pub const fn new(sign: Sign, byte_order: ByteOrder, charset: Charset) -> Self {
        Encoding {
            sign,
            byte_order,
            charset,
        }
    }

    pub fn signed() -> Self {
        Encoding {
            sign: Sign::Signed,
            ..Encoding::default()
        }
    }

    pub fn little_endian() -> Self {
        Encoding {
            byte_order: ByteOrder::LittleEndian,
            ..Encoding::default()
        }
    }

    #[inline]
    pub fn is_signed(&self) -> bool {
        self.sign == Sign::Signed
    }

    #[must_use]
    pub fn with_sign(self, sign: Sign) -> Self {
        Encoding { sign, ..self }
    }

    #[must_use]
    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Encoding { byte_order, ..self }
    }

    #[must_use]
    pub fn with_charset(self, charset: Charset) -> Self {
        Encoding { charset, ..self }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoding({:?},{:?},{:?})", self.sign, self.byte_order, self.charset)
    }
}
