//! Values and parsed values.
//!
//! A [`Value`] is a slice plus the encoding that says how to read it. A
//! [`ParseValue`] is a value the parser produced: it additionally carries
//! the name it was parsed under and the token that defined it.

use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, Sign as BigSign};
use num_traits::Signed;

use crate::data::{ByteOrder, Encoding, Sign, Slice};
use crate::token::Token;
use crate::{EngineError, EngineResult};

/// Bytes beyond this count are elided when a value is displayed.
const DISPLAY_BYTES: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    slice: Slice,
    encoding: Encoding,
}

impl Value {
    pub fn new(slice: Slice, encoding: Encoding) -> Self {
        Value { slice, encoding }
    }

    /// A value over a standalone buffer.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>, encoding: Encoding) -> Self {
        Value::new(Slice::from_bytes(bytes), encoding)
    }

    pub fn from_string(text: &str, encoding: Encoding) -> Self {
        Value::from_bytes(encoding.charset.encode(text), encoding)
    }

    /// Encode `number` as minimal big-endian two's complement.
    ///
    /// Under an unsigned encoding a non-negative number loses its leading
    /// sign byte; a negative number is always tagged signed so it reads
    /// back as the same number.
    pub fn from_numeric(number: &BigInt, encoding: Encoding) -> Self {
        let mut bytes = number.to_signed_bytes_be();
        let sign = if number.is_negative() {
            Sign::Signed
        } else {
            if !encoding.is_signed() && bytes.len() > 1 && bytes.first() == Some(&0) {
                bytes.remove(0);
            }
            encoding.sign
        };
        let encoding = encoding
            .with_sign(sign)
            .with_byte_order(ByteOrder::BigEndian);
        Value::from_bytes(bytes, encoding)
    }

    pub fn slice(&self) -> &Slice {
        &self.slice
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.slice.bytes()
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }

    /// The bytes read as a number under this value's sign and byte order.
    pub fn as_numeric(&self) -> BigInt {
        let mut bytes = self.as_bytes().to_vec();
        if self.encoding.byte_order == ByteOrder::LittleEndian {
            bytes.reverse();
        }
        match self.encoding.sign {
            Sign::Signed => BigInt::from_signed_bytes_be(&bytes),
            Sign::Unsigned => BigInt::from_bytes_be(BigSign::Plus, &bytes),
        }
    }

    pub fn as_string(&self) -> String {
        self.encoding.charset.decode(self.as_bytes())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, self.as_bytes())
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for byte in bytes.iter().take(DISPLAY_BYTES) {
        write!(f, "{byte:02x}")?;
    }
    if bytes.len() > DISPLAY_BYTES {
        f.write_str("...")?;
    }
    Ok(())
}

/// A value produced by parsing a [`Token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseValue {
    name: Arc<str>,
    definition: Token,
    value: Value,
}

impl ParseValue {
    pub fn new(name: impl Into<Arc<str>>, definition: Token, value: Value) -> EngineResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        Ok(ParseValue {
            name,
            definition,
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn definition(&self) -> &Token {
        &self.definition
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn matches_name(&self, name: &str) -> bool {
        &*self.name == name
    }

    /// Compares token identity, not structure.
    pub fn matches_definition(&self, definition: &Token) -> bool {
        self.definition == *definition
    }
}

impl fmt::Display for ParseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pval({}:", self.name)?;
        write_hex(f, self.value.as_bytes())?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests;
