use std::fmt;

/// Logical column type. Both kinds occupy a fixed number of bytes in the
/// tuple wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 32-bit signed integer, little-endian
    Integer,
    /// Fixed-length character string of the given byte length, zero-padded
    Char(u16),
}

impl DataType {
    /// Returns the number of bytes a value of this type occupies.
    pub fn fixed_size(&self) -> usize {
        match self {
            DataType::Integer => 4,
            DataType::Char(len) => *len as usize,
        }
    }

    /// Parses a type name as written in CREATE TABLE, case-insensitively.
    /// Accepts `int` and `char(N)` with N >= 1.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.eq_ignore_ascii_case("int") {
            return Some(DataType::Integer);
        }

        if let Some(prefix) = text.get(..4) {
            if prefix.eq_ignore_ascii_case("char") {
                let rest = text[4..].trim_start();
                let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
                let len: u16 = inner.trim().parse().ok()?;
                if len == 0 {
                    return None;
                }
                return Some(DataType::Char(len));
            }
        }

        None
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INT"),
            DataType::Char(len) => write!(f, "CHAR({})", len),
        }
    }
}
