use std::fmt;

use crate::common::{DbError, Result};

use super::DataType;

/// A typed value decoded from or destined for a tuple payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// 32-bit signed integer
    Integer(i32),
    /// Character string for fixed-length char columns
    Char(String),
}

impl Value {
    /// Parses a literal into a value of the given type.
    /// Integer literals that do not parse fail with InvalidLiteral; char
    /// literals are taken as-is, length is enforced at encode time.
    pub fn parse(data_type: &DataType, literal: &str) -> Result<Self> {
        match data_type {
            DataType::Integer => literal
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| DbError::InvalidLiteral(literal.to_string())),
            DataType::Char(_) => Ok(Value::Char(literal.to_string())),
        }
    }

    /// Appends this value's wire bytes to the buffer: integers as 4-byte
    /// little-endian, char values silently truncated or zero-padded to the
    /// column length. The value must have been parsed with the same type.
    pub fn serialize_into(&self, data_type: &DataType, buf: &mut Vec<u8>) {
        match (self, data_type) {
            (Value::Integer(v), DataType::Integer) => buf.extend_from_slice(&v.to_le_bytes()),
            (Value::Char(s), DataType::Char(len)) => {
                let len = *len as usize;
                let bytes = s.as_bytes();
                let take = bytes.len().min(len);
                buf.extend_from_slice(&bytes[..take]);
                buf.resize(buf.len() + (len - take), 0);
            }
            _ => unreachable!("value does not match its column type"),
        }
    }

    /// Reinterprets an exact-width slice as a value of the given type.
    /// Char values have their trailing zero padding trimmed.
    pub fn deserialize(data_type: &DataType, data: &[u8]) -> Self {
        match data_type {
            DataType::Integer => {
                Value::Integer(i32::from_le_bytes([data[0], data[1], data[2], data[3]]))
            }
            DataType::Char(_) => {
                let end = data.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
                Value::Char(String::from_utf8_lossy(&data[..end]).into_owned())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Char(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_roundtrip() {
        let value = Value::parse(&DataType::Integer, "42").unwrap();
        assert_eq!(value, Value::Integer(42));

        let mut buf = Vec::new();
        value.serialize_into(&DataType::Integer, &mut buf);
        assert_eq!(buf, vec![42, 0, 0, 0]);

        assert_eq!(Value::deserialize(&DataType::Integer, &buf), value);
    }

    #[test]
    fn test_integer_negative() {
        let value = Value::parse(&DataType::Integer, "-1").unwrap();

        let mut buf = Vec::new();
        value.serialize_into(&DataType::Integer, &mut buf);
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0xFF]);

        assert_eq!(Value::deserialize(&DataType::Integer, &buf), value);
    }

    #[test]
    fn test_integer_invalid_literal() {
        assert!(matches!(
            Value::parse(&DataType::Integer, "abc"),
            Err(DbError::InvalidLiteral(_))
        ));
        assert!(matches!(
            Value::parse(&DataType::Integer, "12.5"),
            Err(DbError::InvalidLiteral(_))
        ));
    }

    #[test]
    fn test_char_zero_padding() {
        let value = Value::Char("hi".to_string());

        let mut buf = Vec::new();
        value.serialize_into(&DataType::Char(5), &mut buf);
        assert_eq!(buf, vec![b'h', b'i', 0, 0, 0]);

        assert_eq!(
            Value::deserialize(&DataType::Char(5), &buf),
            Value::Char("hi".to_string())
        );
    }

    #[test]
    fn test_char_truncation() {
        let value = Value::Char("alexander".to_string());

        let mut buf = Vec::new();
        value.serialize_into(&DataType::Char(4), &mut buf);
        assert_eq!(buf, b"alex");

        assert_eq!(
            Value::deserialize(&DataType::Char(4), &buf),
            Value::Char("alex".to_string())
        );
    }

    #[test]
    fn test_char_exact_length() {
        let value = Value::Char("abcd".to_string());

        let mut buf = Vec::new();
        value.serialize_into(&DataType::Char(4), &mut buf);
        assert_eq!(buf, b"abcd");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Char("alice".to_string()).to_string(), "alice");
    }
}
