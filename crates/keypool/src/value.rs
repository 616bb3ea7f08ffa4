use crate::{Error, Result};
use core::fmt;

/// The identifier's declared runtime type, restricted to the integral family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdType {
    I16,
    I32,
    I64,
}

impl IdType {
    /// Narrows a raw counter value to this type, failing on overflow rather
    /// than wrapping.
    pub fn coerce(self, value: i64) -> Result<IdValue> {
        let overflow = |value| Error::ValueOverflow {
            value,
            target: self,
        };
        match self {
            Self::I16 => i16::try_from(value)
                .map(IdValue::I16)
                .map_err(|_| overflow(value)),
            Self::I32 => i32::try_from(value)
                .map(IdValue::I32)
                .map_err(|_| overflow(value)),
            Self::I64 => Ok(IdValue::I64(value)),
        }
    }
}

/// A generated identifier value, after optimizer transformation and type
/// coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdValue {
    I16(i16),
    I32(i32),
    I64(i64),
}

impl IdValue {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::I16(v) => i64::from(v),
            Self::I32(v) => i64::from(v),
            Self::I64(v) => v,
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_within_range() {
        assert_eq!(IdType::I16.coerce(1000).unwrap(), IdValue::I16(1000));
        assert_eq!(IdType::I32.coerce(1000).unwrap(), IdValue::I32(1000));
        assert_eq!(IdType::I64.coerce(1000).unwrap(), IdValue::I64(1000));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(
            IdType::I16.coerce(40_000),
            Err(Error::ValueOverflow {
                value: 40_000,
                target: IdType::I16,
            })
        ));
        assert!(matches!(
            IdType::I32.coerce(i64::MAX),
            Err(Error::ValueOverflow { .. })
        ));
    }
}
