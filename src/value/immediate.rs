//! Small immediates.
//!
//! When an ALU instruction carries the ALU-immediate signal, the 6-bit
//! register-file-B read address is reinterpreted as one of these encodings:
//!
//! | Raw | Meaning |
//! |-----|---------|
//! | 0..=15 | integer 0..15 |
//! | 16..=31 | integer -16..-1 |
//! | 32..=39 | float 1.0, 2.0, .., 128.0 |
//! | 40..=47 | float 1/256, 1/128, .., 1/2 |
//! | 48 | vector rotation by the amount held in accumulator 5 |
//! | 49..=63 | vector rotation by 1..15 lanes |

use std::fmt;

use super::{DataType, Literal};
use crate::error::{CompilationError, CompilationStep, Result};

/// A 6-bit small-immediate encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SmallImmediate(u8);

impl SmallImmediate {
    /// Rotate by the per-quad amount held in accumulator 5.
    pub const VECTOR_ROTATE_R5: SmallImmediate = SmallImmediate(48);

    const ROTATION_BASE: u8 = 48;
    const MAX: u8 = 63;

    /// Wrap a raw field value.
    pub fn new(raw: u8) -> Result<Self> {
        if raw > Self::MAX {
            return Err(CompilationError::new(
                CompilationStep::CodeGeneration,
                "Small immediate out of range",
            )
            .with_context(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// The raw 6-bit field value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Encoding of an integer constant, if it has one.
    pub fn from_integer(value: i32) -> Option<Self> {
        match value {
            0..=15 => Some(Self(value as u8)),
            -16..=-1 => Some(Self((value + 32) as u8)),
            _ => None,
        }
    }

    /// Encoding of a float constant, if it has one.
    pub fn from_float(value: f32) -> Option<Self> {
        (32..Self::ROTATION_BASE)
            .map(Self)
            .find(|imm| imm.literal().map(Literal::real) == Some(value))
    }

    /// Rotation by a fixed number of lanes (1..=15).
    pub fn vector_rotation(offset: u8) -> Option<Self> {
        match offset {
            1..=15 => Some(Self(Self::ROTATION_BASE + offset)),
            _ => None,
        }
    }

    /// Whether this encodes a vector rotation rather than a constant.
    #[inline]
    pub const fn is_vector_rotation(self) -> bool {
        self.0 >= Self::ROTATION_BASE
    }

    /// Fixed rotation offset; `None` for constants and for the
    /// accumulator-5 rotation.
    pub fn rotation_offset(self) -> Option<u8> {
        (self.0 > Self::ROTATION_BASE).then(|| self.0 - Self::ROTATION_BASE)
    }

    /// The constant this encoding loads; `None` for rotations.
    pub fn literal(self) -> Option<Literal> {
        match self.0 {
            0..=15 => Some(Literal::int(self.0 as i32)),
            16..=31 => Some(Literal::int(self.0 as i32 - 32)),
            32..=39 => Some(Literal::float((1u32 << (self.0 - 32)) as f32)),
            40..=47 => Some(Literal::float(1.0 / (1u32 << (48 - self.0)) as f32)),
            _ => None,
        }
    }

    /// Type of the loaded constant.
    pub fn data_type(self) -> DataType {
        match self.0 {
            32..=47 => DataType::FLOAT,
            _ => DataType::INT32,
        }
    }
}

impl fmt::Display for SmallImmediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::VECTOR_ROTATE_R5 {
            return write!(f, "<< acc5");
        }
        if let Some(offset) = self.rotation_offset() {
            return write!(f, "<< {}", offset);
        }
        match self.literal() {
            Some(lit) => write!(f, "{}", lit),
            None => write!(f, "imm{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_encodings() {
        assert_eq!(SmallImmediate::from_integer(0).map(SmallImmediate::raw), Some(0));
        assert_eq!(SmallImmediate::from_integer(15).map(SmallImmediate::raw), Some(15));
        assert_eq!(SmallImmediate::from_integer(-1).map(SmallImmediate::raw), Some(31));
        assert_eq!(SmallImmediate::from_integer(-16).map(SmallImmediate::raw), Some(16));
        assert_eq!(SmallImmediate::from_integer(16), None);
        assert_eq!(SmallImmediate::from_integer(-17), None);
    }

    #[test]
    fn test_literals() {
        let imm = |raw| SmallImmediate::new(raw).unwrap();
        assert_eq!(imm(7).literal(), Some(Literal::int(7)));
        assert_eq!(imm(20).literal(), Some(Literal::int(-12)));
        assert_eq!(imm(32).literal(), Some(Literal::float(1.0)));
        assert_eq!(imm(39).literal(), Some(Literal::float(128.0)));
        assert_eq!(imm(40).literal(), Some(Literal::float(1.0 / 256.0)));
        assert_eq!(imm(47).literal(), Some(Literal::float(0.5)));
        assert_eq!(imm(48).literal(), None);
        assert_eq!(imm(63).literal(), None);
    }

    #[test]
    fn test_float_encodings() {
        assert_eq!(SmallImmediate::from_float(1.0).map(SmallImmediate::raw), Some(32));
        assert_eq!(SmallImmediate::from_float(0.125).map(SmallImmediate::raw), Some(45));
        assert_eq!(SmallImmediate::from_float(3.0), None);
    }

    #[test]
    fn test_rotations() {
        assert!(SmallImmediate::VECTOR_ROTATE_R5.is_vector_rotation());
        assert_eq!(SmallImmediate::VECTOR_ROTATE_R5.rotation_offset(), None);

        let rot = SmallImmediate::vector_rotation(3).unwrap();
        assert_eq!(rot.raw(), 51);
        assert!(rot.is_vector_rotation());
        assert_eq!(rot.rotation_offset(), Some(3));

        assert_eq!(SmallImmediate::vector_rotation(0), None);
        assert_eq!(SmallImmediate::vector_rotation(16), None);
        assert!(!SmallImmediate::from_integer(3).unwrap().is_vector_rotation());
    }

    #[test]
    fn test_out_of_range() {
        assert!(SmallImmediate::new(63).is_ok());
        assert!(SmallImmediate::new(64).is_err());
    }

    #[test]
    fn test_display() {
        let imm = |raw| SmallImmediate::new(raw).unwrap();
        assert_eq!(imm(3).to_string(), "3");
        assert_eq!(imm(30).to_string(), "-2");
        assert_eq!(imm(34).to_string(), "4.0");
        assert_eq!(imm(45).to_string(), "0.125");
        assert_eq!(imm(48).to_string(), "<< acc5");
        assert_eq!(imm(52).to_string(), "<< 4");
    }
}
