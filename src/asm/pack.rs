//! Pack and unpack units.
//!
//! The unpack unit converts an operand read from register file A (or from
//! accumulator 4 when the pm bit is set) before it reaches an ALU. The pack
//! unit converts a result before it is written to register file A (or, with
//! the pm bit set, the mul ALU result in any destination).
//!
//! Both descriptors carry the shared pm bit in their raw encoding, so each
//! unit has two encodings meaning "no conversion":
//!
//! | Unit | Raw encoding | No-op encodings |
//! |------|--------------|-----------------|
//! | Unpack | `(mode << 1) \| pm` | `0`, `1` |
//! | Pack | `(pm << 4) \| mode` | `0x00`, `0x10` |
//!
//! [`Unpack::apply`] and [`Pack::apply`] return `None` when the conversion
//! cannot be evaluated at compile time (non-constant operand, unsupported
//! type). Only 32-bit saturation is a hard error.

use half::f16;

use crate::error::{CompilationError, CompilationStep, Result};
use crate::value::{DataType, Lanes, Literal, Value};

/// Run `convert` over every literal of a constant value.
fn map_literals<F>(value: &Value, result_type: DataType, mut convert: F) -> Result<Option<Value>>
where
    F: FnMut(Literal) -> Result<Option<Literal>>,
{
    match value {
        Value::Container(lanes, _) => {
            let mut converted = Lanes::new();
            for lit in lanes.iter() {
                match convert(*lit)? {
                    Some(out) => converted.push(out),
                    None => return Ok(None),
                }
            }
            Ok(Some(Value::Container(converted, result_type)))
        }
        other => match other.literal() {
            Some(lit) => Ok(convert(lit)?.map(|out| Value::Literal(out, result_type))),
            None => Ok(None),
        },
    }
}

#[inline]
fn byte(bits: u32, index: u32) -> u32 {
    (bits >> (index * 8)) & 0xFF
}

#[inline]
fn replicate_byte(b: u32) -> u32 {
    b << 24 | b << 16 | b << 8 | b
}

#[inline]
fn saturate_u8(bits: u32) -> u32 {
    bits.min(0xFF)
}

#[inline]
fn saturate_i16(value: i32) -> u32 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as u16 as u32
}

/// Unpack mode applied to a register-file-A (or accumulator 4) operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Unpack {
    /// No conversion.
    #[default]
    Nop = 0,
    /// No conversion, pm bit set.
    NopPm = 1,
    /// Sign-extend the low 16 bits.
    Half16A = 2,
    /// Half-float in the low 16 bits of accumulator 4 to float.
    R4Half16A = 3,
    /// Sign-extend the high 16 bits.
    Half16B = 4,
    /// Half-float in the high 16 bits of accumulator 4 to float.
    R4Half16B = 5,
    /// Replicate the low byte into all four bytes.
    Byte8888 = 6,
    /// Replicate the alpha byte of accumulator 4.
    R4AlphaReplicate = 7,
    /// Zero-extend byte 0.
    Byte8A = 8,
    /// Byte 0 of accumulator 4 normalized to [0, 1].
    R4Color0 = 9,
    /// Zero-extend byte 1.
    Byte8B = 10,
    /// Byte 1 of accumulator 4 normalized to [0, 1].
    R4Color1 = 11,
    /// Zero-extend byte 2.
    Byte8C = 12,
    /// Byte 2 of accumulator 4 normalized to [0, 1].
    R4Color2 = 13,
    /// Zero-extend byte 3.
    Byte8D = 14,
    /// Byte 3 of accumulator 4 normalized to [0, 1].
    R4Color3 = 15,
}

impl Unpack {
    const ALL: [Unpack; 16] = [
        Unpack::Nop,
        Unpack::NopPm,
        Unpack::Half16A,
        Unpack::R4Half16A,
        Unpack::Half16B,
        Unpack::R4Half16B,
        Unpack::Byte8888,
        Unpack::R4AlphaReplicate,
        Unpack::Byte8A,
        Unpack::R4Color0,
        Unpack::Byte8B,
        Unpack::R4Color1,
        Unpack::Byte8C,
        Unpack::R4Color2,
        Unpack::Byte8D,
        Unpack::R4Color3,
    ];

    /// Decode `(mode << 1) | pm`.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Self::ALL.get(raw as usize).copied().ok_or_else(|| {
            CompilationError::new(CompilationStep::CodeGeneration, "Unsupported unpack-mode")
                .with_context(raw.to_string())
        })
    }

    /// Raw `(mode << 1) | pm` value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// The 3-bit mode field.
    #[inline]
    pub const fn mode(self) -> u8 {
        self.raw() >> 1
    }

    /// Whether the pm bit is set.
    #[inline]
    pub const fn is_pm_bit_set(self) -> bool {
        self.raw() & 0x1 != 0
    }

    /// Whether this mode converts anything.
    #[inline]
    pub const fn has_effect(self) -> bool {
        !matches!(self, Unpack::Nop | Unpack::NopPm)
    }

    /// The no-op encoding with the given pm bit.
    #[inline]
    pub const fn nop(pm: bool) -> Self {
        if pm {
            Unpack::NopPm
        } else {
            Unpack::Nop
        }
    }

    /// Assembler mnemonic; empty for the no-op encodings.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Unpack::Nop | Unpack::NopPm => "",
            Unpack::Half16A => "sextLow16to32",
            Unpack::R4Half16A => "r4HalfLowToFloat",
            Unpack::Half16B => "sextHigh16to32",
            Unpack::R4Half16B => "r4HalfHighToFloat",
            Unpack::Byte8888 => "replMSB",
            Unpack::R4AlphaReplicate => "r4ReplAlpha",
            Unpack::Byte8A => "zextByte0To32",
            Unpack::R4Color0 => "r4Byte0ToFloat",
            Unpack::Byte8B => "zextByte1To32",
            Unpack::R4Color1 => "r4Byte1ToFloat",
            Unpack::Byte8C => "zextByte2To32",
            Unpack::R4Color2 => "r4Byte2ToFloat",
            Unpack::Byte8D => "zextByte3To32",
            Unpack::R4Color3 => "r4Byte3ToFloat",
        }
    }

    /// Mode widening an integer of `ty`'s element width to 32 bits.
    pub fn unpack_to_32bit(ty: &DataType) -> Result<Self> {
        match ty.scalar_bit_count() {
            bits if bits >= 32 => Ok(Unpack::Nop),
            16 => Ok(Unpack::Half16A),
            8 => Ok(Unpack::Byte8A),
            _ => Err(CompilationError::new(
                CompilationStep::General,
                "Unhandled type-width for unpack-modes",
            )
            .with_context(ty.to_string())),
        }
    }

    /// Evaluate the conversion on a constant.
    pub fn apply(self, value: &Value) -> Option<Value> {
        if !self.has_effect() {
            return Some(value.clone());
        }
        let ty = value.data_type();
        if !ty.is_simple() {
            log::trace!("Cannot unpack value of type {}", ty);
            return None;
        }
        let floating = ty.is_floating();
        // 8-bit modes on floats read the byte as a normalized color
        let mode = match self {
            Unpack::Byte8A if floating => Unpack::R4Color0,
            Unpack::Byte8B if floating => Unpack::R4Color1,
            Unpack::Byte8C if floating => Unpack::R4Color2,
            Unpack::Byte8D if floating => Unpack::R4Color3,
            Unpack::Half16A | Unpack::Half16B if floating => return None,
            other => other,
        };
        let float_type = DataType::FLOAT.to_vector(ty.vector_width());
        let result_type = match mode {
            Unpack::R4Half16A
            | Unpack::R4Half16B
            | Unpack::R4Color0
            | Unpack::R4Color1
            | Unpack::R4Color2
            | Unpack::R4Color3 => float_type,
            _ => ty,
        };
        let converted = map_literals(value, result_type, |lit| {
            let bits = lit.unsigned_int();
            Ok(Some(match mode {
                Unpack::Half16A => Literal::int(bits as u16 as i16 as i32),
                Unpack::Half16B => Literal::int((bits >> 16) as u16 as i16 as i32),
                Unpack::R4Half16A => Literal::float(f16::from_bits(bits as u16).to_f32()),
                Unpack::R4Half16B => Literal::float(f16::from_bits((bits >> 16) as u16).to_f32()),
                Unpack::Byte8888 | Unpack::R4AlphaReplicate => {
                    Literal::uint(replicate_byte(byte(bits, 0)))
                }
                Unpack::Byte8A => Literal::uint(byte(bits, 0)),
                Unpack::Byte8B => Literal::uint(byte(bits, 1)),
                Unpack::Byte8C => Literal::uint(byte(bits, 2)),
                Unpack::Byte8D => Literal::uint(byte(bits, 3)),
                Unpack::R4Color0 => Literal::float(byte(bits, 0) as f32 / 255.0),
                Unpack::R4Color1 => Literal::float(byte(bits, 1) as f32 / 255.0),
                Unpack::R4Color2 => Literal::float(byte(bits, 2) as f32 / 255.0),
                Unpack::R4Color3 => Literal::float(byte(bits, 3) as f32 / 255.0),
                Unpack::Nop | Unpack::NopPm => lit,
            }))
        });
        // the conversion closure never fails
        converted.ok().flatten()
    }
}

/// Pack mode applied to an ALU result before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Pack {
    /// No conversion.
    #[default]
    Nop = 0x00,
    /// Truncate to the low 16 bits.
    Half16A = 0x01,
    /// Truncate into the high 16 bits.
    Half16B = 0x02,
    /// Replicate the low byte into all four bytes.
    Byte8888 = 0x03,
    /// Truncate into byte 0.
    Byte8A = 0x04,
    /// Truncate into byte 1.
    Byte8B = 0x05,
    /// Truncate into byte 2.
    Byte8C = 0x06,
    /// Truncate into byte 3.
    Byte8D = 0x07,
    /// Saturate to 32 bits.
    Sat32 = 0x08,
    /// Signed-saturate into the low 16 bits.
    Half16ASat = 0x09,
    /// Signed-saturate into the high 16 bits.
    Half16BSat = 0x0A,
    /// Unsigned-saturate and replicate into all four bytes.
    Byte8888Sat = 0x0B,
    /// Unsigned-saturate into byte 0.
    Byte8ASat = 0x0C,
    /// Unsigned-saturate into byte 1.
    Byte8BSat = 0x0D,
    /// Unsigned-saturate into byte 2.
    Byte8CSat = 0x0E,
    /// Unsigned-saturate into byte 3.
    Byte8DSat = 0x0F,
    /// No conversion, pm bit set.
    NopPm = 0x10,
    /// Float in [0, 1] scaled to a byte, replicated into all four bytes.
    MulGrayReplicate = 0x13,
    /// Float in [0, 1] scaled into byte 0.
    MulColor0 = 0x14,
    /// Float in [0, 1] scaled into byte 1.
    MulColor1 = 0x15,
    /// Float in [0, 1] scaled into byte 2.
    MulColor2 = 0x16,
    /// Float in [0, 1] scaled into byte 3.
    MulColor3 = 0x17,
}

impl Pack {
    /// Decode `(pm << 4) | mode`.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Ok(match raw {
            0x00 => Pack::Nop,
            0x01 => Pack::Half16A,
            0x02 => Pack::Half16B,
            0x03 => Pack::Byte8888,
            0x04 => Pack::Byte8A,
            0x05 => Pack::Byte8B,
            0x06 => Pack::Byte8C,
            0x07 => Pack::Byte8D,
            0x08 => Pack::Sat32,
            0x09 => Pack::Half16ASat,
            0x0A => Pack::Half16BSat,
            0x0B => Pack::Byte8888Sat,
            0x0C => Pack::Byte8ASat,
            0x0D => Pack::Byte8BSat,
            0x0E => Pack::Byte8CSat,
            0x0F => Pack::Byte8DSat,
            0x10 => Pack::NopPm,
            0x13 => Pack::MulGrayReplicate,
            0x14 => Pack::MulColor0,
            0x15 => Pack::MulColor1,
            0x16 => Pack::MulColor2,
            0x17 => Pack::MulColor3,
            _ => {
                return Err(CompilationError::new(
                    CompilationStep::CodeGeneration,
                    "Unsupported pack-mode",
                )
                .with_context(raw.to_string()))
            }
        })
    }

    /// Raw `(pm << 4) | mode` value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// The 4-bit mode field.
    #[inline]
    pub const fn mode(self) -> u8 {
        self.raw() & 0xF
    }

    /// Whether the pm bit is set.
    #[inline]
    pub const fn is_pm_bit_set(self) -> bool {
        self.raw() & 0x10 != 0
    }

    /// Whether this mode converts anything.
    #[inline]
    pub const fn has_effect(self) -> bool {
        !matches!(self, Pack::Nop | Pack::NopPm)
    }

    /// The no-op encoding with the given pm bit.
    #[inline]
    pub const fn nop(pm: bool) -> Self {
        if pm {
            Pack::NopPm
        } else {
            Pack::Nop
        }
    }

    /// Assembler mnemonic; empty for the no-op encodings.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Pack::Nop | Pack::NopPm => "",
            Pack::Half16A => "trunc32toLow16",
            Pack::Half16ASat => "sat16ToLow16",
            Pack::Half16B => "trunc32ToHigh16",
            Pack::Half16BSat => "sat16ToHigh16",
            Pack::Sat32 => "sat",
            Pack::Byte8888 => "replLSB",
            Pack::Byte8888Sat => "replLSBSat",
            Pack::Byte8A => "truncLSBToByte0",
            Pack::Byte8ASat => "satLSBToByte0",
            Pack::Byte8B => "truncLSBToByte1",
            Pack::Byte8BSat => "satLSBToByte1",
            Pack::Byte8C => "truncLSBToByte2",
            Pack::Byte8CSat => "satLSBToByte2",
            Pack::Byte8D => "truncLSBToByte3",
            Pack::Byte8DSat => "satLSBToByte3",
            Pack::MulGrayReplicate => "mulFloatToReplLSB",
            Pack::MulColor0 => "mulFloatToByte0",
            Pack::MulColor1 => "mulFloatToByte1",
            Pack::MulColor2 => "mulFloatToByte2",
            Pack::MulColor3 => "mulFloatToByte3",
        }
    }

    /// Evaluate the conversion on a constant.
    ///
    /// 32-bit saturation needs the overflow of the operation that produced
    /// the value, which a bare value no longer carries, so [`Pack::Sat32`] is
    /// an error here. See [`crate::asm::ConstantFolder::fold_slot`].
    pub fn apply(self, value: &Value) -> Result<Option<Value>> {
        if !self.has_effect() {
            return Ok(Some(value.clone()));
        }
        let ty = value.data_type();
        if !ty.is_simple() {
            log::trace!("Cannot pack value of type {}", ty);
            return Ok(None);
        }
        let floating = ty.is_floating();
        if floating
            && matches!(
                self,
                Pack::Half16A | Pack::Half16ASat | Pack::Half16B | Pack::Half16BSat
            )
        {
            return Ok(None);
        }
        let result_type = match self {
            Pack::MulGrayReplicate
            | Pack::MulColor0
            | Pack::MulColor1
            | Pack::MulColor2
            | Pack::MulColor3 => DataType::INT32.to_vector(ty.vector_width()),
            _ => ty,
        };
        map_literals(value, result_type, |lit| {
            let bits = lit.unsigned_int();
            let color = || (lit.real() * 255.0) as u32 & 0xFF;
            let packed = match self {
                Pack::Nop | Pack::NopPm => bits,
                Pack::Half16A => bits & 0xFFFF,
                Pack::Half16ASat => saturate_i16(lit.signed_int()),
                Pack::Half16B => (bits & 0xFFFF) << 16,
                Pack::Half16BSat => saturate_i16(lit.signed_int()) << 16,
                Pack::Sat32 => {
                    return Err(CompilationError::new(
                        CompilationStep::General,
                        "32-bit saturation is not implemented",
                    )
                    .with_context(value.to_string()))
                }
                Pack::Byte8888 => replicate_byte(bits & 0xFF),
                Pack::Byte8888Sat => replicate_byte(saturate_u8(bits)),
                Pack::Byte8A => bits & 0xFF,
                Pack::Byte8ASat => saturate_u8(bits),
                Pack::Byte8B => (bits & 0xFF) << 8,
                Pack::Byte8BSat => saturate_u8(bits) << 8,
                Pack::Byte8C => (bits & 0xFF) << 16,
                Pack::Byte8CSat => saturate_u8(bits) << 16,
                Pack::Byte8D => (bits & 0xFF) << 24,
                Pack::Byte8DSat => saturate_u8(bits) << 24,
                Pack::MulGrayReplicate => replicate_byte(color()),
                Pack::MulColor0 => color(),
                Pack::MulColor1 => color() << 8,
                Pack::MulColor2 => color() << 16,
                Pack::MulColor3 => color() << 24,
            };
            Ok(Some(if floating && result_type.is_floating() {
                Literal::from_bits(lit.kind(), packed)
            } else {
                Literal::uint(packed)
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Register, SmallImmediate};

    #[test]
    fn test_nop_encodings() {
        assert!(!Unpack::Nop.has_effect());
        assert!(!Unpack::NopPm.has_effect());
        assert!(Unpack::NopPm.is_pm_bit_set());
        assert!(!Pack::Nop.has_effect());
        assert!(!Pack::NopPm.has_effect());
        assert!(Pack::NopPm.is_pm_bit_set());
        assert_eq!(Pack::nop(true), Pack::NopPm);
        assert_eq!(Unpack::nop(false), Unpack::Nop);

        let reg = Value::Register(Register::file_a(3), DataType::INT32);
        assert_eq!(Unpack::NopPm.apply(&reg), Some(reg.clone()));
        assert_eq!(Pack::NopPm.apply(&reg).unwrap(), Some(reg));
    }

    #[test]
    fn test_raw_encodings() {
        for raw in 0..16 {
            let unpack = Unpack::from_raw(raw).unwrap();
            assert_eq!(unpack.raw(), raw);
            assert_eq!(unpack.is_pm_bit_set(), raw & 1 == 1);
        }
        assert!(Unpack::from_raw(16).is_err());

        assert_eq!(Pack::from_raw(0x14).unwrap(), Pack::MulColor0);
        assert!(Pack::MulColor0.is_pm_bit_set());
        assert_eq!(Pack::MulColor0.mode(), 4);
        assert!(Pack::from_raw(0x11).is_err());
        assert!(Pack::from_raw(0x18).is_err());
    }

    #[test]
    fn test_unpack_half() {
        let v = Value::int(0x8001_7FFF_u32 as i32);
        assert_eq!(Unpack::Half16A.apply(&v), Some(Value::int(0x7FFF)));
        assert_eq!(Unpack::Half16B.apply(&v), Some(Value::int(-32767)));
        assert_eq!(Unpack::Half16A.apply(&Value::float(1.0)), None);
    }

    #[test]
    fn test_unpack_half_float() {
        // 0x3C00 is 1.0 in half precision, 0xC000 is -2.0
        let v = Value::int(0xC000_3C00_u32 as i32);
        assert_eq!(
            Unpack::R4Half16A.apply(&v),
            Some(Value::float(1.0))
        );
        assert_eq!(
            Unpack::R4Half16B.apply(&v),
            Some(Value::float(-2.0))
        );
    }

    #[test]
    fn test_unpack_bytes() {
        let v = Value::int(0x4433_22FF);
        assert_eq!(Unpack::Byte8888.apply(&v), Some(Value::int(-1)));
        assert_eq!(Unpack::Byte8A.apply(&v), Some(Value::int(0xFF)));
        assert_eq!(Unpack::Byte8C.apply(&v), Some(Value::int(0x33)));
        assert_eq!(Unpack::R4Color0.apply(&v), Some(Value::float(1.0)));
        assert_eq!(
            Unpack::R4Color1.apply(&v),
            Some(Value::float(0x22 as f32 / 255.0))
        );
    }

    #[test]
    fn test_unpack_byte_on_float_reads_color() {
        let v = Value::Literal(Literal::uint(0x0000_00FF), DataType::FLOAT);
        assert_eq!(Unpack::Byte8A.apply(&v), Some(Value::float(1.0)));
    }

    #[test]
    fn test_unpack_refusals() {
        let reg = Value::Register(Register::file_a(1), DataType::INT32);
        assert_eq!(Unpack::Half16A.apply(&reg), None);
        assert_eq!(Unpack::Half16A.apply(&Value::Undefined), None);
        let ptr = Value::Literal(Literal::int(4), DataType::INT32.to_pointer());
        assert_eq!(Unpack::Byte8A.apply(&ptr), None);
        let rot = Value::Immediate(SmallImmediate::VECTOR_ROTATE_R5);
        assert_eq!(Unpack::Byte8A.apply(&rot), None);
    }

    #[test]
    fn test_unpack_lanes() {
        let v = Value::vector([0x101, 0x202].map(Literal::int), DataType::INT32);
        let expected = Value::vector([1, 2].map(Literal::int), DataType::INT32);
        assert_eq!(Unpack::Byte8A.apply(&v), Some(expected));
    }

    #[test]
    fn test_unpack_to_32bit() {
        assert_eq!(Unpack::unpack_to_32bit(&DataType::INT32).unwrap(), Unpack::Nop);
        assert_eq!(Unpack::unpack_to_32bit(&DataType::INT16).unwrap(), Unpack::Half16A);
        assert_eq!(Unpack::unpack_to_32bit(&DataType::INT8.to_vector(4)).unwrap(), Unpack::Byte8A);
        assert!(Unpack::unpack_to_32bit(&DataType::BOOL).is_err());
    }

    #[test]
    fn test_pack_half() {
        let v = Value::int(0x0001_2345);
        assert_eq!(Pack::Half16A.apply(&v).unwrap(), Some(Value::int(0x2345)));
        assert_eq!(Pack::Half16B.apply(&v).unwrap(), Some(Value::int(0x2345_0000)));
        assert_eq!(Pack::Half16ASat.apply(&v).unwrap(), Some(Value::int(0x7FFF)));
        assert_eq!(
            Pack::Half16BSat.apply(&Value::int(-100_000)).unwrap(),
            Some(Value::int(0x8000_0000_u32 as i32))
        );
        assert_eq!(Pack::Half16A.apply(&Value::float(2.0)).unwrap(), None);
    }

    #[test]
    fn test_pack_bytes() {
        let v = Value::int(0x1FF);
        assert_eq!(Pack::Byte8A.apply(&v).unwrap(), Some(Value::int(0xFF)));
        assert_eq!(Pack::Byte8B.apply(&Value::int(0x12)).unwrap(), Some(Value::int(0x1200)));
        assert_eq!(Pack::Byte8DSat.apply(&v).unwrap(), Some(Value::int(0xFF00_0000_u32 as i32)));
        assert_eq!(Pack::Byte8888.apply(&Value::int(0x12)).unwrap(), Some(Value::int(0x1212_1212)));
        assert_eq!(Pack::Byte8888Sat.apply(&v).unwrap(), Some(Value::int(-1)));
    }

    #[test]
    fn test_pack_color() {
        let half = Value::float(0.5);
        assert_eq!(Pack::MulColor0.apply(&half).unwrap(), Some(Value::int(127)));
        assert_eq!(Pack::MulColor2.apply(&Value::float(1.0)).unwrap(), Some(Value::int(0xFF_0000)));
        assert_eq!(
            Pack::MulGrayReplicate.apply(&Value::float(1.0)).unwrap(),
            Some(Value::int(-1))
        );
    }

    #[test]
    fn test_pack_sat32_is_error() {
        assert!(Pack::Sat32.apply(&Value::int(5)).is_err());
        // refusal takes precedence over the error for non-constants
        let reg = Value::Register(Register::acc(0), DataType::INT32);
        assert_eq!(Pack::Sat32.apply(&reg).unwrap(), None);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Unpack::Half16A.mnemonic(), "sextLow16to32");
        assert_eq!(Unpack::R4Color3.mnemonic(), "r4Byte3ToFloat");
        assert_eq!(Pack::Sat32.mnemonic(), "sat");
        assert_eq!(Pack::MulGrayReplicate.mnemonic(), "mulFloatToReplLSB");
        assert_eq!(Pack::NopPm.mnemonic(), "");
    }
}
