//! Constant evaluation of ALU operations.
//!
//! [`OpCode::evaluate`] computes the result of an operation on compile-time
//! known operands, lane by lane, the way the hardware would. It returns
//! `None` whenever the result cannot be known at compile time; callers leave
//! such operations for runtime execution.
//!
//! Evaluation proceeds in order:
//!
//! 1. A binary operation without a second operand does not fold.
//! 2. Undefined operands produce an undefined result.
//! 3. Non-constant operands (registers) do not fold.
//! 4. Vector-rotation immediates do not fold.
//! 5. Containers with distinct lanes fold lane by lane.
//! 6. Everything else folds as a scalar.
//!
//! The algebraic queries ([`OpCode::left_identity`] and friends) are table
//! lookups used by simplification passes. `None` means no element is known.

use crate::config::Config;
use crate::error::{CompilationError, CompilationStep, Result};
use crate::value::{DataType, Lanes, Literal, LiteralKind, ScalarKind, Value, NATIVE_VECTOR_SIZE};

use super::alu::AluInstruction;
use super::opcode::{OpCode, Pipeline};
use super::pack::{Pack, Unpack};

/// Literal of lane `index`, broadcasting scalars and uniform containers.
fn lane_literal(value: &Value, index: usize) -> Option<Literal> {
    match value {
        Value::Container(lanes, _) if value.has_distinct_lanes() => lanes.get(index).copied(),
        Value::Container(lanes, _) => lanes.first().copied(),
        other => other.literal(),
    }
}

/// Re-tag the bits of `lit` to match the element kind of `ty`.
fn typed_literal(lit: Literal, ty: DataType) -> Literal {
    let bits = lit.unsigned_int();
    let kind = match ty.scalar_kind() {
        _ if ty.is_floating() => LiteralKind::Real,
        ScalarKind::Bool if bits <= 1 => LiteralKind::Bool,
        _ => LiteralKind::Int,
    };
    Literal::from_bits(kind, bits)
}

/// Apply `f` to each of the four byte lanes of two words.
fn bytewise(a: u32, b: u32, f: impl Fn(u32, u32) -> u32) -> u32 {
    (0..4).fold(0, |acc, i| {
        let shift = i * 8;
        acc | (f((a >> shift) & 0xFF, (b >> shift) & 0xFF) & 0xFF) << shift
    })
}

impl OpCode {
    /// Fold the operation over constant operands.
    ///
    /// `second` is required for binary operations and ignored otherwise.
    pub fn evaluate(self, first: &Value, second: Option<&Value>) -> Option<Value> {
        self.evaluate_impl(first, second, false)
    }

    fn evaluate_impl(self, first: &Value, second: Option<&Value>, saturate: bool) -> Option<Value> {
        let second = match (self.operand_count(), second) {
            (2, None) => {
                log::trace!("Cannot fold {}: missing second operand", self);
                return None;
            }
            (2, Some(value)) => Some(value),
            _ => None,
        };
        if self.is_nop() {
            return None;
        }

        if first.is_undefined() || second.is_some_and(Value::is_undefined) {
            return Some(self.undefined_result(first, second));
        }

        if !first.is_constant() || second.is_some_and(|v| !v.is_constant()) {
            log::trace!("Cannot fold {}: operand is not a constant", self);
            return None;
        }
        if first.is_vector_rotation() || second.is_some_and(Value::is_vector_rotation) {
            log::trace!("Cannot fold {}: operand is a vector rotation", self);
            return None;
        }

        let result_type = self.result_type(first, second);
        let bit_count = result_type.scalar_bit_count();

        if first.has_distinct_lanes() || second.is_some_and(Value::has_distinct_lanes) {
            let width = first
                .lane_count()
                .max(second.map_or(1, Value::lane_count));
            if width > NATIVE_VECTOR_SIZE {
                log::trace!("Cannot fold {}: {} lanes exceed the vector size", self, width);
                return None;
            }
            let mut lanes = Lanes::new();
            for index in 0..width {
                let a = lane_literal(first, index)?;
                let b = match second {
                    Some(value) => Some(lane_literal(value, index)?),
                    None => None,
                };
                let lit = self.evaluate_scalar(a, b, bit_count, saturate)?;
                lanes.push(typed_literal(lit, result_type));
            }
            return Some(Value::Container(lanes, result_type));
        }

        let a = lane_literal(first, 0)?;
        let b = match second {
            Some(value) => Some(lane_literal(value, 0)?),
            None => None,
        };
        self.evaluate_scalar(a, b, bit_count, saturate)
            .map(|lit| Value::Literal(typed_literal(lit, result_type), result_type))
    }

    fn undefined_result(self, first: &Value, second: Option<&Value>) -> Value {
        let types_agree = second.map_or(true, |v| v.data_type() == first.data_type());
        if self.accepts_float() == self.returns_float() && types_agree {
            return Value::Undefined;
        }
        let width = first
            .data_type()
            .vector_width()
            .max(second.map_or(1, |v| v.data_type().vector_width()));
        let ty = match self {
            OpCode::Ftoi => DataType::INT32.to_vector(first.data_type().vector_width()),
            OpCode::Itof => DataType::FLOAT.to_vector(first.data_type().vector_width()),
            _ => {
                let known = [Some(first), second]
                    .into_iter()
                    .flatten()
                    .map(Value::data_type)
                    .find(|ty| !ty.is_unknown());
                match known {
                    Some(ty) => ty.to_vector(width),
                    None if self.returns_float() => DataType::FLOAT.to_vector(width),
                    None => DataType::INT32.to_vector(width),
                }
            }
        };
        Value::Placeholder(ty)
    }

    /// Type of a folded result: conversions keep the lane count of their
    /// operand, everything else the wider of the two operand types.
    fn result_type(self, first: &Value, second: Option<&Value>) -> DataType {
        let first_type = first.data_type();
        match self {
            OpCode::Ftoi => return DataType::INT32.to_vector(first_type.vector_width()),
            OpCode::Itof => return DataType::FLOAT.to_vector(first_type.vector_width()),
            _ => {}
        }
        match second.map(Value::data_type) {
            Some(ty)
                if ty.vector_width() > first_type.vector_width() || ty.contains(&first_type) =>
            {
                ty
            }
            _ => first_type,
        }
    }

    fn evaluate_scalar(
        self,
        a: Literal,
        b: Option<Literal>,
        bit_count: u8,
        saturate: bool,
    ) -> Option<Literal> {
        let b = b.unwrap_or(Literal::int(0));
        let (ua, ub) = (a.unsigned_int(), b.unsigned_int());
        let (sa, sb) = (a.signed_int(), b.signed_int());
        let (fa, fb) = (a.real(), b.real());
        let shift = ub & 0x1F;

        let lit = match self {
            OpCode::Nop => return None,
            OpCode::Fadd => Literal::float(fa + fb),
            OpCode::Fsub => Literal::float(fa - fb),
            OpCode::Fmul => Literal::float(fa * fb),
            OpCode::Fmin => Literal::float(fa.min(fb)),
            OpCode::Fmax => Literal::float(fa.max(fb)),
            OpCode::Fminabs => Literal::float(fa.abs().min(fb.abs())),
            OpCode::Fmaxabs => Literal::float(fa.abs().max(fb.abs())),
            OpCode::Ftoi => Literal::int(fa as i32),
            OpCode::Itof => Literal::float(sa as f32),
            OpCode::Add if saturate => Literal::int((sa as i64 + sb as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            OpCode::Sub if saturate => Literal::int((sa as i64 - sb as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            OpCode::Add => Literal::int(sa.wrapping_add(sb)),
            OpCode::Sub => Literal::int(sa.wrapping_sub(sb)),
            OpCode::Shr => Literal::uint(ua >> shift),
            OpCode::Asr => {
                let extended = match bit_count {
                    8 => ua as u8 as i8 as i32,
                    16 => ua as u16 as i16 as i32,
                    _ => sa,
                };
                Literal::int(extended >> shift)
            }
            OpCode::Ror => Literal::uint(ua.rotate_right(shift)),
            OpCode::Shl => Literal::uint(ua << shift),
            OpCode::Min => Literal::int(sa.min(sb)),
            OpCode::Max => Literal::int(sa.max(sb)),
            OpCode::And => Literal::uint(ua & ub),
            OpCode::Or => Literal::uint(ua | ub),
            OpCode::Xor => Literal::uint(ua ^ ub),
            OpCode::Not => Literal::uint(!ua),
            OpCode::Clz => Literal::uint(ua.leading_zeros()),
            OpCode::Mul24 => Literal::uint((ua & 0xFF_FFFF).wrapping_mul(ub & 0xFF_FFFF)),
            OpCode::V8adds => Literal::uint(bytewise(ua, ub, |x, y| (x + y).min(0xFF))),
            OpCode::V8subs => Literal::uint(bytewise(ua, ub, |x, y| x.saturating_sub(y))),
            OpCode::V8min => Literal::uint(bytewise(ua, ub, |x, y| x.min(y))),
            OpCode::V8max => Literal::uint(bytewise(ua, ub, |x, y| x.max(y))),
            OpCode::V8muld => Literal::uint(bytewise(ua, ub, |x, y| (x * y + 127) / 255)),
        };
        Some(lit)
    }

    /// Whether `op(x, x) == x` for all `x`.
    pub const fn is_idempotent(self) -> bool {
        matches!(
            self,
            OpCode::And
                | OpCode::Fmax
                | OpCode::Fmin
                | OpCode::Max
                | OpCode::Min
                | OpCode::Or
                | OpCode::V8max
                | OpCode::V8min
        )
    }

    /// Whether `op(op(a, b), c) == op(a, op(b, c))`.
    pub const fn is_associative(self) -> bool {
        matches!(
            self,
            OpCode::Add
                | OpCode::And
                | OpCode::Fadd
                | OpCode::Fmax
                | OpCode::Fmaxabs
                | OpCode::Fmin
                | OpCode::Fminabs
                | OpCode::Fmul
                | OpCode::Max
                | OpCode::Min
                | OpCode::Mul24
                | OpCode::Or
                | OpCode::V8max
                | OpCode::V8min
                | OpCode::Xor
        )
    }

    /// Whether `op(a, b) == op(b, a)`.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            OpCode::Add
                | OpCode::And
                | OpCode::Fadd
                | OpCode::Fmax
                | OpCode::Fmaxabs
                | OpCode::Fmin
                | OpCode::Fminabs
                | OpCode::Fmul
                | OpCode::Max
                | OpCode::Min
                | OpCode::Mul24
                | OpCode::Or
                | OpCode::V8adds
                | OpCode::V8max
                | OpCode::V8min
                | OpCode::V8muld
                | OpCode::Xor
        )
    }

    /// `e` with `op(e, x) == x`.
    pub fn left_identity(self) -> Option<Value> {
        match self {
            OpCode::Add | OpCode::Or | OpCode::Xor => Some(Value::INT_ZERO),
            OpCode::And => Some(Value::ALL_BITS_SET),
            OpCode::Fadd => Some(Value::FLOAT_ZERO),
            OpCode::Fmul => Some(Value::FLOAT_ONE),
            OpCode::Mul24 => Some(Value::INT_ONE),
            _ => None,
        }
    }

    /// `e` with `op(x, e) == x`.
    pub fn right_identity(self) -> Option<Value> {
        match self {
            OpCode::Asr | OpCode::Ror | OpCode::Shl | OpCode::Shr | OpCode::Sub => {
                Some(Value::INT_ZERO)
            }
            OpCode::Fsub => Some(Value::FLOAT_ZERO),
            other => other.left_identity(),
        }
    }

    /// `a` with `op(a, x) == a`.
    pub fn left_absorbing_element(self) -> Option<Value> {
        match self {
            OpCode::And
            | OpCode::Asr
            | OpCode::Mul24
            | OpCode::Ror
            | OpCode::Shl
            | OpCode::Shr
            | OpCode::V8min
            | OpCode::V8muld => Some(Value::INT_ZERO),
            OpCode::Fmax | OpCode::Fmaxabs => Some(Value::FLOAT_INF),
            OpCode::Fminabs | OpCode::Fmul => Some(Value::FLOAT_ZERO),
            OpCode::Or | OpCode::V8max => Some(Value::ALL_BITS_SET),
            _ => None,
        }
    }

    /// `a` with `op(x, a) == a`.
    pub fn right_absorbing_element(self) -> Option<Value> {
        match self {
            OpCode::Asr | OpCode::Ror | OpCode::Shl | OpCode::Shr => None,
            other => other.left_absorbing_element(),
        }
    }
}

/// Where the pack and unpack units sit in one ALU slot.
///
/// The unpack unit only converts reads of register file A (accumulator 4
/// with the pm bit set) and the pack unit only converts the file-A write
/// (the mul result with the pm bit set). Use
/// [`AluInstruction::slot_packing`] to derive the routing of an encoded
/// instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SlotPacking {
    /// Unpack mode of the instruction.
    pub unpack: Unpack,
    /// Pack mode of the instruction.
    pub pack: Pack,
    /// The first operand is read through the unpack unit.
    pub unpack_first: bool,
    /// The second operand is read through the unpack unit.
    pub unpack_second: bool,
    /// The result is written through the pack unit.
    pub pack_result: bool,
}

impl SlotPacking {
    /// `unpack` on both operands and `pack` on the result.
    pub fn all(unpack: Unpack, pack: Pack) -> Self {
        Self {
            unpack,
            pack,
            unpack_first: true,
            unpack_second: true,
            pack_result: true,
        }
    }
}

/// Folds whole ALU slots, including the pack and unpack units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantFolder {
    widen_saturation: bool,
}

impl Default for ConstantFolder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConstantFolder {
    /// Create a folder.
    ///
    /// With `widen_saturation`, `add` and `sub` followed by 32-bit saturation
    /// are folded through a 64-bit intermediate.
    pub fn new(widen_saturation: bool) -> Self {
        Self { widen_saturation }
    }

    /// Create a folder from the `[fold]` configuration section.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.widen_saturation())
    }

    /// Whether 32-bit saturation of `add`/`sub` is folded.
    #[inline]
    pub fn widen_saturation(&self) -> bool {
        self.widen_saturation
    }

    /// Fold one ALU slot: unpack the routed operands, evaluate, pack the
    /// result if it is routed through the pack unit.
    ///
    /// Undefined operands pass the unpack unit unchanged. Returns `Ok(None)`
    /// when the slot cannot be folded and an error for 32-bit saturation that
    /// cannot be evaluated.
    pub fn fold_slot(
        &self,
        op: OpCode,
        first: &Value,
        second: Option<&Value>,
        packing: SlotPacking,
    ) -> Result<Option<Value>> {
        let unpacked = |value: &Value, routed: bool| {
            if !routed || value.is_undefined() {
                Some(value.clone())
            } else {
                packing.unpack.apply(value)
            }
        };
        let Some(first) = unpacked(first, packing.unpack_first) else {
            log::trace!("Cannot fold {}: first operand cannot be unpacked", op);
            return Ok(None);
        };
        let second = match second {
            Some(value) => match unpacked(value, packing.unpack_second) {
                Some(value) => Some(value),
                None => {
                    log::trace!("Cannot fold {}: second operand cannot be unpacked", op);
                    return Ok(None);
                }
            },
            None => None,
        };

        let pack = if packing.pack_result {
            packing.pack
        } else {
            Pack::nop(packing.pack.is_pm_bit_set())
        };
        if pack == Pack::Sat32 {
            if self.widen_saturation && matches!(op, OpCode::Add | OpCode::Sub) {
                return Ok(op.evaluate_impl(&first, second.as_ref(), true));
            }
            if first.is_constant() && second.as_ref().map_or(true, Value::is_constant) {
                return Err(CompilationError::new(
                    CompilationStep::Optimizer,
                    "32-bit saturation is not implemented for this operation",
                )
                .with_context(op.name()));
            }
        }

        match op.evaluate(&first, second.as_ref()) {
            Some(result) if result.is_undefined() => Ok(Some(result)),
            Some(result) => pack.apply(&result),
            None => Ok(None),
        }
    }

    /// Fold the `pipeline` slot of `instr` with the given operand values.
    pub fn fold_instruction_slot(
        &self,
        instr: &AluInstruction,
        pipeline: Pipeline,
        first: &Value,
        second: Option<&Value>,
    ) -> Result<Option<Value>> {
        let op = match pipeline {
            Pipeline::Add => instr.add_op(),
            Pipeline::Mul => instr.mul_op(),
        };
        self.fold_slot(op, first, second, instr.slot_packing(pipeline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{AluFields, InputMultiplex, WriteSwap};
    use crate::value::{Register, SmallImmediate};

    fn ints(values: &[i32]) -> Value {
        Value::vector(values.iter().copied().map(Literal::int), DataType::INT32)
    }

    #[test]
    fn test_lanewise_add() {
        let result = OpCode::Add.evaluate(&ints(&[1, 2, 3, 4]), Some(&ints(&[10, 20, 30, 40])));
        assert_eq!(result, Some(ints(&[11, 22, 33, 44])));
    }

    #[test]
    fn test_uniform_container_acts_as_scalar() {
        let uniform = OpCode::Add.evaluate(&ints(&[5, 5, 5, 5]), Some(&Value::int(3)));
        assert_eq!(uniform, Some(Value::Literal(Literal::int(8), DataType::INT32.to_vector(4))));
        let scalar = OpCode::Add.evaluate(&Value::int(5), Some(&Value::int(3)));
        assert_eq!(scalar, Some(Value::int(8)));
    }

    #[test]
    fn test_result_keeps_vector_width() {
        let wide = Value::Literal(Literal::int(5), DataType::INT32.to_vector(16));
        let result = OpCode::Add.evaluate(&wide, Some(&Value::int(1))).unwrap();
        assert_eq!(result.data_type(), DataType::INT32.to_vector(16));
        // the wider second operand decides
        let result = OpCode::Add.evaluate(&Value::int(1), Some(&wide)).unwrap();
        assert_eq!(result.data_type(), DataType::INT32.to_vector(16));

        let uniform = ints(&[7, 7, 7, 7]);
        let converted = OpCode::Itof.evaluate(&uniform, None).unwrap();
        assert_eq!(converted, Value::Literal(Literal::float(7.0), DataType::FLOAT.to_vector(4)));
        let undefined = OpCode::Itof.evaluate(&Value::Placeholder(DataType::INT32.to_vector(4)), None);
        assert_eq!(undefined.map(|v| v.data_type()), Some(converted.data_type()));

        let floats = Value::vector([Literal::float(1.5), Literal::float(-2.0)], DataType::FLOAT);
        let truncated = OpCode::Ftoi.evaluate(&floats, None).unwrap();
        assert_eq!(truncated, Value::vector([Literal::int(1), Literal::int(-2)], DataType::INT32));
    }

    #[test]
    fn test_bitwise_op_on_float_keeps_float_type() {
        let abs = OpCode::And.evaluate(&Value::float(-2.0), Some(&Value::int(0x7FFF_FFFF)));
        assert_eq!(abs, Some(Value::float(2.0)));
        let neg = OpCode::Xor.evaluate(&Value::float(1.5), Some(&Value::int(i32::MIN)));
        assert_eq!(neg, Some(Value::float(-1.5)));
    }

    #[test]
    fn test_lane_count_limit() {
        let lanes: Lanes = (0..20).map(Literal::int).collect();
        let oversized = Value::Container(lanes, DataType::INT32.to_vector(16));
        assert_eq!(OpCode::Add.evaluate(&oversized, Some(&Value::int(1))), None);
    }

    #[test]
    fn test_scalar_broadcast() {
        let result = OpCode::Shl.evaluate(&ints(&[1, 2, 3, 4]), Some(&Value::int(4)));
        assert_eq!(result, Some(ints(&[16, 32, 48, 64])));
    }

    #[test]
    fn test_mismatched_lane_counts() {
        assert_eq!(OpCode::Add.evaluate(&ints(&[1, 2]), Some(&ints(&[1, 2, 3, 4]))), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(OpCode::Add.evaluate(&Value::int(1), None), None);
        assert_eq!(OpCode::Not.evaluate(&Value::int(0), None), Some(Value::int(-1)));
        // ignored second operand
        assert_eq!(
            OpCode::Not.evaluate(&Value::int(0), Some(&Value::int(7))),
            Some(Value::int(-1))
        );
        assert_eq!(OpCode::Nop.evaluate(&Value::int(1), None), None);
    }

    #[test]
    fn test_undefined_propagation() {
        assert_eq!(OpCode::Not.evaluate(&Value::Undefined, None), Some(Value::Undefined));
        assert_eq!(
            OpCode::Fadd.evaluate(&Value::Undefined, Some(&Value::Undefined)),
            Some(Value::Undefined)
        );
        // operand types differ
        assert_eq!(
            OpCode::Add.evaluate(&Value::Undefined, Some(&Value::int(1))),
            Some(Value::Placeholder(DataType::INT32))
        );
        // float flags differ
        assert_eq!(
            OpCode::Itof.evaluate(&Value::Placeholder(DataType::INT32.to_vector(4)), None),
            Some(Value::Placeholder(DataType::FLOAT.to_vector(4)))
        );
        assert_eq!(
            OpCode::Ftoi.evaluate(&Value::Undefined, None),
            Some(Value::Placeholder(DataType::INT32))
        );
    }

    #[test]
    fn test_non_constant_refusal() {
        let reg = Value::Register(Register::acc(1), DataType::INT32);
        assert_eq!(OpCode::Add.evaluate(&reg, Some(&Value::int(1))), None);
        assert_eq!(OpCode::Add.evaluate(&Value::int(1), Some(&reg)), None);
    }

    #[test]
    fn test_rotation_refusal() {
        let rot = Value::Immediate(SmallImmediate::vector_rotation(2).unwrap());
        assert_eq!(OpCode::V8min.evaluate(&Value::int(1), Some(&rot)), None);
        let imm = Value::Immediate(SmallImmediate::from_integer(-3).unwrap());
        assert_eq!(OpCode::Add.evaluate(&Value::int(1), Some(&imm)), Some(Value::int(-2)));
    }

    #[test]
    fn test_integer_formulas() {
        let eval = |op: OpCode, a: i32, b: i32| OpCode::evaluate(op, &Value::int(a), Some(&Value::int(b)));
        assert_eq!(eval(OpCode::Add, i32::MAX, 1), Some(Value::int(i32::MIN)));
        assert_eq!(eval(OpCode::Sub, 3, 5), Some(Value::int(-2)));
        assert_eq!(eval(OpCode::Shr, -16, 2), Some(Value::int(0x3FFF_FFFC)));
        assert_eq!(eval(OpCode::Asr, -16, 2), Some(Value::int(-4)));
        assert_eq!(eval(OpCode::Shl, 1, 33), Some(Value::int(2)));
        assert_eq!(eval(OpCode::Ror, 1, 1), Some(Value::int(i32::MIN)));
        assert_eq!(eval(OpCode::Min, -1, 1), Some(Value::int(-1)));
        assert_eq!(eval(OpCode::Max, -1, 1), Some(Value::int(1)));
        assert_eq!(eval(OpCode::And, 0b1100, 0b1010), Some(Value::int(0b1000)));
        assert_eq!(eval(OpCode::Or, 0b1100, 0b1010), Some(Value::int(0b1110)));
        assert_eq!(eval(OpCode::Xor, 0b1100, 0b1010), Some(Value::int(0b0110)));
        assert_eq!(eval(OpCode::Mul24, 0x0100_0003, 5), Some(Value::int(15)));
        assert_eq!(OpCode::Clz.evaluate(&Value::int(1), None), Some(Value::int(31)));
        assert_eq!(OpCode::Clz.evaluate(&Value::int(0), None), Some(Value::int(32)));
    }

    #[test]
    fn test_asr_sign_extends_narrow_types() {
        let byte = Value::Literal(Literal::uint(0x80), DataType::INT8);
        let result = OpCode::Asr.evaluate(&byte, Some(&Value::int(4)));
        assert_eq!(result, Some(Value::Literal(Literal::int(-8), DataType::INT8)));
    }

    #[test]
    fn test_float_formulas() {
        let eval = |op: OpCode, a: f32, b: f32| OpCode::evaluate(op, &Value::float(a), Some(&Value::float(b)));
        assert_eq!(eval(OpCode::Fadd, 1.5, 2.0), Some(Value::float(3.5)));
        assert_eq!(eval(OpCode::Fsub, 1.5, 2.0), Some(Value::float(-0.5)));
        assert_eq!(eval(OpCode::Fmul, 1.5, 2.0), Some(Value::float(3.0)));
        assert_eq!(eval(OpCode::Fmin, -3.0, 2.0), Some(Value::float(-3.0)));
        assert_eq!(eval(OpCode::Fmax, -3.0, 2.0), Some(Value::float(2.0)));
        assert_eq!(eval(OpCode::Fminabs, -3.0, 2.0), Some(Value::float(2.0)));
        assert_eq!(eval(OpCode::Fmaxabs, -3.0, 2.0), Some(Value::float(3.0)));
        assert_eq!(OpCode::Ftoi.evaluate(&Value::float(-2.75), None), Some(Value::int(-2)));
        assert_eq!(OpCode::Itof.evaluate(&Value::int(-7), None), Some(Value::float(-7.0)));
    }

    #[test]
    fn test_byte_formulas() {
        let eval = |op: OpCode, a: u32, b: u32| {
            OpCode::evaluate(op, &Value::int(a as i32), Some(&Value::int(b as i32)))
        };
        assert_eq!(eval(OpCode::V8adds, 0xF0_10_80_01, 0x20_10_90_01), Some(Value::int(0xFF_20_FF_02_u32 as i32)));
        assert_eq!(eval(OpCode::V8subs, 0x10_10_80_01, 0x20_05_90_01), Some(Value::int(0x00_0B_00_00)));
        assert_eq!(eval(OpCode::V8min, 0x01_FF_03_04, 0x02_00_03_01), Some(Value::int(0x01_00_03_01)));
        assert_eq!(eval(OpCode::V8max, 0x01_FF_03_04, 0x02_00_03_01), Some(Value::int(0x02_FF_03_04)));
        assert_eq!(eval(OpCode::V8muld, 0xFF_80_00_FF, 0xFF_80_FF_01), Some(Value::int(0xFF_40_00_01_u32 as i32)));
    }

    #[test]
    fn test_algebra_tables() {
        assert!(OpCode::Min.is_idempotent());
        assert!(!OpCode::Add.is_idempotent());
        assert!(OpCode::Xor.is_associative());
        assert!(!OpCode::V8adds.is_associative());
        assert!(OpCode::V8adds.is_commutative());
        assert!(!OpCode::Sub.is_commutative());

        assert_eq!(OpCode::And.left_identity(), Some(Value::ALL_BITS_SET));
        assert_eq!(OpCode::Fmul.left_identity(), Some(Value::FLOAT_ONE));
        assert_eq!(OpCode::Sub.left_identity(), None);
        assert_eq!(OpCode::Sub.right_identity(), Some(Value::INT_ZERO));
        assert_eq!(OpCode::Fsub.right_identity(), Some(Value::FLOAT_ZERO));
        assert_eq!(OpCode::Add.right_identity(), Some(Value::INT_ZERO));

        assert_eq!(OpCode::Fmax.left_absorbing_element(), Some(Value::FLOAT_INF));
        assert_eq!(OpCode::Shl.left_absorbing_element(), Some(Value::INT_ZERO));
        assert_eq!(OpCode::Shl.right_absorbing_element(), None);
        assert_eq!(OpCode::Or.right_absorbing_element(), Some(Value::ALL_BITS_SET));
        assert_eq!(OpCode::Add.left_absorbing_element(), None);
    }

    #[test]
    fn test_identities_hold() {
        let x = Value::int(0x1234);
        for op in OpCode::ALL {
            if let Some(e) = op.left_identity() {
                let y = if e.data_type().is_floating() { Value::float(3.25) } else { x.clone() };
                assert_eq!(op.evaluate(&e, Some(&y)), Some(y.clone()), "{}", op);
            }
            if let Some(e) = op.right_identity() {
                let y = if e.data_type().is_floating() { Value::float(3.25) } else { x.clone() };
                assert_eq!(op.evaluate(&y, Some(&e)), Some(y.clone()), "{}", op);
            }
        }
    }

    #[test]
    fn test_absorbing_elements_hold() {
        let x = Value::int(0x1234);
        for op in OpCode::ALL {
            if let Some(a) = op.left_absorbing_element() {
                let y = if a.data_type().is_floating() { Value::float(3.25) } else { x.clone() };
                assert_eq!(op.evaluate(&a, Some(&y)), Some(a.clone()), "{}", op);
            }
        }
    }

    #[test]
    fn test_fold_slot_unpack_pack() {
        let folder = ConstantFolder::default();
        // 0x8001 sign-extends to -32767, plus 2, truncated to byte 0
        let result = folder
            .fold_slot(OpCode::Add, &Value::int(0x8001), Some(&Value::int(2)), SlotPacking::all(Unpack::Half16A, Pack::Byte8A))
            .unwrap();
        assert_eq!(result, Some(Value::int(0x03)));

        let reg = Value::Register(Register::file_a(0), DataType::INT32);
        assert_eq!(
            folder.fold_slot(OpCode::Add, &reg, Some(&Value::int(1)), SlotPacking::all(Unpack::Byte8A, Pack::Nop)).unwrap(),
            None
        );
    }

    #[test]
    fn test_fold_slot_routing() {
        let folder = ConstantFolder::default();
        let packing = SlotPacking {
            unpack: Unpack::Byte8A,
            pack: Pack::Byte8A,
            unpack_first: true,
            unpack_second: false,
            pack_result: false,
        };
        let result = folder
            .fold_slot(OpCode::Add, &Value::int(0x1FF), Some(&Value::int(0x100)), packing)
            .unwrap();
        assert_eq!(result, Some(Value::int(0x2FF)));
    }

    #[test]
    fn test_fold_instruction_slot() {
        let folder = ConstantFolder::default();
        // add ra5, ra3, acc1 with byte-0 unpack: only the file-A read is unpacked
        let instr = AluInstruction::new(AluFields {
            op_add: OpCode::Add,
            add_out: 5,
            input_a: 3,
            add_mux_a: InputMultiplex::RegA,
            add_mux_b: InputMultiplex::Acc1,
            unpack: Unpack::Byte8A,
            ..AluFields::default()
        })
        .unwrap();
        let result = folder
            .fold_instruction_slot(&instr, Pipeline::Add, &Value::int(0x1FF), Some(&Value::int(0x100)))
            .unwrap();
        assert_eq!(result, Some(Value::int(0x1FF)));

        // the add result written to file B bypasses the packer
        let swapped = AluInstruction::new(AluFields {
            op_add: OpCode::Add,
            add_out: 5,
            write_swap: WriteSwap::Swap,
            pack: Pack::Byte8A,
            ..AluFields::default()
        })
        .unwrap();
        let result = folder
            .fold_instruction_slot(&swapped, Pipeline::Add, &Value::int(0x1FF), Some(&Value::int(0x100)))
            .unwrap();
        assert_eq!(result, Some(Value::int(0x2FF)));
        let direct = AluInstruction::new(AluFields {
            write_swap: WriteSwap::DontSwap,
            ..*swapped.fields()
        })
        .unwrap();
        let result = folder
            .fold_instruction_slot(&direct, Pipeline::Add, &Value::int(0x1FF), Some(&Value::int(0x100)))
            .unwrap();
        assert_eq!(result, Some(Value::int(0xFF)));
    }

    #[test]
    fn test_fold_slot_saturation() {
        let widening = ConstantFolder::new(true);
        let result = widening
            .fold_slot(OpCode::Add, &Value::int(i32::MAX), Some(&Value::int(5)), SlotPacking::all(Unpack::Nop, Pack::Sat32))
            .unwrap();
        assert_eq!(result, Some(Value::int(i32::MAX)));
        let result = widening
            .fold_slot(OpCode::Sub, &Value::int(i32::MIN), Some(&Value::int(1)), SlotPacking::all(Unpack::Nop, Pack::Sat32))
            .unwrap();
        assert_eq!(result, Some(Value::int(i32::MIN)));

        assert!(widening
            .fold_slot(OpCode::Shl, &Value::int(1), Some(&Value::int(1)), SlotPacking::all(Unpack::Nop, Pack::Sat32))
            .is_err());

        let strict = ConstantFolder::new(false);
        assert!(strict
            .fold_slot(OpCode::Add, &Value::int(1), Some(&Value::int(1)), SlotPacking::all(Unpack::Nop, Pack::Sat32))
            .is_err());
    }

    #[test]
    fn test_fold_slot_undefined() {
        let folder = ConstantFolder::default();
        let result = folder
            .fold_slot(OpCode::Not, &Value::Undefined, None, SlotPacking::all(Unpack::Half16A, Pack::Byte8A))
            .unwrap();
        assert_eq!(result, Some(Value::Undefined));
    }
}
