//! Compile-time value model.
//!
//! A [`Value`] is what the optimizer knows about an operand: a typed literal,
//! a fixed-width vector of per-lane literals, a small-immediate encoding, a
//! runtime register (never foldable) or one of two "bits unknown" markers.
//!
//! # Types
//!
//! | Type | Scalar bits | Floating |
//! |------|-------------|----------|
//! | `bool` | 1 | no |
//! | `i8` | 8 | no |
//! | `i16` | 16 | no |
//! | `i32` | 32 | no |
//! | `float` | 32 | yes |
//!
//! Vector types carry 1, 2, 3, 4, 8 or 16 lanes of the same scalar type.

pub mod immediate;
pub mod register;

pub use immediate::SmallImmediate;
pub use register::{Address, Register, RegisterFile};

use std::fmt;

use smallvec::SmallVec;

/// Maximum number of SIMD lanes.
pub const NATIVE_VECTOR_SIZE: usize = 16;

/// Per-lane literals of a vector value.
pub type Lanes = SmallVec<[Literal; NATIVE_VECTOR_SIZE]>;

/// Scalar element kind of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 1-bit boolean.
    Bool,
    /// 8-bit integer.
    Int8,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 32-bit IEEE float.
    Float,
    /// Type not known (e.g. the untyped undefined marker).
    Unknown,
}

impl ScalarKind {
    /// Width of one element in bits.
    pub const fn bit_count(self) -> u8 {
        match self {
            ScalarKind::Bool => 1,
            ScalarKind::Int8 => 8,
            ScalarKind::Int16 => 16,
            ScalarKind::Int32 | ScalarKind::Float => 32,
            ScalarKind::Unknown => 0,
        }
    }
}

/// Scalar bit width and vector width of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    scalar: ScalarKind,
    vector_width: u8,
    pointer: bool,
}

impl DataType {
    /// 1-bit boolean scalar.
    pub const BOOL: DataType = DataType::new(ScalarKind::Bool, 1);
    /// 8-bit integer scalar.
    pub const INT8: DataType = DataType::new(ScalarKind::Int8, 1);
    /// 16-bit integer scalar.
    pub const INT16: DataType = DataType::new(ScalarKind::Int16, 1);
    /// 32-bit integer scalar.
    pub const INT32: DataType = DataType::new(ScalarKind::Int32, 1);
    /// 32-bit float scalar.
    pub const FLOAT: DataType = DataType::new(ScalarKind::Float, 1);
    /// Unknown type.
    pub const UNKNOWN: DataType = DataType::new(ScalarKind::Unknown, 1);

    /// Create a non-pointer type.
    pub const fn new(scalar: ScalarKind, vector_width: u8) -> Self {
        Self {
            scalar,
            vector_width,
            pointer: false,
        }
    }

    /// The element kind.
    #[inline]
    pub const fn scalar_kind(self) -> ScalarKind {
        self.scalar
    }

    /// Bits per element. Pointers are always 32 bits wide.
    #[inline]
    pub const fn scalar_bit_count(self) -> u8 {
        if self.pointer {
            32
        } else {
            self.scalar.bit_count()
        }
    }

    /// Number of lanes.
    #[inline]
    pub const fn vector_width(self) -> u8 {
        self.vector_width
    }

    /// Whether the elements are floating-point values.
    #[inline]
    pub const fn is_floating(self) -> bool {
        !self.pointer && matches!(self.scalar, ScalarKind::Float)
    }

    /// Whether this is a pointer type.
    #[inline]
    pub const fn is_pointer(self) -> bool {
        self.pointer
    }

    /// Whether the type is unknown.
    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self.scalar, ScalarKind::Unknown)
    }

    /// Whether values of this type fit the machine's simple scalar/vector
    /// registers (no pointers, no unknown types, native lane counts).
    pub fn is_simple(self) -> bool {
        !self.pointer
            && !self.is_unknown()
            && matches!(self.vector_width, 1 | 2 | 3 | 4 | 8 | 16)
    }

    /// Same element type with another lane count.
    pub const fn to_vector(self, width: u8) -> Self {
        Self {
            scalar: self.scalar,
            vector_width: width,
            pointer: self.pointer,
        }
    }

    /// Element type of this (vector) type.
    pub const fn element_type(self) -> Self {
        self.to_vector(1)
    }

    /// Pointer to this type.
    pub const fn to_pointer(self) -> Self {
        Self {
            scalar: self.scalar,
            vector_width: 1,
            pointer: true,
        }
    }

    /// Whether a value of `other` fits into this type without loss of lanes.
    pub fn contains(&self, other: &DataType) -> bool {
        self.scalar == other.scalar
            && self.pointer == other.pointer
            && self.vector_width >= other.vector_width
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar = match self.scalar {
            ScalarKind::Bool => "bool",
            ScalarKind::Int8 => "i8",
            ScalarKind::Int16 => "i16",
            ScalarKind::Int32 => "i32",
            ScalarKind::Float => "float",
            ScalarKind::Unknown => "?",
        };
        if self.pointer {
            write!(f, "{}*", scalar)
        } else if self.vector_width > 1 {
            write!(f, "<{} x {}>", self.vector_width, scalar)
        } else {
            write!(f, "{}", scalar)
        }
    }
}

/// How the bits of a [`Literal`] are meant to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Two's complement integer.
    Int,
    /// IEEE 754 single precision.
    Real,
    /// Boolean (0 or 1).
    Bool,
}

/// A 32-bit constant.
///
/// The accessors reinterpret the bit pattern the way the hardware does, so
/// reading a `Real` literal as an integer yields its IEEE bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    kind: LiteralKind,
    bits: u32,
}

impl Literal {
    /// Literal from a raw bit pattern.
    pub const fn from_bits(kind: LiteralKind, bits: u32) -> Self {
        Self { kind, bits }
    }

    /// Signed integer literal.
    pub const fn int(value: i32) -> Self {
        Self::from_bits(LiteralKind::Int, value as u32)
    }

    /// Unsigned integer literal.
    pub const fn uint(value: u32) -> Self {
        Self::from_bits(LiteralKind::Int, value)
    }

    /// Floating-point literal.
    pub fn float(value: f32) -> Self {
        Self::from_bits(LiteralKind::Real, value.to_bits())
    }

    /// Boolean literal.
    pub const fn boolean(value: bool) -> Self {
        Self::from_bits(LiteralKind::Bool, value as u32)
    }

    /// How the bits are meant to be read.
    #[inline]
    pub const fn kind(self) -> LiteralKind {
        self.kind
    }

    /// Bits as a signed integer.
    #[inline]
    pub const fn signed_int(self) -> i32 {
        self.bits as i32
    }

    /// Bits as an unsigned integer.
    #[inline]
    pub const fn unsigned_int(self) -> u32 {
        self.bits
    }

    /// Bits as a float.
    #[inline]
    pub fn real(self) -> f32 {
        f32::from_bits(self.bits)
    }

    /// Whether any bit is set.
    #[inline]
    pub const fn is_true(self) -> bool {
        self.bits != 0
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::int(value)
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Literal::uint(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::boolean(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::Int => write!(f, "{}", self.signed_int()),
            LiteralKind::Real => write!(f, "{:?}", self.real()),
            LiteralKind::Bool => write!(f, "{}", self.is_true()),
        }
    }
}

/// What is known about an operand at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single typed constant.
    Literal(Literal, DataType),
    /// One literal per lane.
    Container(Lanes, DataType),
    /// Small-immediate operand encoding.
    Immediate(SmallImmediate),
    /// Value only known at runtime.
    Register(Register, DataType),
    /// The shared "bits unknown" marker.
    Undefined,
    /// Bits unknown, type known.
    Placeholder(DataType),
}

impl Value {
    /// `0` as `i32`.
    pub const INT_ZERO: Value = Value::Literal(Literal::int(0), DataType::INT32);
    /// `1` as `i32`.
    pub const INT_ONE: Value = Value::Literal(Literal::int(1), DataType::INT32);
    /// `0xFFFF_FFFF` as `i32`.
    pub const ALL_BITS_SET: Value = Value::Literal(Literal::uint(u32::MAX), DataType::INT32);
    /// `0.0` as `float`.
    pub const FLOAT_ZERO: Value =
        Value::Literal(Literal::from_bits(LiteralKind::Real, 0), DataType::FLOAT);
    /// `1.0` as `float`.
    pub const FLOAT_ONE: Value =
        Value::Literal(Literal::from_bits(LiteralKind::Real, 0x3F80_0000), DataType::FLOAT);
    /// `+inf` as `float`.
    pub const FLOAT_INF: Value =
        Value::Literal(Literal::from_bits(LiteralKind::Real, 0x7F80_0000), DataType::FLOAT);

    /// `i32` scalar constant.
    pub fn int(value: i32) -> Self {
        Value::Literal(Literal::int(value), DataType::INT32)
    }

    /// `float` scalar constant.
    pub fn float(value: f32) -> Self {
        Value::Literal(Literal::float(value), DataType::FLOAT)
    }

    /// Vector constant; the type's lane count is taken from `lanes`.
    ///
    /// Lanes past [`NATIVE_VECTOR_SIZE`] are dropped.
    pub fn vector(lanes: impl IntoIterator<Item = Literal>, element: DataType) -> Self {
        let lanes: Lanes = lanes.into_iter().take(NATIVE_VECTOR_SIZE).collect();
        let ty = element.to_vector(lanes.len() as u8);
        Value::Container(lanes, ty)
    }

    /// Type of this value. The untyped undefined marker reports
    /// [`DataType::UNKNOWN`].
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Literal(_, ty)
            | Value::Container(_, ty)
            | Value::Register(_, ty)
            | Value::Placeholder(ty) => *ty,
            Value::Immediate(imm) => imm.data_type(),
            Value::Undefined => DataType::UNKNOWN,
        }
    }

    /// The literal behind a plain literal or a non-rotation immediate.
    pub fn literal(&self) -> Option<Literal> {
        match self {
            Value::Literal(lit, _) => Some(*lit),
            Value::Immediate(imm) => imm.literal(),
            _ => None,
        }
    }

    /// Whether the bits are unknown (either undefined variant).
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined | Value::Placeholder(_))
    }

    /// Whether this is a literal, a lane container or an immediate.
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Value::Literal(..) | Value::Container(..) | Value::Immediate(_)
        )
    }

    /// Whether this is an immediate requesting a vector rotation.
    #[inline]
    pub fn is_vector_rotation(&self) -> bool {
        matches!(self, Value::Immediate(imm) if imm.is_vector_rotation())
    }

    /// Number of lanes held explicitly (1 for non-containers).
    pub fn lane_count(&self) -> usize {
        match self {
            Value::Container(lanes, _) => lanes.len(),
            _ => 1,
        }
    }

    /// Whether a container holds at least two lanes that differ.
    pub fn has_distinct_lanes(&self) -> bool {
        match self {
            Value::Container(lanes, _) => lanes.iter().any(|l| *l != lanes[0]),
            _ => false,
        }
    }

    /// Lane `index` of a container, or the value itself broadcast to every lane.
    pub fn lane(&self, index: usize) -> Option<Value> {
        match self {
            Value::Container(lanes, ty) => lanes
                .get(index)
                .map(|lit| Value::Literal(*lit, ty.element_type())),
            other => Some(other.clone()),
        }
    }

    /// One literal standing in for the whole value: the literal itself, or
    /// the first lane of a container.
    pub fn representative_literal(&self) -> Option<Literal> {
        match self {
            Value::Container(lanes, _) => lanes.first().copied(),
            other => other.literal(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(lit, _) => write!(f, "{}", lit),
            Value::Container(lanes, ty) => {
                write!(f, "{} <", ty)?;
                for (i, lit) in lanes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", lit)?;
                }
                write!(f, ">")
            }
            Value::Immediate(imm) => write!(f, "{}", imm),
            Value::Register(reg, _) => write!(f, "{}", reg),
            Value::Undefined => write!(f, "undefined"),
            Value::Placeholder(ty) => write!(f, "{} undefined", ty),
        }
    }
}
