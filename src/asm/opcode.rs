//! ALU operation registry.
//!
//! Every operation either pipeline can execute, with the hardware encoding it
//! has on each pipeline. Index 0 is the no-op on both tables.
//!
//! | Group | Add pipeline | Mul pipeline |
//! |-------|--------------|--------------|
//! | Float arithmetic | fadd fsub fmin fmax fminabs fmaxabs | fmul |
//! | Conversion | ftoi itof | - |
//! | Integer arithmetic | add sub min max | mul24 |
//! | Shifts | shr asr ror shl | - |
//! | Logic | and or xor not clz | - |
//! | Packed bytes | v8adds v8subs | v8adds v8subs v8muld v8min v8max |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{CompilationError, CompilationStep, Result};

/// Execution pipeline of an ALU slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    /// The add ALU.
    Add,
    /// The multiply ALU.
    Mul,
}

/// A hardware ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// No operation (valid on both pipelines).
    Nop,
    /// Float add.
    Fadd,
    /// Float subtract.
    Fsub,
    /// Float minimum.
    Fmin,
    /// Float maximum.
    Fmax,
    /// Float minimum of absolute values.
    Fminabs,
    /// Float maximum of absolute values.
    Fmaxabs,
    /// Float to signed integer.
    Ftoi,
    /// Signed integer to float.
    Itof,
    /// Integer add.
    Add,
    /// Integer subtract.
    Sub,
    /// Logical shift right.
    Shr,
    /// Arithmetic shift right.
    Asr,
    /// Rotate right.
    Ror,
    /// Shift left.
    Shl,
    /// Signed integer minimum.
    Min,
    /// Signed integer maximum.
    Max,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise xor.
    Xor,
    /// Bitwise not.
    Not,
    /// Count leading zeros.
    Clz,
    /// Per-byte saturating add.
    V8adds,
    /// Per-byte saturating subtract.
    V8subs,
    /// Float multiply.
    Fmul,
    /// 24-bit integer multiply.
    Mul24,
    /// Per-byte multiply, rounded and divided by 255.
    V8muld,
    /// Per-byte minimum.
    V8min,
    /// Per-byte maximum.
    V8max,
}

const NO_CODE: u8 = 0;

impl OpCode {
    /// All operations, in registry order.
    pub const ALL: [OpCode; 29] = [
        OpCode::Nop,
        OpCode::Fadd,
        OpCode::Fsub,
        OpCode::Fmin,
        OpCode::Fmax,
        OpCode::Fminabs,
        OpCode::Fmaxabs,
        OpCode::Ftoi,
        OpCode::Itof,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Shr,
        OpCode::Asr,
        OpCode::Ror,
        OpCode::Shl,
        OpCode::Min,
        OpCode::Max,
        OpCode::And,
        OpCode::Or,
        OpCode::Xor,
        OpCode::Not,
        OpCode::Clz,
        OpCode::V8adds,
        OpCode::V8subs,
        OpCode::Fmul,
        OpCode::Mul24,
        OpCode::V8muld,
        OpCode::V8min,
        OpCode::V8max,
    ];

    /// Mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::Fadd => "fadd",
            OpCode::Fsub => "fsub",
            OpCode::Fmin => "fmin",
            OpCode::Fmax => "fmax",
            OpCode::Fminabs => "fminabs",
            OpCode::Fmaxabs => "fmaxabs",
            OpCode::Ftoi => "ftoi",
            OpCode::Itof => "itof",
            OpCode::Add => "add",
            OpCode::Sub => "sub",
            OpCode::Shr => "shr",
            OpCode::Asr => "asr",
            OpCode::Ror => "ror",
            OpCode::Shl => "shl",
            OpCode::Min => "min",
            OpCode::Max => "max",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Xor => "xor",
            OpCode::Not => "not",
            OpCode::Clz => "clz",
            OpCode::V8adds => "v8adds",
            OpCode::V8subs => "v8subs",
            OpCode::Fmul => "fmul",
            OpCode::Mul24 => "mul24",
            OpCode::V8muld => "v8muld",
            OpCode::V8min => "v8min",
            OpCode::V8max => "v8max",
        }
    }

    /// Encoding on the add pipeline (0 if not available there).
    pub const fn add_code(self) -> u8 {
        match self {
            OpCode::Fadd => 1,
            OpCode::Fsub => 2,
            OpCode::Fmin => 3,
            OpCode::Fmax => 4,
            OpCode::Fminabs => 5,
            OpCode::Fmaxabs => 6,
            OpCode::Ftoi => 7,
            OpCode::Itof => 8,
            OpCode::Add => 12,
            OpCode::Sub => 13,
            OpCode::Shr => 14,
            OpCode::Asr => 15,
            OpCode::Ror => 16,
            OpCode::Shl => 17,
            OpCode::Min => 18,
            OpCode::Max => 19,
            OpCode::And => 20,
            OpCode::Or => 21,
            OpCode::Xor => 22,
            OpCode::Not => 23,
            OpCode::Clz => 24,
            OpCode::V8adds => 30,
            OpCode::V8subs => 31,
            _ => NO_CODE,
        }
    }

    /// Encoding on the mul pipeline (0 if not available there).
    pub const fn mul_code(self) -> u8 {
        match self {
            OpCode::Fmul => 1,
            OpCode::Mul24 => 2,
            OpCode::V8muld => 3,
            OpCode::V8min => 4,
            OpCode::V8max => 5,
            OpCode::V8adds => 6,
            OpCode::V8subs => 7,
            _ => NO_CODE,
        }
    }

    /// Encoding on the given pipeline.
    #[inline]
    pub const fn code(self, pipeline: Pipeline) -> u8 {
        match pipeline {
            Pipeline::Add => self.add_code(),
            Pipeline::Mul => self.mul_code(),
        }
    }

    /// Number of input operands.
    pub const fn operand_count(self) -> u8 {
        match self {
            OpCode::Nop => 0,
            OpCode::Not | OpCode::Clz | OpCode::Ftoi | OpCode::Itof => 1,
            _ => 2,
        }
    }

    /// Whether the inputs are interpreted as floats.
    pub const fn accepts_float(self) -> bool {
        matches!(
            self,
            OpCode::Fadd
                | OpCode::Fsub
                | OpCode::Fmin
                | OpCode::Fmax
                | OpCode::Fminabs
                | OpCode::Fmaxabs
                | OpCode::Ftoi
                | OpCode::Fmul
        )
    }

    /// Whether the result is a float.
    pub const fn returns_float(self) -> bool {
        matches!(
            self,
            OpCode::Fadd
                | OpCode::Fsub
                | OpCode::Fmin
                | OpCode::Fmax
                | OpCode::Fminabs
                | OpCode::Fmaxabs
                | OpCode::Itof
                | OpCode::Fmul
        )
    }

    /// Whether this is the no-op.
    #[inline]
    pub const fn is_nop(self) -> bool {
        matches!(self, OpCode::Nop)
    }

    /// Whether the add pipeline can execute this operation. Nop runs anywhere.
    #[inline]
    pub const fn runs_on_add_alu(self) -> bool {
        self.is_nop() || self.add_code() != NO_CODE
    }

    /// Whether the mul pipeline can execute this operation. Nop runs anywhere.
    #[inline]
    pub const fn runs_on_mul_alu(self) -> bool {
        self.is_nop() || self.mul_code() != NO_CODE
    }

    /// Whether `pipeline` can execute this operation.
    #[inline]
    pub const fn runs_on(self, pipeline: Pipeline) -> bool {
        match pipeline {
            Pipeline::Add => self.runs_on_add_alu(),
            Pipeline::Mul => self.runs_on_mul_alu(),
        }
    }

    /// Look up by mnemonic, falling back to nop for unknown names.
    pub fn find(name: &str) -> OpCode {
        BY_NAME.get(name).copied().unwrap_or(OpCode::Nop)
    }

    /// Look up by mnemonic. Unknown names other than "nop" are an error.
    pub fn from_name(name: &str) -> Result<OpCode> {
        BY_NAME.get(name).copied().ok_or_else(|| {
            CompilationError::new(CompilationStep::General, "No machine code operation for this op-code")
                .with_context(name)
        })
    }

    /// Look up by hardware encoding on the given pipeline.
    pub fn from_encoding(code: u8, pipeline: Pipeline) -> Result<OpCode> {
        let table = match pipeline {
            Pipeline::Add => &ADD_CODES[..],
            Pipeline::Mul => &MUL_CODES[..],
        };
        table
            .get(code as usize)
            .copied()
            .flatten()
            .ok_or_else(|| {
                CompilationError::new(CompilationStep::General, "Invalid op-code encoding")
                    .with_context(format!("{:?} {}", pipeline, code))
            })
    }

    /// Whether the flags of an instruction executing `add` and `mul` are
    /// set by the mul pipeline.
    #[inline]
    pub const fn is_flag_set_by_mul(add: OpCode, mul: OpCode) -> bool {
        add.is_nop() && !mul.is_nop()
    }
}

const fn build_table(pipeline: Pipeline, len: usize) -> [Option<OpCode>; 32] {
    let mut table = [None; 32];
    table[0] = Some(OpCode::Nop);
    let mut i = 0;
    while i < OpCode::ALL.len() {
        let op = OpCode::ALL[i];
        let code = op.code(pipeline) as usize;
        if code != 0 && code < len {
            table[code] = Some(op);
        }
        i += 1;
    }
    table
}

static ADD_CODES: [Option<OpCode>; 32] = build_table(Pipeline::Add, 32);
static MUL_CODES: [Option<OpCode>; 32] = build_table(Pipeline::Mul, 8);

static BY_NAME: LazyLock<HashMap<&'static str, OpCode>> =
    LazyLock::new(|| OpCode::ALL.iter().map(|op| (op.name(), *op)).collect());

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpCode {
    type Err = CompilationError;

    fn from_str(s: &str) -> Result<Self> {
        OpCode::from_name(s)
    }
}
