//! qpu-isa library
//!
//! Operation semantics, constant folding and ALU instruction encoding for a
//! dual-pipeline (add + mul) SIMD QPU.
//!
//! - [`value`]: compile-time values, small immediates and physical registers
//! - [`asm`]: operations, constant evaluation, pack/unpack units and the
//!   64-bit ALU instruction word
//! - [`config`]: folding and listing options
//! - [`error`]: the crate-wide [`CompilationError`]

pub mod asm;
pub mod config;
pub mod error;
pub mod value;

pub use asm::{AluFields, AluInstruction, ConstantFolder, OpCode, Pack, SlotPacking, Unpack};
pub use config::Config;
pub use error::{CompilationError, CompilationStep, Result};
pub use value::{DataType, Literal, Register, SmallImmediate, Value};
