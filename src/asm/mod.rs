//! ALU instruction layer.
//!
//! - [`opcode`]: the operations each pipeline executes
//! - [`fold`]: constant evaluation and algebraic properties of operations
//! - [`pack`]: the pack and unpack conversion units
//! - [`codes`]: conditions, branch conditions, signals and multiplexers
//! - [`alu`]: construction, encoding, decoding and disassembly
//! - [`stream`]: little-endian instruction streams

pub mod alu;
pub mod codes;
mod encoding;
pub mod fold;
pub mod opcode;
pub mod pack;
pub mod stream;

pub use alu::{AluFields, AluInstruction};
pub use codes::{BranchCond, ConditionCode, InputMultiplex, SetFlag, Signaling, WriteSwap};
pub use fold::{ConstantFolder, SlotPacking};
pub use opcode::{OpCode, Pipeline};
pub use pack::{Pack, Unpack};
pub use stream::{read_instructions, write_instructions};
