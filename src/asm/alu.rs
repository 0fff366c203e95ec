//! Dual-slot ALU instructions.
//!
//! An [`AluInstruction`] co-issues one operation on the add pipeline and one
//! on the mul pipeline. Both slots share the two register-file read ports
//! (`input_a`, `input_b`) and choose their operands through 3-bit input
//! multiplexers. With the ALU-immediate signal, `input_b` holds a
//! [`SmallImmediate`] instead of a register-file-B address.
//!
//! # Disassembly
//!
//! ```text
//! <add-op><extras> <add-out>, <add-args>; <mul-op><extras> <mul-out>, <mul-args>
//! ```
//!
//! A slot executing `nop` is left out; an instruction with two `nop` slots
//! renders as a bare `nop`. Extras are `.`-separated suffixes: a signal with
//! side effects (first clause only), the condition, `setf` on the slot that
//! sets the flags, then the unpack and pack modes of the slot they apply to.
//!
//! When the mul slot reads only accumulators, the add slot does not read
//! register file B and the immediate is a rotation encoding, the immediate
//! rotates the mul result and is rendered after the mul operands:
//!
//! ```text
//! v8min acc1, acc0, acc1 << 3
//! ```

use std::fmt;

use smallvec::SmallVec;

use super::codes::{ConditionCode, InputMultiplex, SetFlag, Signaling, WriteSwap};
use super::encoding;
use super::fold::SlotPacking;
use super::opcode::{OpCode, Pipeline};
use super::pack::{Pack, Unpack};
use crate::config::Config;
use crate::error::{CompilationError, CompilationStep, Result};
use crate::value::{Address, Register, SmallImmediate};

/// Highest valid register-file address.
const MAX_ADDRESS: Address = 63;

/// Field values of an ALU instruction before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AluFields {
    /// Signal.
    pub sig: Signaling,
    /// Unpack mode for operands read from file A (or accumulator 4).
    pub unpack: Unpack,
    /// Pack mode for the result written to file A (or the mul result).
    pub pack: Pack,
    /// Write condition of the add slot.
    pub cond_add: ConditionCode,
    /// Write condition of the mul slot.
    pub cond_mul: ConditionCode,
    /// Whether flags are updated.
    pub set_flags: SetFlag,
    /// Which register file each slot writes.
    pub write_swap: WriteSwap,
    /// Output address of the add slot.
    pub add_out: Address,
    /// Output address of the mul slot.
    pub mul_out: Address,
    /// Operation of the add slot.
    pub op_add: OpCode,
    /// Operation of the mul slot.
    pub op_mul: OpCode,
    /// Read address of register file A.
    pub input_a: Address,
    /// Read address of register file B, or the small-immediate encoding.
    pub input_b: Address,
    /// First operand of the add slot.
    pub add_mux_a: InputMultiplex,
    /// Second operand of the add slot.
    pub add_mux_b: InputMultiplex,
    /// First operand of the mul slot.
    pub mul_mux_a: InputMultiplex,
    /// Second operand of the mul slot.
    pub mul_mux_b: InputMultiplex,
}

impl Default for AluFields {
    fn default() -> Self {
        let nop = Register::NOP.num();
        Self {
            sig: Signaling::None,
            unpack: Unpack::Nop,
            pack: Pack::Nop,
            cond_add: ConditionCode::Always,
            cond_mul: ConditionCode::Always,
            set_flags: SetFlag::DontSet,
            write_swap: WriteSwap::DontSwap,
            add_out: nop,
            mul_out: nop,
            op_add: OpCode::Nop,
            op_mul: OpCode::Nop,
            input_a: nop,
            input_b: nop,
            add_mux_a: InputMultiplex::Acc0,
            add_mux_b: InputMultiplex::Acc0,
            mul_mux_a: InputMultiplex::Acc0,
            mul_mux_b: InputMultiplex::Acc0,
        }
    }
}

/// A validated ALU instruction.
///
/// Instances only exist if both operations run on the pipeline they were
/// placed on, all addresses fit in six bits and the pack and unpack modes
/// agree on the shared pm bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AluInstruction {
    fields: AluFields,
}

impl AluInstruction {
    /// Validate `fields` into an instruction.
    pub fn new(fields: AluFields) -> Result<Self> {
        let mut fields = fields;
        let wrong_alu = |op: OpCode, pipeline: Pipeline| {
            CompilationError::new(CompilationStep::CodeGeneration, "Opcode specified for wrong ALU")
                .with_context(format!("{} on {:?} ALU", op, pipeline))
        };
        if !fields.op_add.runs_on_add_alu() {
            return Err(wrong_alu(fields.op_add, Pipeline::Add));
        }
        if !fields.op_mul.runs_on_mul_alu() {
            return Err(wrong_alu(fields.op_mul, Pipeline::Mul));
        }
        if matches!(fields.sig, Signaling::Branch | Signaling::LoadImmediate) {
            return Err(CompilationError::new(
                CompilationStep::CodeGeneration,
                "Signal does not belong to an ALU instruction",
            )
            .with_context(fields.sig.mnemonic()));
        }
        for addr in [fields.add_out, fields.mul_out, fields.input_a, fields.input_b] {
            if addr > MAX_ADDRESS {
                return Err(CompilationError::new(
                    CompilationStep::CodeGeneration,
                    "Register address out of range",
                )
                .with_context(addr.to_string()));
            }
        }

        let (unpack, pack) = (fields.unpack, fields.pack);
        if unpack.has_effect() && pack.has_effect() && unpack.is_pm_bit_set() != pack.is_pm_bit_set() {
            return Err(CompilationError::new(
                CompilationStep::CodeGeneration,
                "Pack and unpack modes disagree on the pm bit",
            )
            .with_context(format!("{} / {}", unpack.mnemonic(), pack.mnemonic())));
        }
        let pm = if unpack.has_effect() {
            unpack.is_pm_bit_set()
        } else if pack.has_effect() {
            pack.is_pm_bit_set()
        } else {
            unpack.is_pm_bit_set() || pack.is_pm_bit_set()
        };
        if !unpack.has_effect() {
            fields.unpack = Unpack::nop(pm);
        }
        if !pack.has_effect() {
            fields.pack = Pack::nop(pm);
        }

        let instr = Self { fields };
        log::debug!("Constructed ALU instruction: {}", instr);
        Ok(instr)
    }

    /// Validate `fields` with `immediate` in place of the file-B read address.
    ///
    /// Forces the ALU-immediate signal.
    pub fn with_immediate(fields: AluFields, immediate: SmallImmediate) -> Result<Self> {
        Self::new(AluFields {
            sig: Signaling::AluImmediate,
            input_b: immediate.raw(),
            ..fields
        })
    }

    /// Decode a 64-bit instruction word.
    pub fn from_word(word: u64) -> Result<Self> {
        let sig = Signaling::from_raw(encoding::SIG.get(word))?;
        if matches!(sig, Signaling::Branch | Signaling::LoadImmediate) {
            return Err(CompilationError::new(
                CompilationStep::CodeGeneration,
                "Not an ALU instruction",
            )
            .with_context(format!("{:#018x}", word)));
        }
        let pm = encoding::PM.get(word);
        let fields = AluFields {
            sig,
            unpack: Unpack::from_raw(encoding::UNPACK.get(word) << 1 | pm)?,
            pack: Pack::from_raw(pm << 4 | encoding::PACK.get(word))?,
            cond_add: ConditionCode::from_raw(encoding::COND_ADD.get(word))?,
            cond_mul: ConditionCode::from_raw(encoding::COND_MUL.get(word))?,
            set_flags: SetFlag::from_raw(encoding::SET_FLAGS.get(word))?,
            write_swap: WriteSwap::from_raw(encoding::WRITE_SWAP.get(word))?,
            add_out: encoding::WADDR_ADD.get(word),
            mul_out: encoding::WADDR_MUL.get(word),
            op_add: OpCode::from_encoding(encoding::OP_ADD.get(word), Pipeline::Add)?,
            op_mul: OpCode::from_encoding(encoding::OP_MUL.get(word), Pipeline::Mul)?,
            input_a: encoding::RADDR_A.get(word),
            input_b: encoding::RADDR_B.get(word),
            add_mux_a: InputMultiplex::from_raw(encoding::ADD_A.get(word))?,
            add_mux_b: InputMultiplex::from_raw(encoding::ADD_B.get(word))?,
            mul_mux_a: InputMultiplex::from_raw(encoding::MUL_A.get(word))?,
            mul_mux_b: InputMultiplex::from_raw(encoding::MUL_B.get(word))?,
        };
        log::debug!("Decoded {:#018x}", word);
        Self::new(fields)
    }

    /// Encode into a 64-bit instruction word.
    pub fn to_word(&self) -> u64 {
        let f = &self.fields;
        let pm = f.unpack.is_pm_bit_set() || f.pack.is_pm_bit_set();
        [
            (encoding::SIG, f.sig.raw()),
            (encoding::UNPACK, f.unpack.mode()),
            (encoding::PM, pm as u8),
            (encoding::PACK, f.pack.mode()),
            (encoding::COND_ADD, f.cond_add.raw()),
            (encoding::COND_MUL, f.cond_mul.raw()),
            (encoding::SET_FLAGS, f.set_flags as u8),
            (encoding::WRITE_SWAP, f.write_swap as u8),
            (encoding::WADDR_ADD, f.add_out),
            (encoding::WADDR_MUL, f.mul_out),
            (encoding::OP_MUL, f.op_mul.mul_code()),
            (encoding::OP_ADD, f.op_add.add_code()),
            (encoding::RADDR_A, f.input_a),
            (encoding::RADDR_B, f.input_b),
            (encoding::ADD_A, f.add_mux_a.raw()),
            (encoding::ADD_B, f.add_mux_b.raw()),
            (encoding::MUL_A, f.mul_mux_a.raw()),
            (encoding::MUL_B, f.mul_mux_b.raw()),
        ]
        .into_iter()
        .fold(0, |word, (field, value)| field.set(word, value))
    }

    /// The validated field values.
    #[inline]
    pub fn fields(&self) -> &AluFields {
        &self.fields
    }

    /// Operation of the add slot.
    #[inline]
    pub fn add_op(&self) -> OpCode {
        self.fields.op_add
    }

    /// Operation of the mul slot.
    #[inline]
    pub fn mul_op(&self) -> OpCode {
        self.fields.op_mul
    }

    /// Signal.
    #[inline]
    pub fn signal(&self) -> Signaling {
        self.fields.sig
    }

    /// The small immediate, if the ALU-immediate signal is set.
    pub fn small_immediate(&self) -> Option<SmallImmediate> {
        if self.fields.sig != Signaling::AluImmediate {
            return None;
        }
        SmallImmediate::new(self.fields.input_b).ok()
    }

    /// Whether the immediate rotates the mul result instead of being an
    /// operand.
    pub fn is_vector_rotation(&self) -> bool {
        let f = &self.fields;
        let on_accumulator = |mux: InputMultiplex| mux.accumulator().is_some();
        !f.op_mul.is_nop()
            && on_accumulator(f.mul_mux_a)
            && on_accumulator(f.mul_mux_b)
            && (f.op_add.is_nop()
                || (f.add_mux_a != InputMultiplex::RegB && f.add_mux_b != InputMultiplex::RegB))
            && self.small_immediate().is_some_and(SmallImmediate::is_vector_rotation)
    }

    /// Whether the flags are set from the mul slot.
    #[inline]
    pub fn is_flag_set_by_mul(&self) -> bool {
        OpCode::is_flag_set_by_mul(self.fields.op_add, self.fields.op_mul)
    }

    fn input_register(&self, mux: InputMultiplex) -> Register {
        match mux {
            InputMultiplex::Acc4 => Register::TMU_OUT,
            InputMultiplex::RegA => Register::file_a(self.fields.input_a),
            InputMultiplex::RegB => Register::file_b(self.fields.input_b),
            acc => Register::acc(acc.raw()),
        }
    }

    fn operand(&self, op: OpCode, mux: InputMultiplex) -> Option<Register> {
        if op.is_nop() || (self.fields.sig == Signaling::AluImmediate && mux == InputMultiplex::RegB) {
            return None;
        }
        Some(self.input_register(mux))
    }

    /// Register read as the first operand of the add slot.
    ///
    /// `None` if the add slot executes `nop` or the operand is the immediate.
    pub fn add_first_operand(&self) -> Option<Register> {
        self.operand(self.fields.op_add, self.fields.add_mux_a)
    }

    /// Register read as the second operand of the add slot.
    pub fn add_second_operand(&self) -> Option<Register> {
        self.operand(self.fields.op_add, self.fields.add_mux_b)
    }

    /// Register read as the first operand of the mul slot.
    pub fn mul_first_operand(&self) -> Option<Register> {
        self.operand(self.fields.op_mul, self.fields.mul_mux_a)
    }

    /// Register read as the second operand of the mul slot.
    pub fn mul_second_operand(&self) -> Option<Register> {
        self.operand(self.fields.op_mul, self.fields.mul_mux_b)
    }

    /// Register written by the add slot, or `None` for `nop`.
    pub fn add_output(&self) -> Option<Register> {
        let f = &self.fields;
        (!f.op_add.is_nop()).then(|| Register::output(f.write_swap.add_writes_a(), f.add_out))
    }

    /// Register written by the mul slot, or `None` for `nop`.
    pub fn mul_output(&self) -> Option<Register> {
        let f = &self.fields;
        (!f.op_mul.is_nop()).then(|| Register::output(!f.write_swap.add_writes_a(), f.mul_out))
    }

    fn slot(&self, pipeline: Pipeline) -> (OpCode, [InputMultiplex; 2]) {
        let f = &self.fields;
        match pipeline {
            Pipeline::Add => (f.op_add, [f.add_mux_a, f.add_mux_b]),
            Pipeline::Mul => (f.op_mul, [f.mul_mux_a, f.mul_mux_b]),
        }
    }

    /// Which operands of the `pipeline` slot pass the unpack unit and
    /// whether its result passes the pack unit.
    ///
    /// Without the pm bit, reads of register file A are unpacked and the
    /// slot writing file A is packed. With the pm bit, reads of accumulator 4
    /// are unpacked and the mul result is packed.
    pub fn slot_packing(&self, pipeline: Pipeline) -> SlotPacking {
        let f = &self.fields;
        let (op, [mux_a, mux_b]) = self.slot(pipeline);
        let pm = f.pack.is_pm_bit_set();
        let unpacked_source = if pm { InputMultiplex::Acc4 } else { InputMultiplex::RegA };
        let writes_a = (pipeline == Pipeline::Add) == f.write_swap.add_writes_a();
        let packs = if pm { pipeline == Pipeline::Mul } else { writes_a };
        SlotPacking {
            unpack: f.unpack,
            pack: f.pack,
            unpack_first: op.operand_count() >= 1 && mux_a == unpacked_source,
            unpack_second: op.operand_count() >= 2 && mux_b == unpacked_source,
            pack_result: !op.is_nop() && packs,
        }
    }

    fn input_text(&self, mux: InputMultiplex) -> String {
        match (mux, self.small_immediate()) {
            (InputMultiplex::RegB, Some(imm)) => imm.to_string(),
            _ => self.input_register(mux).read_name(),
        }
    }

    fn extras(&self, pipeline: Pipeline, first_clause: bool) -> String {
        let f = &self.fields;
        let op = self.slot(pipeline).0;
        let mut parts: SmallVec<[&str; 5]> = SmallVec::new();
        if first_clause && f.sig.has_side_effects() {
            parts.push(f.sig.mnemonic());
        }
        if !op.is_nop() {
            let cond = match pipeline {
                Pipeline::Add => f.cond_add,
                Pipeline::Mul => f.cond_mul,
            };
            parts.push(cond.mnemonic());
            if f.set_flags == SetFlag::SetFlags && (pipeline == Pipeline::Mul) == self.is_flag_set_by_mul() {
                parts.push(f.set_flags.mnemonic());
            }
            let packing = self.slot_packing(pipeline);
            if f.unpack.has_effect() && (packing.unpack_first || packing.unpack_second) {
                parts.push(f.unpack.mnemonic());
            }
            if f.pack.has_effect() && packing.pack_result {
                parts.push(f.pack.mnemonic());
            }
        }
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .fold(String::new(), |acc, part| acc + "." + *part)
    }

    fn clause(&self, pipeline: Pipeline, first_clause: bool) -> String {
        let (op, muxes) = self.slot(pipeline);
        let output = match pipeline {
            Pipeline::Add => self.add_output(),
            Pipeline::Mul => self.mul_output(),
        };
        let mut text = format!("{}{}", op, self.extras(pipeline, first_clause));
        if let Some(out) = output {
            text.push(' ');
            text.push_str(&out.write_name());
            for mux in &muxes[..op.operand_count() as usize] {
                text.push_str(", ");
                text.push_str(&self.input_text(*mux));
            }
        }
        if pipeline == Pipeline::Mul && self.is_vector_rotation() {
            if let Some(imm) = self.small_immediate() {
                text.push(' ');
                text.push_str(&imm.to_string());
            }
        }
        text
    }

    /// Render as assembler text.
    pub fn to_asm_string(&self) -> String {
        match (self.fields.op_add.is_nop(), self.fields.op_mul.is_nop()) {
            (false, false) => format!(
                "{}; {}",
                self.clause(Pipeline::Add, true),
                self.clause(Pipeline::Mul, false)
            ),
            (false, true) => self.clause(Pipeline::Add, true),
            (true, false) => self.clause(Pipeline::Mul, true),
            (true, true) => self.clause(Pipeline::Add, true),
        }
    }

    /// Render as a listing line, optionally prefixed with the encoded word.
    pub fn listing_line(&self, show_encoding: bool) -> String {
        if show_encoding {
            format!("{:#018x}  {}", self.to_word(), self)
        } else {
            self.to_asm_string()
        }
    }

    /// Render as a listing line following the `[listing]` configuration.
    pub fn to_listing_line(&self) -> String {
        self.listing_line(Config::get().show_encoding())
    }
}

impl fmt::Display for AluInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm_string())
    }
}
