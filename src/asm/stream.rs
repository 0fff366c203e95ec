//! Instruction streams.
//!
//! Machine code is a sequence of 64-bit little-endian instruction words.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::alu::AluInstruction;
use crate::error::{CompilationError, CompilationStep, Result};

/// Size of one instruction word in bytes.
pub const INSTRUCTION_SIZE: usize = 8;

fn io_error(e: std::io::Error) -> CompilationError {
    CompilationError::new(CompilationStep::CodeGeneration, "Failed to transfer instructions")
        .with_context(e.to_string())
}

/// Write `instructions` as little-endian words.
pub fn write_instructions<W: Write>(writer: &mut W, instructions: &[AluInstruction]) -> Result<()> {
    for instr in instructions {
        writer
            .write_u64::<LittleEndian>(instr.to_word())
            .map_err(io_error)?;
    }
    Ok(())
}

/// Read little-endian words until the end of `reader` and decode them.
pub fn read_instructions<R: Read>(reader: &mut R) -> Result<Vec<AluInstruction>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() % INSTRUCTION_SIZE != 0 {
        return Err(CompilationError::new(
            CompilationStep::CodeGeneration,
            "Instruction stream is not a whole number of words",
        )
        .with_context(format!("{} bytes", bytes.len())));
    }

    let count = bytes.len() / INSTRUCTION_SIZE;
    let mut cursor = Cursor::new(bytes);
    let mut instructions = Vec::with_capacity(count);
    for _ in 0..count {
        let word = cursor.read_u64::<LittleEndian>().map_err(io_error)?;
        instructions.push(AluInstruction::from_word(word)?);
    }
    log::debug!("Read {} instructions", instructions.len());
    Ok(instructions)
}

/// Render a listing, one instruction per line.
pub fn listing(instructions: &[AluInstruction], show_encoding: bool) -> String {
    instructions
        .iter()
        .map(|instr| instr.listing_line(show_encoding) + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{AluFields, ConditionCode, OpCode};

    fn sample() -> Vec<AluInstruction> {
        let nop = AluInstruction::new(AluFields {
            cond_add: ConditionCode::Never,
            cond_mul: ConditionCode::Never,
            ..AluFields::default()
        })
        .unwrap();
        let add = AluInstruction::new(AluFields {
            op_add: OpCode::Add,
            add_out: 1,
            ..AluFields::default()
        })
        .unwrap();
        vec![nop, add]
    }

    #[test]
    fn test_write_little_endian() {
        let mut out = Vec::new();
        write_instructions(&mut out, &sample()[..1]).unwrap();
        assert_eq!(out, [0x00, 0x70, 0x9E, 0x00, 0xE7, 0x09, 0x00, 0x10]);
    }

    #[test]
    fn test_read_back() {
        let program = sample();
        let mut out = Vec::new();
        write_instructions(&mut out, &program).unwrap();
        assert_eq!(out.len(), 16);
        let decoded = read_instructions(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, program);
    }

    #[test]
    fn test_truncated_stream() {
        let bytes = [0u8; 12];
        let err = read_instructions(&mut &bytes[..]).unwrap_err();
        assert_eq!(err.step, CompilationStep::CodeGeneration);
    }

    #[test]
    fn test_listing() {
        let text = listing(&sample(), false);
        assert_eq!(text, "nop\nadd ra1, acc0, acc0\n");
    }
}
