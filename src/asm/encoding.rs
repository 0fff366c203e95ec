//! Bit layout of the 64-bit ALU instruction word.
//!
//! | Bits  | Field | Width |
//! |-------|-------|-------|
//! | 63:60 | signal | 4 |
//! | 59:57 | unpack mode | 3 |
//! | 56    | pm | 1 |
//! | 55:52 | pack mode | 4 |
//! | 51:49 | add condition | 3 |
//! | 48:46 | mul condition | 3 |
//! | 45    | set flags | 1 |
//! | 44    | write swap | 1 |
//! | 43:38 | add write address | 6 |
//! | 37:32 | mul write address | 6 |
//! | 31:29 | mul opcode | 3 |
//! | 28:24 | add opcode | 5 |
//! | 23:18 | read address A | 6 |
//! | 17:12 | read address B / small immediate | 6 |
//! | 11:9  | add input A mux | 3 |
//! | 8:6   | add input B mux | 3 |
//! | 5:3   | mul input A mux | 3 |
//! | 2:0   | mul input B mux | 3 |
//!
//! Only [`super::alu`] reads or writes these fields.

/// A bit field of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    #[inline]
    const fn mask(self) -> u64 {
        (1u64 << self.width) - 1
    }

    /// Extract the field from `word`.
    #[inline]
    pub(crate) const fn get(self, word: u64) -> u8 {
        ((word >> self.shift) & self.mask()) as u8
    }

    /// Return `word` with the field replaced by `value` (truncated to width).
    #[inline]
    pub(crate) const fn set(self, word: u64, value: u8) -> u64 {
        let mask = self.mask() << self.shift;
        (word & !mask) | (((value as u64) << self.shift) & mask)
    }
}

pub(crate) const SIG: Field = Field::new(60, 4);
pub(crate) const UNPACK: Field = Field::new(57, 3);
pub(crate) const PM: Field = Field::new(56, 1);
pub(crate) const PACK: Field = Field::new(52, 4);
pub(crate) const COND_ADD: Field = Field::new(49, 3);
pub(crate) const COND_MUL: Field = Field::new(46, 3);
pub(crate) const SET_FLAGS: Field = Field::new(45, 1);
pub(crate) const WRITE_SWAP: Field = Field::new(44, 1);
pub(crate) const WADDR_ADD: Field = Field::new(38, 6);
pub(crate) const WADDR_MUL: Field = Field::new(32, 6);
pub(crate) const OP_MUL: Field = Field::new(29, 3);
pub(crate) const OP_ADD: Field = Field::new(24, 5);
pub(crate) const RADDR_A: Field = Field::new(18, 6);
pub(crate) const RADDR_B: Field = Field::new(12, 6);
pub(crate) const ADD_A: Field = Field::new(9, 3);
pub(crate) const ADD_B: Field = Field::new(6, 3);
pub(crate) const MUL_A: Field = Field::new(3, 3);
pub(crate) const MUL_B: Field = Field::new(0, 3);

#[cfg(test)]
pub(crate) const ALL_FIELDS: [Field; 18] = [
    SIG, UNPACK, PM, PACK, COND_ADD, COND_MUL, SET_FLAGS, WRITE_SWAP, WADDR_ADD, WADDR_MUL,
    OP_MUL, OP_ADD, RADDR_A, RADDR_B, ADD_A, ADD_B, MUL_A, MUL_B,
];
