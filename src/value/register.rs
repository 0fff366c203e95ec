//! Physical registers.
//!
//! The QPU reads operands through six accumulators and two 64-entry
//! register files (A and B). Addresses 0..=31 of each file are general
//! purpose; the upper half maps to accumulators and peripherals, and the
//! peripheral behind an address differs between reads and writes.
//!
//! | Address | Write | Read |
//! |---------|-------|------|
//! | 32..=35 | acc0..acc3 | uniform (32), varying (35) |
//! | 36 | TMU (no swap) | - |
//! | 37 | acc5 | - |
//! | 39 | nop | nop |
//! | 48 | VPM | VPM |
//! | 52..=55 | SFU | - |
//! | 56..=63 | TMU0/TMU1 | - |

use std::fmt;

/// 6-bit register-file address.
pub type Address = u8;

/// Which physical storage a [`Register`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterFile {
    /// Physical register file A.
    A,
    /// Physical register file B.
    B,
    /// One of the six accumulators.
    Accumulator,
    /// Addressable through either file (only the nop register).
    Any,
}

/// A physical register.
///
/// Only built through the constructors below, so an accumulator always
/// carries an address of at least 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    file: RegisterFile,
    num: Address,
}

const ACC_BASE: Address = 32;

impl Register {
    /// The "no register" address.
    pub const NOP: Register = Register {
        file: RegisterFile::Any,
        num: 39,
    };

    /// Accumulator 4, which receives TMU and SFU results.
    pub const TMU_OUT: Register = Register::acc(4);

    /// Accumulator `index` (0..=5).
    pub const fn acc(index: u8) -> Self {
        Self {
            file: RegisterFile::Accumulator,
            num: ACC_BASE.saturating_add(index),
        }
    }

    /// Storage holding the register.
    #[inline]
    pub const fn file(&self) -> RegisterFile {
        self.file
    }

    /// Address within the file; accumulators use 32..=37.
    #[inline]
    pub const fn num(&self) -> Address {
        self.num
    }

    /// Register in file A.
    pub const fn file_a(num: Address) -> Self {
        Self {
            file: RegisterFile::A,
            num,
        }
    }

    /// Register in file B.
    pub const fn file_b(num: Address) -> Self {
        Self {
            file: RegisterFile::B,
            num,
        }
    }

    /// Register written by an output address of file A or B.
    ///
    /// Addresses 32..=35 and 37 write accumulators regardless of the file.
    pub fn output(file_a: bool, addr: Address) -> Self {
        match addr {
            32..=35 => Register::acc(addr - ACC_BASE),
            37 => Register::acc(5),
            39 => Register::NOP,
            _ if file_a => Register::file_a(addr),
            _ => Register::file_b(addr),
        }
    }

    /// Whether this is an accumulator.
    #[inline]
    pub fn is_accumulator(&self) -> bool {
        self.file == RegisterFile::Accumulator
    }

    /// Accumulator index, if this is an accumulator.
    pub fn accumulator_index(&self) -> Option<u8> {
        if !self.is_accumulator() {
            return None;
        }
        self.num.checked_sub(ACC_BASE)
    }

    /// Name when read as an operand.
    pub fn read_name(&self) -> String {
        self.name(false)
    }

    /// Name when written as a result.
    pub fn write_name(&self) -> String {
        self.name(true)
    }

    fn name(&self, write: bool) -> String {
        let file_a = match self.file {
            RegisterFile::Accumulator => {
                return match self.accumulator_index() {
                    Some(index) => format!("acc{}", index),
                    None => format!("r{}", self.num),
                }
            }
            RegisterFile::Any => return "-".to_string(),
            RegisterFile::A => true,
            RegisterFile::B => false,
        };
        let special = if write {
            write_peripheral(self.num, file_a)
        } else {
            read_peripheral(self.num, file_a)
        };
        match special {
            Some(name) => name.to_string(),
            None if file_a => format!("ra{}", self.num),
            None => format!("rb{}", self.num),
        }
    }
}

fn read_peripheral(addr: Address, file_a: bool) -> Option<&'static str> {
    Some(match (addr, file_a) {
        (32, _) => "unif",
        (35, _) => "varying",
        (38, true) => "elem_num",
        (38, false) => "qpu_num",
        (39, _) => "-",
        (48, _) => "vpm",
        (49, true) => "vpr_busy",
        (49, false) => "vpw_busy",
        (50, true) => "vpr_wait",
        (50, false) => "vpw_wait",
        (51, _) => "mutex",
        _ => return None,
    })
}

fn write_peripheral(addr: Address, file_a: bool) -> Option<&'static str> {
    Some(match (addr, file_a) {
        (36, _) => "tmu_noswap",
        (38, _) => "host_int",
        (39, _) => "-",
        (40, _) => "unif_addr",
        (41, true) => "quad_x",
        (41, false) => "quad_y",
        (42, true) => "ms_flags",
        (42, false) => "rev_flag",
        (43, _) => "tlb_stencil",
        (44, _) => "tlb_z",
        (45, _) => "tlb_color_ms",
        (46, _) => "tlb_color_all",
        (47, _) => "tlb_alpha_mask",
        (48, _) => "vpm",
        (49, true) => "vpr_setup",
        (49, false) => "vpw_setup",
        (50, true) => "vpr_addr",
        (50, false) => "vpw_addr",
        (51, _) => "mutex",
        (52, _) => "sfu_recip",
        (53, _) => "sfu_recipsqrt",
        (54, _) => "sfu_exp",
        (55, _) => "sfu_log",
        (56, _) => "tmu0_s",
        (57, _) => "tmu0_t",
        (58, _) => "tmu0_r",
        (59, _) => "tmu0_b",
        (60, _) => "tmu1_s",
        (61, _) => "tmu1_t",
        (62, _) => "tmu1_r",
        (63, _) => "tmu1_b",
        _ => return None,
    })
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.read_name())
    }
}
