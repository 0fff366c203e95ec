//! Condition, branch, signal and multiplexer codes.
//!
//! Small closed enumerations encoded into instruction fields. Decoding from a
//! raw field value is the only fallible direction.

use std::fmt;

use crate::error::{CompilationError, CompilationStep, Result};

fn invalid(what: &str, raw: u8) -> CompilationError {
    CompilationError::new(CompilationStep::General, format!("Invalid {}", what))
        .with_context(raw.to_string())
}

/// Per-slot write condition, evaluated against the per-lane flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConditionCode {
    /// Never write.
    Never = 0,
    /// Always write.
    Always = 1,
    /// Write lanes with the zero flag set.
    ZeroSet = 2,
    /// Write lanes with the zero flag clear.
    ZeroClear = 3,
    /// Write lanes with the negative flag set.
    NegativeSet = 4,
    /// Write lanes with the negative flag clear.
    NegativeClear = 5,
    /// Write lanes with the carry flag set.
    CarrySet = 6,
    /// Write lanes with the carry flag clear.
    CarryClear = 7,
}

impl ConditionCode {
    /// All condition codes in encoding order.
    pub const ALL: [ConditionCode; 8] = [
        ConditionCode::Never,
        ConditionCode::Always,
        ConditionCode::ZeroSet,
        ConditionCode::ZeroClear,
        ConditionCode::NegativeSet,
        ConditionCode::NegativeClear,
        ConditionCode::CarrySet,
        ConditionCode::CarryClear,
    ];

    /// Decode a 3-bit field.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or_else(|| invalid("condition code", raw))
    }

    /// Raw field value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Mnemonic; empty for [`ConditionCode::Always`].
    pub const fn mnemonic(self) -> &'static str {
        match self {
            ConditionCode::Never => "never",
            ConditionCode::Always => "",
            ConditionCode::ZeroSet => "ifz",
            ConditionCode::ZeroClear => "ifzc",
            ConditionCode::NegativeSet => "ifn",
            ConditionCode::NegativeClear => "ifnc",
            ConditionCode::CarrySet => "ifc",
            ConditionCode::CarryClear => "ifcc",
        }
    }

    /// The condition selecting exactly the lanes this one rejects.
    pub const fn invert(self) -> Self {
        match self {
            ConditionCode::Never => ConditionCode::Always,
            ConditionCode::Always => ConditionCode::Never,
            ConditionCode::ZeroSet => ConditionCode::ZeroClear,
            ConditionCode::ZeroClear => ConditionCode::ZeroSet,
            ConditionCode::NegativeSet => ConditionCode::NegativeClear,
            ConditionCode::NegativeClear => ConditionCode::NegativeSet,
            ConditionCode::CarrySet => ConditionCode::CarryClear,
            ConditionCode::CarryClear => ConditionCode::CarrySet,
        }
    }

    /// Whether `other` is the inversion of this condition.
    #[inline]
    pub fn is_inversion_of(self, other: ConditionCode) -> bool {
        self.invert() == other
    }

    /// Branch condition taken when this condition holds for the whole vector.
    ///
    /// "Set" conditions map to "any lane set", "clear" conditions to "all
    /// lanes clear". [`ConditionCode::Never`] has no branch equivalent.
    pub fn to_branch_condition(self) -> Result<BranchCond> {
        Ok(match self {
            ConditionCode::Always => BranchCond::Always,
            ConditionCode::ZeroSet => BranchCond::AnyZSet,
            ConditionCode::ZeroClear => BranchCond::AllZClear,
            ConditionCode::NegativeSet => BranchCond::AnyNSet,
            ConditionCode::NegativeClear => BranchCond::AllNClear,
            ConditionCode::CarrySet => BranchCond::AnyCSet,
            ConditionCode::CarryClear => BranchCond::AllCClear,
            ConditionCode::Never => {
                return Err(CompilationError::new(
                    CompilationStep::CodeGeneration,
                    "Invalid condition for branch",
                )
                .with_context(self.mnemonic()))
            }
        })
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Condition of a branch, reduced over all lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BranchCond {
    /// Zero flag set in all lanes.
    AllZSet = 0,
    /// Zero flag clear in all lanes.
    AllZClear = 1,
    /// Zero flag set in any lane.
    AnyZSet = 2,
    /// Zero flag clear in any lane.
    AnyZClear = 3,
    /// Negative flag set in all lanes.
    AllNSet = 4,
    /// Negative flag clear in all lanes.
    AllNClear = 5,
    /// Negative flag set in any lane.
    AnyNSet = 6,
    /// Negative flag clear in any lane.
    AnyNClear = 7,
    /// Carry flag set in all lanes.
    AllCSet = 8,
    /// Carry flag clear in all lanes.
    AllCClear = 9,
    /// Carry flag set in any lane.
    AnyCSet = 10,
    /// Carry flag clear in any lane.
    AnyCClear = 11,
    /// Unconditional.
    Always = 15,
}

impl BranchCond {
    /// Decode a 4-bit field. Values 12..=14 are reserved.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Ok(match raw {
            0 => BranchCond::AllZSet,
            1 => BranchCond::AllZClear,
            2 => BranchCond::AnyZSet,
            3 => BranchCond::AnyZClear,
            4 => BranchCond::AllNSet,
            5 => BranchCond::AllNClear,
            6 => BranchCond::AnyNSet,
            7 => BranchCond::AnyNClear,
            8 => BranchCond::AllCSet,
            9 => BranchCond::AllCClear,
            10 => BranchCond::AnyCSet,
            11 => BranchCond::AnyCClear,
            15 => BranchCond::Always,
            _ => return Err(invalid("branch condition", raw)),
        })
    }

    /// Raw field value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Mnemonic; empty for [`BranchCond::Always`].
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BranchCond::AllZSet => "ifallz",
            BranchCond::AllZClear => "ifallzc",
            BranchCond::AnyZSet => "ifanyz",
            BranchCond::AnyZClear => "ifanyzc",
            BranchCond::AllNSet => "ifalln",
            BranchCond::AllNClear => "ifallnc",
            BranchCond::AnyNSet => "ifanyn",
            BranchCond::AnyNClear => "ifanync",
            BranchCond::AllCSet => "ifallc",
            BranchCond::AllCClear => "ifallcc",
            BranchCond::AnyCSet => "ifanyc",
            BranchCond::AnyCClear => "ifanycc",
            BranchCond::Always => "",
        }
    }
}

impl fmt::Display for BranchCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The signal field of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Signaling {
    /// Software breakpoint.
    Breakpoint = 0,
    /// No signal.
    None = 1,
    /// Thread switch.
    ThreadSwitch = 2,
    /// Program end.
    ProgramEnd = 3,
    /// Wait for scoreboard.
    WaitForScore = 4,
    /// Scoreboard unlock.
    ScoreUnlock = 5,
    /// Last thread switch.
    LastThreadSwitch = 6,
    /// Load coverage into accumulator 4.
    CoverageLoad = 7,
    /// Load color into accumulator 4.
    ColorLoad = 8,
    /// Load color into accumulator 4 and end the program.
    ColorLoadEnd = 9,
    /// Load TMU0 result into accumulator 4.
    LoadTmu0 = 10,
    /// Load TMU1 result into accumulator 4.
    LoadTmu1 = 11,
    /// Load alpha into accumulator 4.
    AlphaLoad = 12,
    /// Register-file-B read address holds a small immediate.
    AluImmediate = 13,
    /// Load-immediate instruction.
    LoadImmediate = 14,
    /// Branch instruction.
    Branch = 15,
}

impl Signaling {
    const ALL: [Signaling; 16] = [
        Signaling::Breakpoint,
        Signaling::None,
        Signaling::ThreadSwitch,
        Signaling::ProgramEnd,
        Signaling::WaitForScore,
        Signaling::ScoreUnlock,
        Signaling::LastThreadSwitch,
        Signaling::CoverageLoad,
        Signaling::ColorLoad,
        Signaling::ColorLoadEnd,
        Signaling::LoadTmu0,
        Signaling::LoadTmu1,
        Signaling::AlphaLoad,
        Signaling::AluImmediate,
        Signaling::LoadImmediate,
        Signaling::Branch,
    ];

    /// Decode a 4-bit field.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or_else(|| invalid("signal", raw))
    }

    /// Raw field value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Mnemonic; empty for [`Signaling::None`].
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Signaling::Breakpoint => "bkpt",
            Signaling::None => "",
            Signaling::ThreadSwitch => "thrsw",
            Signaling::ProgramEnd => "thrend",
            Signaling::WaitForScore => "scorew",
            Signaling::ScoreUnlock => "scoreu",
            Signaling::LastThreadSwitch => "lthrsw",
            Signaling::CoverageLoad => "loadcov",
            Signaling::ColorLoad => "loadc",
            Signaling::ColorLoadEnd => "loadc_end",
            Signaling::LoadTmu0 => "load_tmu0",
            Signaling::LoadTmu1 => "load_tmu1",
            Signaling::AlphaLoad => "loada",
            Signaling::AluImmediate => "imm",
            Signaling::LoadImmediate => "load_imm",
            Signaling::Branch => "br",
        }
    }

    /// Whether the signal does more than select the instruction format.
    pub const fn has_side_effects(self) -> bool {
        !matches!(
            self,
            Signaling::None | Signaling::AluImmediate | Signaling::LoadImmediate
        )
    }

    /// Whether the signal loads a peripheral result into accumulator 4.
    pub const fn triggers_read_of_r4(self) -> bool {
        matches!(
            self,
            Signaling::AlphaLoad
                | Signaling::ColorLoad
                | Signaling::ColorLoadEnd
                | Signaling::CoverageLoad
                | Signaling::LoadTmu0
                | Signaling::LoadTmu1
        )
    }
}

impl fmt::Display for Signaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Whether the instruction updates the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SetFlag {
    /// Flags unchanged.
    #[default]
    DontSet = 0,
    /// Flags updated from the flag-setting pipeline.
    SetFlags = 1,
}

impl SetFlag {
    /// Decode a 1-bit field.
    pub fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(SetFlag::DontSet),
            1 => Ok(SetFlag::SetFlags),
            _ => Err(invalid("set-flags bit", raw)),
        }
    }

    /// Mnemonic; empty when flags are not set.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            SetFlag::DontSet => "",
            SetFlag::SetFlags => "setf",
        }
    }
}

/// Which register file each pipeline writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WriteSwap {
    /// Add writes file A, mul writes file B.
    #[default]
    DontSwap = 0,
    /// Add writes file B, mul writes file A.
    Swap = 1,
}

impl WriteSwap {
    /// Decode a 1-bit field.
    pub fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(WriteSwap::DontSwap),
            1 => Ok(WriteSwap::Swap),
            _ => Err(invalid("write-swap bit", raw)),
        }
    }

    /// Whether the add pipeline writes register file A.
    #[inline]
    pub const fn add_writes_a(self) -> bool {
        matches!(self, WriteSwap::DontSwap)
    }
}

/// Operand source selected by a 3-bit input multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum InputMultiplex {
    /// Accumulator 0.
    #[default]
    Acc0 = 0,
    /// Accumulator 1.
    Acc1 = 1,
    /// Accumulator 2.
    Acc2 = 2,
    /// Accumulator 3.
    Acc3 = 3,
    /// Accumulator 4 (peripheral results).
    Acc4 = 4,
    /// Accumulator 5.
    Acc5 = 5,
    /// Register file A at the read address A.
    RegA = 6,
    /// Register file B at the read address B (or the small immediate).
    RegB = 7,
}

impl InputMultiplex {
    const ALL: [InputMultiplex; 8] = [
        InputMultiplex::Acc0,
        InputMultiplex::Acc1,
        InputMultiplex::Acc2,
        InputMultiplex::Acc3,
        InputMultiplex::Acc4,
        InputMultiplex::Acc5,
        InputMultiplex::RegA,
        InputMultiplex::RegB,
    ];

    /// Decode a 3-bit field.
    pub fn from_raw(raw: u8) -> Result<Self> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or_else(|| invalid("input multiplex", raw))
    }

    /// Raw field value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Accumulator index for the accumulator selectors.
    pub const fn accumulator(self) -> Option<u8> {
        match self {
            InputMultiplex::RegA | InputMultiplex::RegB => None,
            other => Some(other as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_inversion() {
        for cond in ConditionCode::ALL {
            assert_eq!(cond.invert().invert(), cond);
            assert_ne!(cond.invert(), cond);
            assert!(cond.is_inversion_of(cond.invert()));
            assert!(cond.invert().is_inversion_of(cond));
        }
        assert_eq!(ConditionCode::ZeroSet.invert(), ConditionCode::ZeroClear);
        assert!(!ConditionCode::ZeroSet.is_inversion_of(ConditionCode::NegativeClear));
    }

    #[test]
    fn test_condition_to_branch() {
        assert_eq!(ConditionCode::Always.to_branch_condition().unwrap(), BranchCond::Always);
        assert_eq!(ConditionCode::ZeroSet.to_branch_condition().unwrap(), BranchCond::AnyZSet);
        assert_eq!(ConditionCode::ZeroClear.to_branch_condition().unwrap(), BranchCond::AllZClear);
        assert_eq!(ConditionCode::CarryClear.to_branch_condition().unwrap(), BranchCond::AllCClear);
        assert!(ConditionCode::Never.to_branch_condition().is_err());
    }

    #[test]
    fn test_condition_encoding() {
        for (i, cond) in ConditionCode::ALL.iter().enumerate() {
            assert_eq!(cond.raw() as usize, i);
            assert_eq!(ConditionCode::from_raw(i as u8).unwrap(), *cond);
        }
        assert!(ConditionCode::from_raw(8).is_err());
        assert_eq!(ConditionCode::Always.to_string(), "");
        assert_eq!(ConditionCode::NegativeClear.to_string(), "ifnc");
    }

    #[test]
    fn test_branch_condition_decode() {
        assert_eq!(BranchCond::from_raw(15).unwrap(), BranchCond::Always);
        assert_eq!(BranchCond::from_raw(9).unwrap().mnemonic(), "ifallcc");
        assert!(BranchCond::from_raw(12).is_err());
        assert!(BranchCond::from_raw(16).is_err());
    }

    #[test]
    fn test_signal_predicates() {
        assert!(!Signaling::None.has_side_effects());
        assert!(!Signaling::AluImmediate.has_side_effects());
        assert!(!Signaling::LoadImmediate.has_side_effects());
        assert!(Signaling::ThreadSwitch.has_side_effects());
        assert!(Signaling::LoadTmu0.triggers_read_of_r4());
        assert!(Signaling::CoverageLoad.triggers_read_of_r4());
        assert!(!Signaling::ProgramEnd.triggers_read_of_r4());
        assert_eq!(Signaling::from_raw(13).unwrap(), Signaling::AluImmediate);
        assert_eq!(Signaling::from_raw(3).unwrap().to_string(), "thrend");
        assert!(Signaling::from_raw(16).is_err());
    }

    #[test]
    fn test_multiplex() {
        assert_eq!(InputMultiplex::from_raw(4).unwrap(), InputMultiplex::Acc4);
        assert_eq!(InputMultiplex::Acc5.accumulator(), Some(5));
        assert_eq!(InputMultiplex::RegB.accumulator(), None);
        assert!(InputMultiplex::from_raw(8).is_err());
        assert!(WriteSwap::DontSwap.add_writes_a());
        assert!(!WriteSwap::Swap.add_writes_a());
        assert_eq!(SetFlag::SetFlags.mnemonic(), "setf");
    }
}
