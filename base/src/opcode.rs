use std::fmt::{self, Display, Formatter};

/// The operation field of an instruction word.
///
/// Most opcodes are small integers understood by the CPU.  The two
/// debug opcodes are emitted as words rather than numbers; the
/// simulator recognises them by name and uses them to switch its
/// tracing on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    CpuExec,
    Copy,
    Jump,
    JumpIf,
    JumpIfNot,
    JumpErr,
    DebugOn,
    DebugOff,
}

impl Opcode {
    /// The numeric encoding of the opcode, for the opcodes which
    /// have one.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        match self {
            Opcode::CpuExec => Some(0),
            Opcode::Copy => Some(1),
            Opcode::Jump => Some(3),
            Opcode::JumpIf => Some(4),
            Opcode::JumpIfNot => Some(5),
            Opcode::JumpErr => Some(6),
            Opcode::DebugOn | Opcode::DebugOff => None,
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self, self.number()) {
            (_, Some(n)) => write!(f, "{n}"),
            (Opcode::DebugOff, None) => f.write_str("DEBUG_OFF"),
            (_, None) => f.write_str("DEBUG_ON"),
        }
    }
}

#[test]
fn test_opcode_display() {
    assert_eq!(Opcode::Copy.to_string(), "1");
    assert_eq!(Opcode::CpuExec.to_string(), "0");
    assert_eq!(Opcode::Jump.to_string(), "3");
    assert_eq!(Opcode::JumpIf.to_string(), "4");
    assert_eq!(Opcode::JumpIfNot.to_string(), "5");
    assert_eq!(Opcode::JumpErr.to_string(), "6");
    assert_eq!(Opcode::DebugOn.to_string(), "DEBUG_ON");
    assert_eq!(Opcode::DebugOff.to_string(), "DEBUG_OFF");
}
