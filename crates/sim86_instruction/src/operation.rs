use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    // Data transfer
    MOV, // Move

    // Arithmetic
    ADD, // Add
    SUB, // Subtract
    CMP, // Compare

    // Control transfer
    JO,     // Jump on overflow
    JNO,    // Jump on not overflow
    JB,     // Jump on below/not above or equal (alias JNAE)
    JAE,    // Jump on above or equal/not below (alias JNB)
    JE,     // Jump on equal/zero (alias JZ)
    JNE,    // Jump on not equal/not zero (alias JNZ)
    JBE,    // Jump on below or equal/not above (alias JNA)
    JA,     // Jump on above/not below or equal (alias JNBE)
    JS,     // Jump on sign
    JNS,    // Jump on not sign
    JP,     // Jump on parity/parity even (alias JPE)
    JNP,    // Jump on not parity/parity odd (alias JPO)
    JL,     // Jump on less/not greater or equal (alias JNGE)
    JGE,    // Jump on greater or equal/not less (alias JNL)
    JLE,    // Jump on less or equal/not greater (alias JNG)
    JG,     // Jump on greater/not less or equal (alias JNLE)
    LOOPNE, // Loop while not zero/not equal (alias LOOPNZ)
    LOOPE,  // Loop while zero/equal (alias LOOPZ)
    LOOP,   // Loop CX times
    JCXZ,   // Jump on CX zero
}

impl Operation {
    pub fn is_jump(&self) -> bool {
        !matches!(
            self,
            Operation::MOV | Operation::ADD | Operation::SUB | Operation::CMP
        )
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Operation::*;

        let mnemonic = match self {
            MOV => "mov",
            ADD => "add",
            SUB => "sub",
            CMP => "cmp",
            JO => "jo",
            JNO => "jno",
            JB => "jb",
            JAE => "jae",
            JE => "je",
            JNE => "jne",
            JBE => "jbe",
            JA => "ja",
            JS => "js",
            JNS => "jns",
            JP => "jp",
            JNP => "jnp",
            JL => "jl",
            JGE => "jge",
            JLE => "jle",
            JG => "jg",
            LOOPNE => "loopne",
            LOOPE => "loope",
            LOOP => "loop",
            JCXZ => "jcxz",
        };
        f.write_str(mnemonic)
    }
}
