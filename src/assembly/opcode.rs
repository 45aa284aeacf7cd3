//! JVM opcodes as they appear in a method body's instruction tree.
//!
//! The set follows the tree representation used by bytecode rewriting tools: the short
//! forms that only exist in the binary encoding (`iload_0`, `ldc_w`, `goto_w`, `wide`, ...)
//! are folded into their canonical opcode by the decoder and never show up here.

use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// A JVM instruction opcode.
///
/// The discriminant of every variant is the opcode byte from the JVM specification, so
/// [`Opcode::code`] is a plain cast. The [`std::fmt::Display`] form is the mnemonic.
///
/// # Examples
///
/// ```rust
/// use bytefold::assembly::Opcode;
///
/// assert_eq!(Opcode::Ldc.code(), 0x12);
/// assert_eq!(Opcode::IconstM1.to_string(), "iconst_m1");
/// assert_eq!(Opcode::from_code(0xB8), Some(Opcode::Invokestatic));
/// assert_eq!(Opcode::from_code(0xBA), Some(Opcode::Invokedynamic));
/// ```
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Opcode {
    Nop = 0x00,
    #[strum(to_string = "aconst_null")]
    AconstNull = 0x01,
    #[strum(to_string = "iconst_m1")]
    IconstM1 = 0x02,
    #[strum(to_string = "iconst_0")]
    Iconst0 = 0x03,
    #[strum(to_string = "iconst_1")]
    Iconst1 = 0x04,
    #[strum(to_string = "iconst_2")]
    Iconst2 = 0x05,
    #[strum(to_string = "iconst_3")]
    Iconst3 = 0x06,
    #[strum(to_string = "iconst_4")]
    Iconst4 = 0x07,
    #[strum(to_string = "iconst_5")]
    Iconst5 = 0x08,
    #[strum(to_string = "lconst_0")]
    Lconst0 = 0x09,
    #[strum(to_string = "lconst_1")]
    Lconst1 = 0x0A,
    #[strum(to_string = "fconst_0")]
    Fconst0 = 0x0B,
    #[strum(to_string = "fconst_1")]
    Fconst1 = 0x0C,
    #[strum(to_string = "fconst_2")]
    Fconst2 = 0x0D,
    #[strum(to_string = "dconst_0")]
    Dconst0 = 0x0E,
    #[strum(to_string = "dconst_1")]
    Dconst1 = 0x0F,
    Bipush = 0x10,
    Sipush = 0x11,
    Ldc = 0x12,
    Iload = 0x15,
    Lload = 0x16,
    Fload = 0x17,
    Dload = 0x18,
    Aload = 0x19,
    Iaload = 0x2E,
    Laload = 0x2F,
    Faload = 0x30,
    Daload = 0x31,
    Aaload = 0x32,
    Baload = 0x33,
    Caload = 0x34,
    Saload = 0x35,
    Istore = 0x36,
    Lstore = 0x37,
    Fstore = 0x38,
    Dstore = 0x39,
    Astore = 0x3A,
    Iastore = 0x4F,
    Lastore = 0x50,
    Fastore = 0x51,
    Dastore = 0x52,
    Aastore = 0x53,
    Bastore = 0x54,
    Castore = 0x55,
    Sastore = 0x56,
    Pop = 0x57,
    Pop2 = 0x58,
    Dup = 0x59,
    #[strum(to_string = "dup_x1")]
    DupX1 = 0x5A,
    #[strum(to_string = "dup_x2")]
    DupX2 = 0x5B,
    Dup2 = 0x5C,
    #[strum(to_string = "dup2_x1")]
    Dup2X1 = 0x5D,
    #[strum(to_string = "dup2_x2")]
    Dup2X2 = 0x5E,
    Swap = 0x5F,
    Iadd = 0x60,
    Ladd = 0x61,
    Fadd = 0x62,
    Dadd = 0x63,
    Isub = 0x64,
    Lsub = 0x65,
    Fsub = 0x66,
    Dsub = 0x67,
    Imul = 0x68,
    Lmul = 0x69,
    Fmul = 0x6A,
    Dmul = 0x6B,
    Idiv = 0x6C,
    Ldiv = 0x6D,
    Fdiv = 0x6E,
    Ddiv = 0x6F,
    Irem = 0x70,
    Lrem = 0x71,
    Frem = 0x72,
    Drem = 0x73,
    Ineg = 0x74,
    Lneg = 0x75,
    Fneg = 0x76,
    Dneg = 0x77,
    Ishl = 0x78,
    Lshl = 0x79,
    Ishr = 0x7A,
    Lshr = 0x7B,
    Iushr = 0x7C,
    Lushr = 0x7D,
    Iand = 0x7E,
    Land = 0x7F,
    Ior = 0x80,
    Lor = 0x81,
    Ixor = 0x82,
    Lxor = 0x83,
    Iinc = 0x84,
    I2l = 0x85,
    I2f = 0x86,
    I2d = 0x87,
    L2i = 0x88,
    L2f = 0x89,
    L2d = 0x8A,
    F2i = 0x8B,
    F2l = 0x8C,
    F2d = 0x8D,
    D2i = 0x8E,
    D2l = 0x8F,
    D2f = 0x90,
    I2b = 0x91,
    I2c = 0x92,
    I2s = 0x93,
    Lcmp = 0x94,
    Fcmpl = 0x95,
    Fcmpg = 0x96,
    Dcmpl = 0x97,
    Dcmpg = 0x98,
    Ifeq = 0x99,
    Ifne = 0x9A,
    Iflt = 0x9B,
    Ifge = 0x9C,
    Ifgt = 0x9D,
    Ifle = 0x9E,
    #[strum(to_string = "if_icmpeq")]
    IfIcmpeq = 0x9F,
    #[strum(to_string = "if_icmpne")]
    IfIcmpne = 0xA0,
    #[strum(to_string = "if_icmplt")]
    IfIcmplt = 0xA1,
    #[strum(to_string = "if_icmpge")]
    IfIcmpge = 0xA2,
    #[strum(to_string = "if_icmpgt")]
    IfIcmpgt = 0xA3,
    #[strum(to_string = "if_icmple")]
    IfIcmple = 0xA4,
    #[strum(to_string = "if_acmpeq")]
    IfAcmpeq = 0xA5,
    #[strum(to_string = "if_acmpne")]
    IfAcmpne = 0xA6,
    Goto = 0xA7,
    Jsr = 0xA8,
    Ret = 0xA9,
    Tableswitch = 0xAA,
    Lookupswitch = 0xAB,
    Ireturn = 0xAC,
    Lreturn = 0xAD,
    Freturn = 0xAE,
    Dreturn = 0xAF,
    Areturn = 0xB0,
    Return = 0xB1,
    Getstatic = 0xB2,
    Putstatic = 0xB3,
    Getfield = 0xB4,
    Putfield = 0xB5,
    Invokevirtual = 0xB6,
    Invokespecial = 0xB7,
    Invokestatic = 0xB8,
    Invokeinterface = 0xB9,
    Invokedynamic = 0xBA,
    New = 0xBB,
    Newarray = 0xBC,
    Anewarray = 0xBD,
    Arraylength = 0xBE,
    Athrow = 0xBF,
    Checkcast = 0xC0,
    Instanceof = 0xC1,
    Monitorenter = 0xC2,
    Monitorexit = 0xC3,
    Multianewarray = 0xC5,
    Ifnull = 0xC6,
    Ifnonnull = 0xC7,
}

impl Opcode {
    /// Returns the opcode byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up the opcode for an opcode byte.
    ///
    /// Returns `None` for bytes that are unassigned or only exist in the binary encoding.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::iter().find(|op| op.code() == code)
    }

    /// Returns the mnemonic of this opcode.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    /// Returns `true` for conditional and unconditional jumps (including `jsr`).
    #[must_use]
    pub const fn is_jump(self) -> bool {
        matches!(
            self,
            Self::Ifeq
                | Self::Ifne
                | Self::Iflt
                | Self::Ifge
                | Self::Ifgt
                | Self::Ifle
                | Self::IfIcmpeq
                | Self::IfIcmpne
                | Self::IfIcmplt
                | Self::IfIcmpge
                | Self::IfIcmpgt
                | Self::IfIcmple
                | Self::IfAcmpeq
                | Self::IfAcmpne
                | Self::Goto
                | Self::Jsr
                | Self::Ifnull
                | Self::Ifnonnull
        )
    }

    /// Returns `true` for the four field access opcodes.
    #[must_use]
    pub const fn is_field_access(self) -> bool {
        matches!(
            self,
            Self::Getstatic | Self::Putstatic | Self::Getfield | Self::Putfield
        )
    }

    /// Returns `true` for the method invocation opcodes, `invokedynamic` included.
    #[must_use]
    pub const fn is_invoke(self) -> bool {
        matches!(
            self,
            Self::Invokevirtual
                | Self::Invokespecial
                | Self::Invokestatic
                | Self::Invokeinterface
                | Self::Invokedynamic
        )
    }

    /// Returns `true` if the instruction has no receiver on the stack.
    #[must_use]
    pub const fn is_static_access(self) -> bool {
        matches!(
            self,
            Self::Getstatic | Self::Putstatic | Self::Invokestatic | Self::Invokedynamic
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for op in Opcode::iter() {
            assert_eq!(Opcode::from_code(op.code()), Some(op), "{op}");
        }
    }

    #[test]
    fn test_binary_only_forms_absent() {
        // iload_0, ldc_w, ldc2_w, goto_w, wide
        for code in [0x1A, 0x13, 0x14, 0xC8, 0xC4] {
            assert_eq!(Opcode::from_code(code), None);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::Nop.mnemonic(), "nop");
        assert_eq!(Opcode::AconstNull.mnemonic(), "aconst_null");
        assert_eq!(Opcode::Iconst5.to_string(), "iconst_5");
        assert_eq!(Opcode::Dup2X1.to_string(), "dup2_x1");
        assert_eq!(Opcode::IfIcmpge.to_string(), "if_icmpge");
        assert_eq!(Opcode::Invokevirtual.to_string(), "invokevirtual");
        assert_eq!(Opcode::I2l.to_string(), "i2l");
    }

    #[test]
    fn test_categories() {
        assert!(Opcode::Goto.is_jump());
        assert!(Opcode::Ifnonnull.is_jump());
        assert!(!Opcode::Tableswitch.is_jump());
        assert!(Opcode::Getstatic.is_field_access());
        assert!(Opcode::Getstatic.is_static_access());
        assert!(!Opcode::Getfield.is_static_access());
        assert!(Opcode::Invokeinterface.is_invoke());
        assert!(!Opcode::Getfield.is_invoke());
    }

    #[test]
    fn test_count() {
        assert_eq!(Opcode::COUNT, Opcode::iter().count());
    }
}
