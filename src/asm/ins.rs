use std::fmt;

use serde::Serialize;

use crate::asm::debuginfo::InsDebug;
use crate::mutf8::MUtf8String;

/// Declares the opcode enum, the index table and the mnemonics in one
/// sweep so the three can never drift apart. The entry order mirrors the
/// shared instruction list the encoder assigns its integer indices from;
/// appending is safe, reordering is not.
macro_rules! instruction_list {
    ($(($variant:ident, $mnemonic:literal)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Opcode {
            Invalid,
            $($variant,)*
        }

        pub const OPCODE_TABLE: &[Opcode] = &[
            $(Opcode::$variant,)*
        ];

        impl Opcode {
            pub fn mnemonic(self) -> &'static str {
                match self {
                    Opcode::Invalid => "invalid",
                    $(Opcode::$variant => $mnemonic,)*
                }
            }
        }
    };
}

instruction_list! {
    (Nop, "nop"),
    (Mov, "mov"),
    (Mov64, "mov.64"),
    (MovObj, "mov.obj"),
    (Movi, "movi"),
    (Movi64, "movi.64"),
    (Fmovi64, "fmovi.64"),
    (MovNull, "mov.null"),
    (Lda, "lda"),
    (Lda64, "lda.64"),
    (LdaObj, "lda.obj"),
    (Ldai, "ldai"),
    (Ldai64, "ldai.64"),
    (Fldai64, "fldai.64"),
    (LdaStr, "lda.str"),
    (LdaType, "lda.type"),
    (LdaNull, "lda.null"),
    (Sta, "sta"),
    (Sta64, "sta.64"),
    (StaObj, "sta.obj"),
    (Cmp64, "cmp.64"),
    (Ucmp, "ucmp"),
    (Ucmp64, "ucmp.64"),
    (Jmp, "jmp"),
    (Jeqz, "jeqz"),
    (Jnez, "jnez"),
    (Jltz, "jltz"),
    (Jgtz, "jgtz"),
    (Jlez, "jlez"),
    (Jgez, "jgez"),
    (Jeq, "jeq"),
    (Jne, "jne"),
    (Jlt, "jlt"),
    (Jgt, "jgt"),
    (Jle, "jle"),
    (Jge, "jge"),
    (Return, "return"),
    (Return64, "return.64"),
    (ReturnObj, "return.obj"),
    (ReturnVoid, "return.void"),
    (CallShort, "call.short"),
    (Call, "call"),
    (CallRange, "call.range"),
    (CallVirtShort, "call.virt.short"),
    (CallVirt, "call.virt"),
    (CallVirtRange, "call.virt.range"),
    (MovDyn, "mov.dyn"),
    (LdaDyn, "lda.dyn"),
    (StaDyn, "sta.dyn"),
    (LdaiDyn, "ldai.dyn"),
    (FldaiDyn, "fldai.dyn"),
    (ReturnDyn, "return.dyn"),
    (CalliDynShort, "calli.dyn.short"),
    (CalliDyn, "calli.dyn"),
    (CalliDynRange, "calli.dyn.range"),
    (EcmaLdnan, "ecma.ldnan"),
    (EcmaLdinfinity, "ecma.ldinfinity"),
    (EcmaLdglobalthis, "ecma.ldglobalthis"),
    (EcmaLdundefined, "ecma.ldundefined"),
    (EcmaLdnull, "ecma.ldnull"),
    (EcmaLdsymbol, "ecma.ldsymbol"),
    (EcmaLdglobal, "ecma.ldglobal"),
    (EcmaLdtrue, "ecma.ldtrue"),
    (EcmaLdfalse, "ecma.ldfalse"),
    (EcmaLdlexenvdyn, "ecma.ldlexenvdyn"),
    (EcmaGetunmappedargs, "ecma.getunmappedargs"),
    (EcmaAsyncfunctionenter, "ecma.asyncfunctionenter"),
    (EcmaLdhole, "ecma.ldhole"),
    (EcmaReturnundefined, "ecma.returnundefined"),
    (EcmaCreateemptyobject, "ecma.createemptyobject"),
    (EcmaCreateemptyarray, "ecma.createemptyarray"),
    (EcmaGetiterator, "ecma.getiterator"),
    (EcmaGetasynciterator, "ecma.getasynciterator"),
    (EcmaGetpropiterator, "ecma.getpropiterator"),
    (EcmaCloseiterator, "ecma.closeiterator"),
    (EcmaPoplexenvdyn, "ecma.poplexenvdyn"),
    (EcmaLdhomeobject, "ecma.ldhomeobject"),
    (EcmaDebugger, "ecma.debugger"),
    (EcmaThrowdyn, "ecma.throwdyn"),
    (EcmaTypeofdyn, "ecma.typeofdyn"),
    (EcmaThrowconstassignment, "ecma.throwconstassignment"),
    (EcmaThrowthrownotexists, "ecma.throwthrownotexists"),
    (EcmaThrowpatternnoncoercible, "ecma.throwpatternnoncoercible"),
    (EcmaThrowifnotobject, "ecma.throwifnotobject"),
    (EcmaThrowundefinedifhole, "ecma.throwundefinedifhole"),
    (EcmaThrowdeletesuperproperty, "ecma.throwdeletesuperproperty"),
    (EcmaAdd2dyn, "ecma.add2dyn"),
    (EcmaSub2dyn, "ecma.sub2dyn"),
    (EcmaMul2dyn, "ecma.mul2dyn"),
    (EcmaDiv2dyn, "ecma.div2dyn"),
    (EcmaMod2dyn, "ecma.mod2dyn"),
    (EcmaEqdyn, "ecma.eqdyn"),
    (EcmaNoteqdyn, "ecma.noteqdyn"),
    (EcmaLessdyn, "ecma.lessdyn"),
    (EcmaLesseqdyn, "ecma.lesseqdyn"),
    (EcmaGreaterdyn, "ecma.greaterdyn"),
    (EcmaGreatereqdyn, "ecma.greatereqdyn"),
    (EcmaShl2dyn, "ecma.shl2dyn"),
    (EcmaShr2dyn, "ecma.shr2dyn"),
    (EcmaAshr2dyn, "ecma.ashr2dyn"),
    (EcmaAnd2dyn, "ecma.and2dyn"),
    (EcmaOr2dyn, "ecma.or2dyn"),
    (EcmaXor2dyn, "ecma.xor2dyn"),
    (EcmaTonumber, "ecma.tonumber"),
    (EcmaNegdyn, "ecma.negdyn"),
    (EcmaNotdyn, "ecma.notdyn"),
    (EcmaIncdyn, "ecma.incdyn"),
    (EcmaDecdyn, "ecma.decdyn"),
    (EcmaExpdyn, "ecma.expdyn"),
    (EcmaIsindyn, "ecma.isindyn"),
    (EcmaInstanceofdyn, "ecma.instanceofdyn"),
    (EcmaStrictnoteqdyn, "ecma.strictnoteqdyn"),
    (EcmaStricteqdyn, "ecma.stricteqdyn"),
    (EcmaIstrue, "ecma.istrue"),
    (EcmaIsfalse, "ecma.isfalse"),
    (EcmaCallarg0dyn, "ecma.callarg0dyn"),
    (EcmaCallarg1dyn, "ecma.callarg1dyn"),
    (EcmaCallargs2dyn, "ecma.callargs2dyn"),
    (EcmaCallargs3dyn, "ecma.callargs3dyn"),
    (EcmaCallirangedyn, "ecma.callirangedyn"),
    (EcmaCallithisrangedyn, "ecma.callithisrangedyn"),
    (EcmaCallspreaddyn, "ecma.callspreaddyn"),
    (EcmaNewobjdynrange, "ecma.newobjdynrange"),
    (EcmaNewobjspreaddyn, "ecma.newobjspreaddyn"),
    (EcmaSupercall, "ecma.supercall"),
    (EcmaSupercallspread, "ecma.supercallspread"),
    (EcmaDefinefuncdyn, "ecma.definefuncdyn"),
    (EcmaDefinencfuncdyn, "ecma.definencfuncdyn"),
    (EcmaDefinegeneratorfunc, "ecma.definegeneratorfunc"),
    (EcmaDefineasyncfunc, "ecma.defineasyncfunc"),
    (EcmaDefinemethod, "ecma.definemethod"),
    (EcmaDefineclasswithbuffer, "ecma.defineclasswithbuffer"),
    (EcmaDefinegettersetterbyvalue, "ecma.definegettersetterbyvalue"),
    (EcmaNewlexenvdyn, "ecma.newlexenvdyn"),
    (EcmaCopyrestargs, "ecma.copyrestargs"),
    (EcmaLdlexvardyn, "ecma.ldlexvardyn"),
    (EcmaStlexvardyn, "ecma.stlexvardyn"),
    (EcmaLdobjbyname, "ecma.ldobjbyname"),
    (EcmaStobjbyname, "ecma.stobjbyname"),
    (EcmaLdobjbyvalue, "ecma.ldobjbyvalue"),
    (EcmaStobjbyvalue, "ecma.stobjbyvalue"),
    (EcmaLdobjbyindex, "ecma.ldobjbyindex"),
    (EcmaStobjbyindex, "ecma.stobjbyindex"),
    (EcmaStownbyindex, "ecma.stownbyindex"),
    (EcmaStownbyname, "ecma.stownbyname"),
    (EcmaStownbyvalue, "ecma.stownbyvalue"),
    (EcmaStownbynamewithnameset, "ecma.stownbynamewithnameset"),
    (EcmaStownbyvaluewithnameset, "ecma.stownbyvaluewithnameset"),
    (EcmaLdsuperbyname, "ecma.ldsuperbyname"),
    (EcmaStsuperbyname, "ecma.stsuperbyname"),
    (EcmaLdsuperbyvalue, "ecma.ldsuperbyvalue"),
    (EcmaStsuperbyvalue, "ecma.stsuperbyvalue"),
    (EcmaTryldglobalbyname, "ecma.tryldglobalbyname"),
    (EcmaTrystglobalbyname, "ecma.trystglobalbyname"),
    (EcmaLdglobalvar, "ecma.ldglobalvar"),
    (EcmaStglobalvar, "ecma.stglobalvar"),
    (EcmaStconsttoglobalrecord, "ecma.stconsttoglobalrecord"),
    (EcmaStlettoglobalrecord, "ecma.stlettoglobalrecord"),
    (EcmaStclasstoglobalrecord, "ecma.stclasstoglobalrecord"),
    (EcmaLdmodulevar, "ecma.ldmodulevar"),
    (EcmaStmodulevar, "ecma.stmodulevar"),
    (EcmaGetmodulenamespace, "ecma.getmodulenamespace"),
    (EcmaCreatearraywithbuffer, "ecma.createarraywithbuffer"),
    (EcmaCreateobjectwithbuffer, "ecma.createobjectwithbuffer"),
    (EcmaCreateobjecthavingmethod, "ecma.createobjecthavingmethod"),
    (EcmaCreateobjectwithexcludedkeys, "ecma.createobjectwithexcludedkeys"),
    (EcmaCreateregexpwithliteral, "ecma.createregexpwithliteral"),
    (EcmaCreateiterresultobj, "ecma.createiterresultobj"),
    (EcmaCopydataproperties, "ecma.copydataproperties"),
    (EcmaSetobjectwithproto, "ecma.setobjectwithproto"),
    (EcmaStarrayspread, "ecma.starrayspread"),
    (EcmaGetnextpropname, "ecma.getnextpropname"),
    (EcmaGettemplateobject, "ecma.gettemplateobject"),
    (EcmaGetiteratornext, "ecma.getiteratornext"),
    (EcmaCreategeneratorobj, "ecma.creategeneratorobj"),
    (EcmaCreateasyncgeneratorobj, "ecma.createasyncgeneratorobj"),
    (EcmaResumegenerator, "ecma.resumegenerator"),
    (EcmaGetresumemode, "ecma.getresumemode"),
    (EcmaSuspendgenerator, "ecma.suspendgenerator"),
    (EcmaSuspendasyncgenerator, "ecma.suspendasyncgenerator"),
    (EcmaAsyncfunctionawaituncaught, "ecma.asyncfunctionawaituncaught"),
    (EcmaAsyncfunctionresolve, "ecma.asyncfunctionresolve"),
    (EcmaAsyncfunctionreject, "ecma.asyncfunctionreject"),
    (EcmaAsyncgeneratorresolve, "ecma.asyncgeneratorresolve"),
    (EcmaAsyncgeneratorreject, "ecma.asyncgeneratorreject"),
    (EcmaThrowifsupernotcorrectcall, "ecma.throwifsupernotcorrectcall"),
    (EcmaDynamicimport, "ecma.dynamicimport"),
}

/// Resolves an encoder opcode index against the table.
pub fn opcode_by_index(index: i32) -> Option<Opcode> {
    usize::try_from(index).ok().and_then(|i| OPCODE_TABLE.get(i)).copied()
}

/// Looks up the encoder index of an opcode; test helper for building
/// streams by mnemonic.
pub fn index_of_opcode(opcode: Opcode) -> Option<usize> {
    OPCODE_TABLE.iter().position(|&o| o == opcode)
}

/// An immediate operand. The decoder keeps exact-integer values in i32
/// range integral so the emitter can tell `1` from `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Imm {
    Int(i64),
    Double(f64),
}

impl Imm {
    pub fn from_number(value: f64) -> Imm {
        if value.fract() == 0.0
            && value >= f64::from(i32::MIN)
            && value <= f64::from(i32::MAX)
        {
            Imm::Int(value as i64)
        } else {
            Imm::Double(value)
        }
    }
}

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imm::Int(v) => write!(f, "{v}"),
            Imm::Double(v) => write!(f, "{v:?}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ins {
    pub opcode: Opcode,
    pub regs: Vec<u32>,
    pub ids: Vec<MUtf8String>,
    pub imms: Vec<Imm>,
    pub label: Option<String>,
    pub debug: InsDebug,
}

impl Default for Ins {
    fn default() -> Self {
        Ins {
            opcode: Opcode::Invalid,
            regs: Vec::new(),
            ids: Vec::new(),
            imms: Vec::new(),
            label: None,
            debug: InsDebug::default(),
        }
    }
}

impl Ins {
    pub fn new(opcode: Opcode) -> Self {
        Ins { opcode, ..Ins::default() }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        f.write_str(self.opcode.mnemonic())?;
        let mut operands: Vec<String> = Vec::new();
        operands.extend(self.regs.iter().map(|r| format!("v{r}")));
        operands.extend(self.ids.iter().map(|id| id.to_string()));
        operands.extend(self.imms.iter().map(|imm| imm.to_string()));
        if !operands.is_empty() {
            write!(f, " {}", operands.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_index_round_trips() {
        let idx = index_of_opcode(Opcode::StaDyn).unwrap();
        assert_eq!(opcode_by_index(idx as i32), Some(Opcode::StaDyn));
    }

    #[test]
    fn out_of_range_index_is_unknown() {
        assert_eq!(opcode_by_index(-1), None);
        assert_eq!(opcode_by_index(OPCODE_TABLE.len() as i32), None);
    }

    #[test]
    fn small_integers_stay_integral() {
        assert_eq!(Imm::from_number(1.0), Imm::Int(1));
        assert_eq!(Imm::from_number(-2147483648.0), Imm::Int(-2147483648));
    }

    #[test]
    fn fractional_values_stay_double() {
        assert_eq!(Imm::from_number(1.5), Imm::Double(1.5));
    }

    #[test]
    fn integral_values_beyond_i32_stay_double() {
        assert_eq!(Imm::from_number(3000000000.0), Imm::Double(3000000000.0));
    }

    #[test]
    fn non_finite_values_stay_double() {
        assert!(matches!(Imm::from_number(f64::NAN), Imm::Double(_)));
        assert!(matches!(Imm::from_number(f64::INFINITY), Imm::Double(_)));
    }
}
