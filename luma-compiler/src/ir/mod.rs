//! The numeric SSA intermediate representation.
//!
//! A [`Module`] owns functions; a [`Function`] owns its basic blocks and an
//! instruction arena indexed by [`ValueId`]. Every value is a 64-bit float.
//! Parameters and locals live in `alloca` stack slots in the entry block;
//! reads are `load`s and assignments are `store`s.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// Index into a function's instruction arena. Value-producing instructions
/// print as `%N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub usize);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Const(f64),
    /// The i-th incoming argument of the enclosing function.
    Arg(usize),
    Inst(ValueId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Fadd,
    Fsub,
    Fmul,
    Fdiv,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinOp::Fadd => "fadd",
            BinOp::Fsub => "fsub",
            BinOp::Fmul => "fmul",
            BinOp::Fdiv => "fdiv",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    /// A stack slot; `name` records the variable it backs.
    Alloca { name: String },
    Store { value: Operand, slot: ValueId },
    Load { slot: ValueId },
    Bin { op: BinOp, lhs: Operand, rhs: Operand },
    Call { callee: String, args: Vec<Operand> },
    Ret { value: Operand },
}

impl Inst {
    pub fn produces_value(&self) -> bool {
        !matches!(self, Inst::Store { .. } | Inst::Ret { .. })
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Inst::Ret { .. })
    }
}

#[derive(Debug)]
pub struct Block {
    pub label: String,
    pub insts: Vec<ValueId>,
}

#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub blocks: Vec<Block>,
    pub insts: Vec<Inst>,
}

impl Function {
    pub fn new(name: String, params: Vec<String>) -> Self {
        Self {
            name,
            params,
            blocks: vec![Block {
                label: "entry".to_string(),
                insts: Vec::new(),
            }],
            insts: Vec::new(),
        }
    }

    pub fn entry(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn inst(&self, id: ValueId) -> &Inst {
        &self.insts[id.0]
    }

    /// Append an instruction to the entry block.
    pub fn push(&mut self, inst: Inst) -> ValueId {
        let id = ValueId(self.insts.len());
        self.insts.push(inst);
        self.blocks[0].insts.push(id);
        id
    }

    pub fn verify(&self, module: &Module) -> Result<(), VerifyError> {
        if self.blocks.is_empty() {
            return Err(VerifyError::NoBlocks(self.name.clone()));
        }

        for (block_index, block) in self.blocks.iter().enumerate() {
            if block.insts.is_empty() {
                return Err(VerifyError::EmptyBlock(
                    self.name.clone(),
                    block.label.clone(),
                ));
            }
            for (position, &id) in block.insts.iter().enumerate() {
                let inst = self.inst(id);
                let last = position + 1 == block.insts.len();
                if inst.is_terminator() && !last {
                    return Err(VerifyError::EarlyTerminator(
                        self.name.clone(),
                        block.label.clone(),
                    ));
                }
                if !inst.is_terminator() && last {
                    return Err(VerifyError::MissingTerminator(
                        self.name.clone(),
                        block.label.clone(),
                    ));
                }
                if matches!(inst, Inst::Alloca { .. }) && block_index != 0 {
                    return Err(VerifyError::AllocaOutsideEntry(self.name.clone()));
                }

                match inst {
                    Inst::Alloca { .. } => {}
                    Inst::Store { value, slot } => {
                        self.check_operand(*value, id)?;
                        self.check_slot(*slot, id)?;
                    }
                    Inst::Load { slot } => self.check_slot(*slot, id)?,
                    Inst::Bin { lhs, rhs, .. } => {
                        self.check_operand(*lhs, id)?;
                        self.check_operand(*rhs, id)?;
                    }
                    Inst::Call { callee, args } => {
                        for arg in args {
                            self.check_operand(*arg, id)?;
                        }
                        let Some(target) = module.function(callee) else {
                            return Err(VerifyError::UnknownCallee(
                                self.name.clone(),
                                callee.clone(),
                            ));
                        };
                        if target.params.len() != args.len() {
                            return Err(VerifyError::CalleeArity(
                                callee.clone(),
                                args.len(),
                                target.params.len(),
                            ));
                        }
                    }
                    Inst::Ret { value } => self.check_operand(*value, id)?,
                }
            }
        }

        Ok(())
    }

    fn check_operand(&self, operand: Operand, user: ValueId) -> Result<(), VerifyError> {
        match operand {
            Operand::Const(_) => Ok(()),
            Operand::Arg(index) => {
                if index < self.params.len() {
                    Ok(())
                } else {
                    Err(VerifyError::BadArgIndex(self.name.clone()))
                }
            }
            Operand::Inst(id) => {
                if id.0 >= user.0 {
                    Err(VerifyError::UseBeforeDef(self.name.clone()))
                } else if !self.inst(id).produces_value() {
                    Err(VerifyError::NotAValue(self.name.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn check_slot(&self, slot: ValueId, user: ValueId) -> Result<(), VerifyError> {
        if slot.0 >= user.0 {
            Err(VerifyError::UseBeforeDef(self.name.clone()))
        } else if !matches!(self.inst(slot), Inst::Alloca { .. }) {
            Err(VerifyError::BadSlot(self.name.clone()))
        } else {
            Ok(())
        }
    }

    fn write_operand(&self, operand: Operand, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match operand {
            Operand::Const(value) => write!(f, "{value:?}"),
            Operand::Arg(index) => write!(f, "%{}", self.params[index]),
            Operand::Inst(id) => write!(f, "{id}"),
        }
    }

    fn write_inst(&self, id: ValueId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inst(id) {
            Inst::Alloca { name } => write!(f, "alloca f64 ; {name}"),
            Inst::Store { value, slot } => {
                write!(f, "store f64 ")?;
                self.write_operand(*value, f)?;
                write!(f, ", ptr {slot}")
            }
            Inst::Load { slot } => write!(f, "load f64, ptr {slot}"),
            Inst::Bin { op, lhs, rhs } => {
                write!(f, "{op} f64 ")?;
                self.write_operand(*lhs, f)?;
                write!(f, ", ")?;
                self.write_operand(*rhs, f)
            }
            Inst::Call { callee, args } => {
                write!(f, "call f64 @{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "f64 ")?;
                    self.write_operand(*arg, f)?;
                }
                write!(f, ")")
            }
            Inst::Ret { value } => {
                write!(f, "ret f64 ")?;
                self.write_operand(*value, f)
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define f64 @{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "f64 %{param}")?;
        }
        writeln!(f, ") {{")?;

        for block in &self.blocks {
            writeln!(f, "{}:", block.label)?;
            for &id in &block.insts {
                write!(f, "  ")?;
                if self.inst(id).produces_value() {
                    write!(f, "{id} = ")?;
                }
                self.write_inst(id, f)?;
                writeln!(f)?;
            }
        }

        writeln!(f, "}}")
    }
}

#[derive(Debug, Default)]
pub struct Module {
    pub source_filename: String,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn verify(&self) -> Result<(), VerifyError> {
        let mut names = HashSet::new();
        for function in &self.functions {
            if !names.insert(function.name.as_str()) {
                return Err(VerifyError::DuplicateFunction(function.name.clone()));
            }
        }
        for function in &self.functions {
            function.verify(self)?;
        }
        Ok(())
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module \"{}\"", self.source_filename)?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("duplicate function @{0}")]
    DuplicateFunction(String),
    #[error("function @{0} has no basic blocks")]
    NoBlocks(String),
    #[error("empty block {1} in @{0}")]
    EmptyBlock(String, String),
    #[error("block {1} in @{0} does not end with ret")]
    MissingTerminator(String, String),
    #[error("ret before the end of block {1} in @{0}")]
    EarlyTerminator(String, String),
    #[error("alloca outside the entry block of @{0}")]
    AllocaOutsideEntry(String),
    #[error("use of a value before its definition in @{0}")]
    UseBeforeDef(String),
    #[error("operand in @{0} is not a value-producing instruction")]
    NotAValue(String),
    #[error("argument index out of range in @{0}")]
    BadArgIndex(String),
    #[error("memory access through a non-alloca address in @{0}")]
    BadSlot(String),
    #[error("call to unknown function @{1} in @{0}")]
    UnknownCallee(String, String),
    #[error("call to @{0} with {1} arguments, expected {2}")]
    CalleeArity(String, usize, usize),
}
