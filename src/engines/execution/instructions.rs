use std::fmt;
use std::str::FromStr;

/// Stacks addressable by the generic stack instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    Integer,
    Float,
    Boolean,
    Name,
    Exec,
    Input,
}

impl StackKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            StackKind::Integer => "integer",
            StackKind::Float => "float",
            StackKind::Boolean => "boolean",
            StackKind::Name => "name",
            StackKind::Exec => "exec",
            StackKind::Input => "input",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "integer" => Some(StackKind::Integer),
            "float" => Some(StackKind::Float),
            "boolean" => Some(StackKind::Boolean),
            "name" => Some(StackKind::Name),
            "exec" => Some(StackKind::Exec),
            "input" => Some(StackKind::Input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    Pop,
    Swap,
    Dup,
    Rot,
    Flush,
    Depth,
    Yank,
    YankDup,
    Shove,
}

impl StackOp {
    const ALL: [StackOp; 9] = [
        StackOp::Pop,
        StackOp::Swap,
        StackOp::Dup,
        StackOp::Rot,
        StackOp::Flush,
        StackOp::Depth,
        StackOp::Yank,
        StackOp::YankDup,
        StackOp::Shove,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            StackOp::Pop => "pop",
            StackOp::Swap => "swap",
            StackOp::Dup => "dup",
            StackOp::Rot => "rot",
            StackOp::Flush => "flush",
            StackOp::Depth => "stackdepth",
            StackOp::Yank => "yank",
            StackOp::YankDup => "yankdup",
            StackOp::Shove => "shove",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.suffix() == suffix)
    }
}

/// Two-operand numeric operators shared by the integer and float stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
}

impl BinaryOp {
    const ALL: [BinaryOp; 7] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Min,
        BinaryOp::Max,
    ];

    fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }

    pub fn apply_int(&self, a: i64, b: i64) -> i64 {
        match self {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => {
                if b == 0 {
                    0
                } else {
                    a.wrapping_div(b)
                }
            }
            BinaryOp::Mod => {
                if b == 0 {
                    0
                } else {
                    a.wrapping_rem(b)
                }
            }
            BinaryOp::Min => a.min(b),
            BinaryOp::Max => a.max(b),
        }
    }

    pub fn apply_float(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => {
                if b == 0.0 {
                    0.0
                } else {
                    a / b
                }
            }
            BinaryOp::Mod => {
                if b == 0.0 {
                    0.0
                } else {
                    a % b
                }
            }
            BinaryOp::Min => a.min(b),
            BinaryOp::Max => a.max(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    Less,
    Greater,
}

impl Comparison {
    const ALL: [Comparison; 3] = [Comparison::Equal, Comparison::Less, Comparison::Greater];

    fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::Less => "<",
            Comparison::Greater => ">",
        }
    }

    pub fn test<T: PartialOrd>(&self, a: T, b: T) -> bool {
        match self {
            Comparison::Equal => a == b,
            Comparison::Less => a < b,
            Comparison::Greater => a > b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatFn {
    Abs,
    Neg,
    Sin,
    Cos,
    Exp,
    Ln,
}

impl FloatFn {
    const ALL: [FloatFn; 6] = [
        FloatFn::Abs,
        FloatFn::Neg,
        FloatFn::Sin,
        FloatFn::Cos,
        FloatFn::Exp,
        FloatFn::Ln,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            FloatFn::Abs => "abs",
            FloatFn::Neg => "neg",
            FloatFn::Sin => "sin",
            FloatFn::Cos => "cos",
            FloatFn::Exp => "exp",
            FloatFn::Ln => "ln",
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        match self {
            FloatFn::Abs => x.abs(),
            FloatFn::Neg => -x,
            FloatFn::Sin => x.sin(),
            FloatFn::Cos => x.cos(),
            FloatFn::Exp => x.exp(),
            FloatFn::Ln => x.ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
    Xor,
    Equal,
}

impl BoolOp {
    const ALL: [BoolOp; 4] = [BoolOp::And, BoolOp::Or, BoolOp::Xor, BoolOp::Equal];

    fn suffix(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
            BoolOp::Xor => "xor",
            BoolOp::Equal => "=",
        }
    }

    pub fn apply(&self, a: bool, b: bool) -> bool {
        match self {
            BoolOp::And => a && b,
            BoolOp::Or => a || b,
            BoolOp::Xor => a ^ b,
            BoolOp::Equal => a == b,
        }
    }
}

/// Every instruction the interpreter understands, named as in Push
/// (`integer.+`, `exec.do*range`, `float.yank`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    IntBinary(BinaryOp),
    IntCompare(Comparison),
    IntAbs,
    IntNeg,
    IntFromFloat,
    IntFromBoolean,
    FloatBinary(BinaryOp),
    FloatCompare(Comparison),
    FloatUnary(FloatFn),
    FloatFromInteger,
    FloatFromBoolean,
    BoolBinary(BoolOp),
    BoolNot,
    BoolFromInteger,
    BoolFromFloat,
    Stack(StackKind, StackOp),
    ExecNoop,
    ExecIf,
    ExecDoTimes,
    ExecDoCount,
    ExecDoRange,
    ExecK,
    ExecS,
    ExecY,
    InputIndex,
    InputInAll,
    InputInAllRev,
}

impl Instruction {
    /// All instructions known to the interpreter, in a stable order.
    pub fn all() -> Vec<Instruction> {
        let mut all = Vec::new();
        for op in BinaryOp::ALL {
            all.push(Instruction::IntBinary(op));
        }
        for cmp in Comparison::ALL {
            all.push(Instruction::IntCompare(cmp));
        }
        all.extend([
            Instruction::IntAbs,
            Instruction::IntNeg,
            Instruction::IntFromFloat,
            Instruction::IntFromBoolean,
        ]);
        for op in BinaryOp::ALL {
            all.push(Instruction::FloatBinary(op));
        }
        for cmp in Comparison::ALL {
            all.push(Instruction::FloatCompare(cmp));
        }
        for f in FloatFn::ALL {
            all.push(Instruction::FloatUnary(f));
        }
        all.extend([Instruction::FloatFromInteger, Instruction::FloatFromBoolean]);
        for op in BoolOp::ALL {
            all.push(Instruction::BoolBinary(op));
        }
        all.extend([
            Instruction::BoolNot,
            Instruction::BoolFromInteger,
            Instruction::BoolFromFloat,
        ]);
        for kind in [
            StackKind::Integer,
            StackKind::Float,
            StackKind::Boolean,
            StackKind::Name,
            StackKind::Exec,
        ] {
            for op in StackOp::ALL {
                all.push(Instruction::Stack(kind, op));
            }
        }
        all.push(Instruction::Stack(StackKind::Input, StackOp::Depth));
        all.extend([
            Instruction::ExecNoop,
            Instruction::ExecIf,
            Instruction::ExecDoTimes,
            Instruction::ExecDoCount,
            Instruction::ExecDoRange,
            Instruction::ExecK,
            Instruction::ExecS,
            Instruction::ExecY,
            Instruction::InputIndex,
            Instruction::InputInAll,
            Instruction::InputInAllRev,
        ]);
        all
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::IntBinary(op) => write!(f, "integer.{}", op.symbol()),
            Instruction::IntCompare(cmp) => write!(f, "integer.{}", cmp.symbol()),
            Instruction::IntAbs => write!(f, "integer.abs"),
            Instruction::IntNeg => write!(f, "integer.neg"),
            Instruction::IntFromFloat => write!(f, "integer.fromfloat"),
            Instruction::IntFromBoolean => write!(f, "integer.fromboolean"),
            Instruction::FloatBinary(op) => write!(f, "float.{}", op.symbol()),
            Instruction::FloatCompare(cmp) => write!(f, "float.{}", cmp.symbol()),
            Instruction::FloatUnary(func) => write!(f, "float.{}", func.suffix()),
            Instruction::FloatFromInteger => write!(f, "float.frominteger"),
            Instruction::FloatFromBoolean => write!(f, "float.fromboolean"),
            Instruction::BoolBinary(op) => write!(f, "boolean.{}", op.suffix()),
            Instruction::BoolNot => write!(f, "boolean.not"),
            Instruction::BoolFromInteger => write!(f, "boolean.frominteger"),
            Instruction::BoolFromFloat => write!(f, "boolean.fromfloat"),
            Instruction::Stack(kind, op) => write!(f, "{}.{}", kind.prefix(), op.suffix()),
            Instruction::ExecNoop => write!(f, "exec.noop"),
            Instruction::ExecIf => write!(f, "exec.if"),
            Instruction::ExecDoTimes => write!(f, "exec.do*times"),
            Instruction::ExecDoCount => write!(f, "exec.do*count"),
            Instruction::ExecDoRange => write!(f, "exec.do*range"),
            Instruction::ExecK => write!(f, "exec.k"),
            Instruction::ExecS => write!(f, "exec.s"),
            Instruction::ExecY => write!(f, "exec.y"),
            Instruction::InputIndex => write!(f, "input.index"),
            Instruction::InputInAll => write!(f, "input.inall"),
            Instruction::InputInAllRev => write!(f, "input.inallrev"),
        }
    }
}

/// Returned when a token does not name a known instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInstruction(pub String);

impl fmt::Display for UnknownInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown instruction \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownInstruction {}

impl FromStr for Instruction {
    type Err = UnknownInstruction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownInstruction(s.to_string());
        let (prefix, suffix) = s.split_once('.').ok_or_else(unknown)?;
        let kind = StackKind::from_prefix(prefix).ok_or_else(unknown)?;

        if let Some(op) = StackOp::from_suffix(suffix) {
            if kind == StackKind::Input && op != StackOp::Depth {
                return Err(unknown());
            }
            return Ok(Instruction::Stack(kind, op));
        }

        let found = match kind {
            StackKind::Integer => match suffix {
                "abs" => Some(Instruction::IntAbs),
                "neg" => Some(Instruction::IntNeg),
                "fromfloat" => Some(Instruction::IntFromFloat),
                "fromboolean" => Some(Instruction::IntFromBoolean),
                _ => BinaryOp::ALL
                    .into_iter()
                    .find(|op| op.symbol() == suffix)
                    .map(Instruction::IntBinary)
                    .or_else(|| {
                        Comparison::ALL
                            .into_iter()
                            .find(|cmp| cmp.symbol() == suffix)
                            .map(Instruction::IntCompare)
                    }),
            },
            StackKind::Float => match suffix {
                "frominteger" => Some(Instruction::FloatFromInteger),
                "fromboolean" => Some(Instruction::FloatFromBoolean),
                _ => BinaryOp::ALL
                    .into_iter()
                    .find(|op| op.symbol() == suffix)
                    .map(Instruction::FloatBinary)
                    .or_else(|| {
                        Comparison::ALL
                            .into_iter()
                            .find(|cmp| cmp.symbol() == suffix)
                            .map(Instruction::FloatCompare)
                    })
                    .or_else(|| {
                        FloatFn::ALL
                            .into_iter()
                            .find(|func| func.suffix() == suffix)
                            .map(Instruction::FloatUnary)
                    }),
            },
            StackKind::Boolean => match suffix {
                "not" => Some(Instruction::BoolNot),
                "frominteger" => Some(Instruction::BoolFromInteger),
                "fromfloat" => Some(Instruction::BoolFromFloat),
                _ => BoolOp::ALL
                    .into_iter()
                    .find(|op| op.suffix() == suffix)
                    .map(Instruction::BoolBinary),
            },
            StackKind::Exec => match suffix {
                "noop" => Some(Instruction::ExecNoop),
                "if" => Some(Instruction::ExecIf),
                "do*times" => Some(Instruction::ExecDoTimes),
                "do*count" => Some(Instruction::ExecDoCount),
                "do*range" => Some(Instruction::ExecDoRange),
                "k" => Some(Instruction::ExecK),
                "s" => Some(Instruction::ExecS),
                "y" => Some(Instruction::ExecY),
                _ => None,
            },
            StackKind::Input => match suffix {
                "index" => Some(Instruction::InputIndex),
                "inall" => Some(Instruction::InputInAll),
                "inallrev" => Some(Instruction::InputInAllRev),
                _ => None,
            },
            StackKind::Name => None,
        };

        found.ok_or_else(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_instruction_name_round_trips() {
        for instruction in Instruction::all() {
            let name = instruction.to_string();
            assert_eq!(name.parse::<Instruction>(), Ok(instruction), "{}", name);
        }
    }

    #[test]
    fn test_input_stack_only_supports_depth() {
        assert!("input.pop".parse::<Instruction>().is_err());
        assert_eq!(
            "input.stackdepth".parse::<Instruction>(),
            Ok(Instruction::Stack(StackKind::Input, StackOp::Depth))
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!("integer.sqrt".parse::<Instruction>().is_err());
        assert!("x".parse::<Instruction>().is_err());
        assert!("name.+".parse::<Instruction>().is_err());
    }

    #[test]
    fn test_integer_division_by_zero_is_zero() {
        assert_eq!(BinaryOp::Div.apply_int(7, 0), 0);
        assert_eq!(BinaryOp::Mod.apply_int(7, 0), 0);
        assert_eq!(BinaryOp::Div.apply_int(i64::MIN, -1), i64::MIN);
    }
}
