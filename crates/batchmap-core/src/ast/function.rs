//! Built-in functions and their declared signatures

use crate::error::CoreError;
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    Upper,
    Lower,
    Trim,
    Length,
    Substring,
    Concat,
    ToNumber,
    ToDate,
}

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Declared signature of a built-in function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub arity: Arity,
    /// Declared parameter types; the last one repeats for variadic functions
    pub params: &'static [DataType],
    pub returns: DataType,
}

impl Signature {
    /// Declared type of the argument at `index`
    pub fn param(&self, index: usize) -> Option<DataType> {
        match self.arity {
            Arity::AtLeast(_) => self
                .params
                .get(index)
                .or_else(|| self.params.last())
                .copied(),
            Arity::Exact(_) => self.params.get(index).copied(),
        }
    }
}

impl Function {
    pub const ALL: [Function; 8] = [
        Function::Upper,
        Function::Lower,
        Function::Trim,
        Function::Length,
        Function::Substring,
        Function::Concat,
        Function::ToNumber,
        Function::ToDate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Upper => "UPPER",
            Function::Lower => "LOWER",
            Function::Trim => "TRIM",
            Function::Length => "LENGTH",
            Function::Substring => "SUBSTRING",
            Function::Concat => "CONCAT",
            Function::ToNumber => "TO_NUMBER",
            Function::ToDate => "TO_DATE",
        }
    }

    /// Case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Function> {
        Function::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn signature(&self) -> Signature {
        use DataType::{Date, Numeric, String};

        match self {
            Function::Upper | Function::Lower | Function::Trim => Signature {
                arity: Arity::Exact(1),
                params: &[String],
                returns: String,
            },
            Function::Length => Signature {
                arity: Arity::Exact(1),
                params: &[String],
                returns: Numeric,
            },
            Function::Substring => Signature {
                arity: Arity::Exact(3),
                params: &[String, Numeric, Numeric],
                returns: String,
            },
            Function::Concat => Signature {
                arity: Arity::AtLeast(1),
                params: &[String],
                returns: String,
            },
            Function::ToNumber => Signature {
                arity: Arity::Exact(1),
                params: &[String],
                returns: Numeric,
            },
            Function::ToDate => Signature {
                arity: Arity::Exact(2),
                params: &[String, String],
                returns: Date,
            },
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::from_name(s).ok_or_else(|| CoreError::UnknownFunction(s.to_string()))
    }
}
