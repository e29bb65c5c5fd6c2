//! Static result-type descriptors carried by every node
//!
//! Types render with their keyword aliases (`int`, `decimal`, `string`, ...),
//! nullable value types as `T?`, generic types as `Name<A, B>` and delegate
//! types as `Func<P1, R>`. The textual form is also the serialized form, so a
//! descriptor always round-trips through [`TypeRef::from_str`].

use crate::error::ReadexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type of a node's result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Bool,
    Char,
    Int,
    Long,
    Double,
    Decimal,
    String,
    Object,
    Void,
    /// Nullable wrapper, `T?`
    Nullable(Box<TypeRef>),
    /// Any other named type, optionally generic
    Named { name: String, arguments: Vec<TypeRef> },
    /// Delegate type: parameter types followed by the result type
    Function {
        parameters: Vec<TypeRef>,
        result: Box<TypeRef>,
    },
}

const KEYWORDS: [(&str, TypeRef); 9] = [
    ("bool", TypeRef::Bool),
    ("char", TypeRef::Char),
    ("int", TypeRef::Int),
    ("long", TypeRef::Long),
    ("double", TypeRef::Double),
    ("decimal", TypeRef::Decimal),
    ("string", TypeRef::String),
    ("object", TypeRef::Object),
    ("void", TypeRef::Void),
];

impl TypeRef {
    /// A non-generic named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A generic named type
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            arguments,
        }
    }

    /// Wrap this type as nullable; nullable types are returned unchanged
    pub fn nullable(self) -> Self {
        match self {
            TypeRef::Nullable(_) => self,
            other => TypeRef::Nullable(Box::new(other)),
        }
    }

    /// Delegate type `Func<parameters..., result>`
    pub fn function(parameters: Vec<TypeRef>, result: TypeRef) -> Self {
        TypeRef::Function {
            parameters,
            result: Box::new(result),
        }
    }

    /// Whether values of this type are value types
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            TypeRef::Bool
                | TypeRef::Char
                | TypeRef::Int
                | TypeRef::Long
                | TypeRef::Double
                | TypeRef::Decimal
        )
    }

    /// Whether a value of this type may be null
    pub fn is_nullable(&self) -> bool {
        !self.is_value_type() && *self != TypeRef::Void
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.non_nullable(),
            TypeRef::Int | TypeRef::Long | TypeRef::Double | TypeRef::Decimal
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.non_nullable(), TypeRef::Bool)
    }

    /// The underlying type with any nullable wrapper removed
    pub fn non_nullable(&self) -> &TypeRef {
        match self {
            TypeRef::Nullable(inner) => inner,
            other => other,
        }
    }

    fn keyword(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, ty)| ty == self)
            .map(|(keyword, _)| *keyword)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword() {
            return f.write_str(keyword);
        }
        match self {
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
            TypeRef::Named { name, arguments } => {
                f.write_str(name)?;
                write_arguments(f, arguments.iter())
            }
            TypeRef::Function { parameters, result } => {
                f.write_str("Func")?;
                write_arguments(f, parameters.iter().chain(std::iter::once(&**result)))
            }
            _ => Ok(()),
        }
    }
}

fn write_arguments<'a>(
    f: &mut fmt::Formatter<'_>,
    arguments: impl Iterator<Item = &'a TypeRef>,
) -> fmt::Result {
    let mut arguments = arguments.peekable();
    if arguments.peek().is_none() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, argument) in arguments.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{argument}")?;
    }
    f.write_str(">")
}

impl FromStr for TypeRef {
    type Err = ReadexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error());
        }
        Ok(ty)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ReadexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn parse_type(&mut self) -> Result<TypeRef, ReadexError> {
        self.skip_whitespace();
        let name = self.identifier()?;
        let arguments = if self.eat('<') {
            let mut arguments = vec![self.parse_type()?];
            while self.eat(',') {
                arguments.push(self.parse_type()?);
            }
            if !self.eat('>') {
                return Err(self.error());
            }
            arguments
        } else {
            Vec::new()
        };

        let mut ty = match (name, arguments.is_empty()) {
            ("Func", false) => {
                let mut parameters = arguments;
                // Non-empty, so there is always a result type to pop.
                let result = parameters.pop().ok_or_else(|| self.error())?;
                TypeRef::function(parameters, result)
            }
            (name, true) => KEYWORDS
                .iter()
                .find(|(keyword, _)| *keyword == name)
                .map(|(_, ty)| ty.clone())
                .unwrap_or_else(|| TypeRef::named(name)),
            (name, false) => TypeRef::generic(name, arguments),
        };

        if self.eat('?') {
            ty = ty.nullable();
        }
        Ok(ty)
    }

    fn identifier(&mut self) -> Result<&'a str, ReadexError> {
        let input = self.input;
        let start = self.pos;
        let rest = &input[start..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 || rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Err(self.error());
        }
        self.pos += len;
        Ok(&input[start..start + len])
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self) -> ReadexError {
        ReadexError::invalid_literal("type", self.input)
    }
}
