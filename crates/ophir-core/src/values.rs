use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u32);

/// An SSA value: either an operation result or a block argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    pub id: ValueId,
    pub ty: Type,
}

impl Value {
    pub fn new(id: ValueId, ty: Type) -> Self {
        Self { id, ty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Location {
    #[default]
    Unknown,
    FileLineCol {
        file: String,
        line: u32,
        column: u32,
    },
    Name(String),
    Fused(Vec<Location>),
}

impl Location {
    pub fn file(file: impl Into<String>, line: u32, column: u32) -> Self {
        Location::FileLineCol {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Location::Unknown)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => write!(f, "unknown"),
            Location::FileLineCol { file, line, column } => {
                write!(f, "\"{}\":{}:{}", file, line, column)
            }
            Location::Name(name) => write!(f, "\"{}\"", name),
            Location::Fused(locs) => {
                write!(f, "fused[")?;
                for (i, loc) in locs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", loc)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::Unknown.to_string(), "unknown");
        assert_eq!(
            Location::file("input.mlir", 3, 7).to_string(),
            "\"input.mlir\":3:7"
        );
        let fused = Location::Fused(vec![Location::Name("a".into()), Location::Unknown]);
        assert_eq!(fused.to_string(), "fused[\"a\", unknown]");
    }
}
