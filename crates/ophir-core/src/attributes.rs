use crate::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    Unit,
    Bool(bool),
    Integer(i64, Type),
    Float(f64, Type),
    String(String),
    Type(Type),
    Array(Vec<Attribute>),
    DenseElements { ty: Type, values: Vec<i64> },
    SymbolRef(String),
}

impl Attribute {
    pub fn i32(value: i64) -> Self {
        Attribute::Integer(value, Type::i32())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Attribute::String(value.into())
    }

    pub fn dense(ty: Type, values: Vec<i64>) -> Self {
        Attribute::DenseElements { ty, values }
    }
}
