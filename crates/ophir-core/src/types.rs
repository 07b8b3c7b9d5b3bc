use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Integer(u32),
    Index,
    F32,
    F64,
    None,
    Tensor(Vec<i64>, Box<Type>),
    Function(Box<FunctionType>),
}

impl Type {
    pub fn i1() -> Self {
        Type::Integer(1)
    }

    pub fn i32() -> Self {
        Type::Integer(32)
    }

    pub fn i64() -> Self {
        Type::Integer(64)
    }

    pub fn tensor(shape: impl Into<Vec<i64>>, element: Type) -> Self {
        Type::Tensor(shape.into(), Box::new(element))
    }

    pub fn function(inputs: Vec<Type>, results: Vec<Type>) -> Self {
        Type::Function(Box::new(FunctionType { inputs, results }))
    }

}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer(bits) => write!(f, "i{}", bits),
            Type::Index => write!(f, "index"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
            Type::None => write!(f, "none"),
            Type::Tensor(shape, elem) => {
                write!(f, "tensor<")?;
                for dim in shape {
                    if *dim < 0 {
                        write!(f, "?x")?;
                    } else {
                        write!(f, "{}x", dim)?;
                    }
                }
                write!(f, "{}>", elem)
            }
            Type::Function(ft) => write!(f, "{}", ft),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub inputs: Vec<Type>,
    pub results: Vec<Type>,
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_type_list(f, &self.inputs)?;
        write!(f, ") -> ")?;
        if self.results.len() == 1 && !matches!(self.results[0], Type::Function(_)) {
            write!(f, "{}", self.results[0])
        } else {
            write!(f, "(")?;
            write_type_list(f, &self.results)?;
            write!(f, ")")
        }
    }
}

fn write_type_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}
