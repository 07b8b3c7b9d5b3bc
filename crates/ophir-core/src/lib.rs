/*! Core IR types and the pass framework.
 *
 * A program unit is a tree of operations: each operation owns regions, each region owns blocks, and
 * each block owns further operations. This crate provides that tree, a builder to construct it,
 * and the pass manager that runs transformations and inspections over it.
 */

pub mod analysis;
pub mod attributes;
pub mod builder;
pub mod operation;
pub mod types;
pub mod values;

pub use analysis::{FailurePolicy, Pass, PassError, PassManager, PassState, PreservedAnalyses};
pub use attributes::Attribute;
pub use builder::{IrContext, OperationBuilder};
pub use operation::{Block, Operation, Region};
pub use types::{FunctionType, Type};
pub use values::{Location, Value, ValueId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),
    #[error("Failed to load IR: {0}")]
    Load(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IrError>;

/// Deserializes a program unit from its JSON form.
pub fn load_json(input: &str) -> Result<Operation> {
    Ok(serde_json::from_str(input)?)
}

pub fn to_json(op: &Operation) -> Result<String> {
    Ok(serde_json::to_string_pretty(op)?)
}
