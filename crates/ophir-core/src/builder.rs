use crate::attributes::Attribute;
use crate::operation::{Block, Operation, Region};
use crate::types::Type;
use crate::values::{Location, Value, ValueId};
use crate::{IrError, Result};

/// Hands out fresh value ids while a unit is being built.
#[derive(Debug, Default)]
pub struct IrContext {
    next_value: u32,
}

impl IrContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_value(&mut self, ty: Type) -> Value {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        Value::new(id, ty)
    }

    pub fn new_block(&mut self, argument_types: impl IntoIterator<Item = Type>) -> Block {
        let mut block = Block::new();
        for ty in argument_types {
            let arg = self.new_value(ty);
            block.add_argument(arg);
        }
        block
    }
}

pub struct OperationBuilder {
    op: Operation,
}

impl OperationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            op: Operation::new(name),
        }
    }

    pub fn operand(mut self, value: &Value) -> Self {
        self.op.operands.push(value.clone());
        self
    }

    pub fn operands<'a>(mut self, values: impl IntoIterator<Item = &'a Value>) -> Self {
        self.op.operands.extend(values.into_iter().cloned());
        self
    }

    pub fn result(mut self, value: &Value) -> Self {
        self.op.results.push(value.clone());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.op.attributes.insert(name.into(), value);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.op.regions.push(region);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.op.location = location;
        self
    }

    pub fn build(self) -> Result<Operation> {
        let name = &self.op.name;
        if name.is_empty() {
            return Err(IrError::InvalidOperation(
                "operation name must not be empty".to_string(),
            ));
        }
        if name.chars().any(|c| c.is_whitespace() || c == '"') {
            return Err(IrError::InvalidOperation(format!(
                "invalid operation name '{}'",
                name
            )));
        }
        if self.op.attributes.keys().any(|k| k.is_empty()) {
            return Err(IrError::InvalidAttribute(format!(
                "empty attribute name on '{}'",
                name
            )));
        }
        Ok(self.op)
    }
}

/// Wraps `body` in a `builtin.module` operation.
pub fn module(body: Block) -> Operation {
    let mut op = Operation::new("builtin.module");
    op.regions.push(Region::with_block(body));
    op
}
