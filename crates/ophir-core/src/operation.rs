use crate::attributes::Attribute;
use crate::values::{Location, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of the IR tree. Operations own their regions, regions own blocks,
/// and blocks own the nested operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub operands: Vec<Value>,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub attributes: IndexMap<String, Attribute>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub location: Location,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
            results: Vec::new(),
            attributes: IndexMap::new(),
            regions: Vec::new(),
            location: Location::Unknown,
        }
    }

    /// Dialect prefix of the operation name, e.g. `arith` for `arith.addi`.
    pub fn dialect(&self) -> &str {
        self.name.split_once('.').map(|(d, _)| d).unwrap_or("")
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn symbol_name(&self) -> Option<&str> {
        match self.attribute("sym_name") {
            Some(Attribute::String(name)) => Some(name),
            _ => None,
        }
    }

    /// Pre-order walk over this operation and everything nested under it.
    pub fn walk<F: FnMut(&Operation)>(&self, f: &mut F) {
        f(self);
        for region in &self.regions {
            for block in &region.blocks {
                for op in &block.operations {
                    op.walk(f);
                }
            }
        }
    }

    pub fn walk_mut<F: FnMut(&mut Operation)>(&mut self, f: &mut F) {
        f(self);
        for region in &mut self.regions {
            for block in &mut region.blocks {
                for op in &mut block.operations {
                    op.walk_mut(f);
                }
            }
        }
    }

    /// Number of operations in the tree rooted here, including `self`.
    pub fn num_operations(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Region {
    pub blocks: Vec<Block>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(block: Block) -> Self {
        Self {
            blocks: vec![block],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    #[serde(default)]
    pub arguments: Vec<Value>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_argument(&mut self, value: Value) {
        self.arguments.push(value);
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }
}
