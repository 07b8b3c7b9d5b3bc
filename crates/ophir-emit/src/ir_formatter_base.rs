use crate::config::OpPrintingFlags;
use ophir_core::{Attribute, Operation, Type, Value, ValueId};
use std::collections::HashMap;

/// Printed names for every value defined in a tree.
///
/// Names are assigned in a pre-pass over the whole tree so the output does
/// not depend on the raw ids the builder handed out: results are `%0, %1, ...`
/// and block arguments `%arg0, %arg1, ...`, both in pre-order.
#[derive(Debug, Default)]
pub struct SsaNameState {
    names: HashMap<ValueId, String>,
    next_value: u32,
    next_arg: u32,
}

impl SsaNameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(root: &Operation) -> Self {
        let mut state = Self::new();
        state.number_operation(root);
        state
    }

    fn number_operation(&mut self, op: &Operation) {
        for result in &op.results {
            let name = format!("%{}", self.next_value);
            self.next_value += 1;
            self.names.entry(result.id).or_insert(name);
        }
        for region in &op.regions {
            for block in &region.blocks {
                for arg in &block.arguments {
                    let name = format!("%arg{}", self.next_arg);
                    self.next_arg += 1;
                    self.names.entry(arg.id).or_insert(name);
                }
                for nested in &block.operations {
                    self.number_operation(nested);
                }
            }
        }
    }

    pub fn name(&self, value: &Value) -> &str {
        self.names
            .get(&value.id)
            .map(String::as_str)
            .unwrap_or("<<UNKNOWN SSA VALUE>>")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// For every value, the printed identities of the operations using it.
#[derive(Debug, Default)]
pub struct UseMap {
    users: HashMap<ValueId, Vec<String>>,
}

impl UseMap {
    pub fn build(root: &Operation, names: &SsaNameState) -> Self {
        let mut map = Self::default();
        root.walk(&mut |op| {
            let user = match op.results.first() {
                Some(result) => names.name(result).to_string(),
                None => IRFormatterBase::quote_name(&op.name),
            };
            for operand in &op.operands {
                let entry = map.users.entry(operand.id).or_default();
                if !entry.contains(&user) {
                    entry.push(user.clone());
                }
            }
        });
        map
    }

    /// Users of all results of `op`, deduplicated, in first-use order.
    pub fn users_of(&self, op: &Operation) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for result in &op.results {
            if let Some(users) = self.users.get(&result.id) {
                for user in users {
                    if !out.contains(&user.as_str()) {
                        out.push(user);
                    }
                }
            }
        }
        out
    }
}

pub struct IRFormatterBase;

impl IRFormatterBase {
    /// Operation name as a string literal, with quotes and control
    /// characters escaped.
    pub fn quote_name(name: &str) -> String {
        format!("{:?}", name)
    }

    pub fn format_attribute(attr: &Attribute, flags: &OpPrintingFlags) -> String {
        match attr {
            Attribute::Unit => "unit".to_string(),
            Attribute::Bool(b) => b.to_string(),
            Attribute::Integer(v, ty) => format!("{} : {}", v, ty),
            Attribute::Float(v, ty) => format!("{:?} : {}", v, ty),
            Attribute::String(s) => format!("{:?}", s),
            Attribute::Type(ty) => ty.to_string(),
            Attribute::Array(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| Self::format_attribute(item, flags))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            Attribute::DenseElements { ty, values } => Self::format_dense(ty, values, flags),
            Attribute::SymbolRef(sym) => format!("@{}", sym),
        }
    }

    fn format_dense(ty: &Type, values: &[i64], flags: &OpPrintingFlags) -> String {
        if flags.should_elide(values.len()) {
            return format!("dense_resource<__elided__> : {}", ty);
        }
        match values {
            [first, rest @ ..] if rest.iter().all(|v| v == first) => {
                format!("dense<{}> : {}", first, ty)
            }
            _ => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("dense<[{}]> : {}", items.join(", "), ty)
            }
        }
    }

    /// `{a = 1 : i32, flag}`, or an empty string when there is nothing to print.
    pub fn format_attribute_dict(op: &Operation, flags: &OpPrintingFlags) -> String {
        if op.attributes.is_empty() {
            return String::new();
        }
        let entries: Vec<String> = op
            .attributes
            .iter()
            .map(|(name, attr)| match attr {
                Attribute::Unit => name.clone(),
                _ => format!("{} = {}", name, Self::format_attribute(attr, flags)),
            })
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    /// Generic-form signature of an operation, `(i32, i32) -> i32`.
    pub fn format_signature(op: &Operation) -> String {
        let inputs = op.operands.iter().map(|v| v.ty.clone()).collect();
        let results = op.results.iter().map(|v| v.ty.clone()).collect();
        Type::function(inputs, results).to_string()
    }
}
