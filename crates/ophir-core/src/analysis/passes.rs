use super::{AnalysisID, AnalysisPass};
use crate::operation::Operation;
use anyhow::Result;
use indexmap::IndexMap;

/// Per-operation-name counts over a whole tree, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationCounts {
    pub counts: IndexMap<String, usize>,
}

impl OperationCounts {
    pub fn get(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Default)]
pub struct OperationCountAnalysis;

impl AnalysisPass for OperationCountAnalysis {
    type Result = OperationCounts;

    fn analysis_id(&self) -> AnalysisID {
        AnalysisID::OperationCount
    }

    fn analyze(&mut self, op: &Operation) -> Result<Self::Result> {
        let mut counts = OperationCounts::default();
        op.walk(&mut |nested| {
            *counts.counts.entry(nested.name.clone()).or_insert(0) += 1;
        });
        Ok(counts)
    }
}

/// Maps `sym_name` attributes to the name of the operation that defines them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolTable {
    pub symbols: IndexMap<String, String>,
}

impl SymbolTable {
    pub fn lookup(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(String::as_str)
    }
}

#[derive(Default)]
pub struct SymbolTableAnalysis;

impl AnalysisPass for SymbolTableAnalysis {
    type Result = SymbolTable;

    fn analysis_id(&self) -> AnalysisID {
        AnalysisID::SymbolTable
    }

    fn analyze(&mut self, op: &Operation) -> Result<Self::Result> {
        let mut table = SymbolTable::default();
        let mut duplicate = None;
        op.walk(&mut |nested| {
            if let Some(sym) = nested.symbol_name() {
                if table
                    .symbols
                    .insert(sym.to_string(), nested.name.clone())
                    .is_some()
                    && duplicate.is_none()
                {
                    duplicate = Some(sym.to_string());
                }
            }
        });

        match duplicate {
            Some(sym) => Err(anyhow::anyhow!("Duplicate symbol: {}", sym)),
            None => Ok(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PassManager;
    use crate::attributes::Attribute;
    use crate::builder::{module, OperationBuilder};
    use crate::operation::{Block, Region};

    fn func(name: &str, body_ops: usize) -> Operation {
        let mut body = Block::new();
        for _ in 0..body_ops {
            body.push(Operation::new("test.op"));
        }
        body.push(Operation::new("func.return"));
        OperationBuilder::new("func.func")
            .attribute("sym_name", Attribute::string(name))
            .region(Region::with_block(body))
            .build()
            .unwrap()
    }

    #[test]
    fn test_operation_counts() {
        let mut body = Block::new();
        body.push(func("a", 2));
        body.push(func("b", 1));
        let root = module(body);

        let counts = OperationCountAnalysis.analyze(&root).unwrap();
        assert_eq!(counts.get("func.func"), 2);
        assert_eq!(counts.get("test.op"), 3);
        assert_eq!(counts.get("func.return"), 2);
        assert_eq!(counts.get("missing"), 0);
        assert_eq!(counts.total(), root.num_operations());
    }

    #[test]
    fn test_symbol_table() {
        let mut body = Block::new();
        body.push(func("main", 0));
        let root = module(body);

        let table = SymbolTableAnalysis.analyze(&root).unwrap();
        assert_eq!(table.lookup("main"), Some("func.func"));
        assert_eq!(table.lookup("other"), None);
    }

    #[test]
    fn test_duplicate_symbols_are_rejected() {
        let mut body = Block::new();
        body.push(func("dup", 0));
        body.push(func("dup", 0));
        let root = module(body);

        assert!(SymbolTableAnalysis.analyze(&root).is_err());
    }

    #[test]
    fn test_manager_caches_analysis() {
        let mut body = Block::new();
        body.push(func("main", 1));
        let root = module(body);

        let mut manager = PassManager::new();
        assert!(!manager.is_analysis_valid(&root, AnalysisID::OperationCount));
        let total = manager
            .get_analysis::<OperationCountAnalysis>(&root)
            .unwrap()
            .total();
        assert_eq!(total, 4);
        assert!(manager.is_analysis_valid(&root, AnalysisID::OperationCount));
    }
}
