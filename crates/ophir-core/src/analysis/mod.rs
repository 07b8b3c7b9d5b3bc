/*! Pass execution and the analyses passes can keep alive.
 *
 * Passes run one after another over a root operation. After each pass the manager drops any cached
 * analysis the pass did not declare preserved, so read-only passes such as IR dumps keep everything
 * and rewriting passes pay for recomputation only where they changed something.
 */

pub mod pass;
pub mod passes;

pub use pass::{
    AnalysisID, AnalysisPass, BoxError, FailurePolicy, Pass, PassError, PassManager, PassState,
    PassStatistics, PreservedAnalyses,
};
pub use passes::{OperationCountAnalysis, OperationCounts, SymbolTable, SymbolTableAnalysis};
