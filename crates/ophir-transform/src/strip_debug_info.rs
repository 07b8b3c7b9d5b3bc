use ophir_core::analysis::AnalysisID;
use ophir_core::{Location, Operation, Pass, PassState};
use std::any::Any;
use tracing::debug;

/// Replaces every location in the tree with `Location::Unknown`.
#[derive(Debug, Default)]
pub struct StripDebugInfoPass;

impl StripDebugInfoPass {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for StripDebugInfoPass {
    fn name(&self) -> &'static str {
        "strip-debuginfo"
    }

    fn description(&self) -> &'static str {
        "Strip debug info from all operations"
    }

    fn run_on_operation(
        &mut self,
        op: &mut Operation,
        state: &mut PassState<'_>,
    ) -> anyhow::Result<()> {
        let mut stripped = 0usize;
        op.walk_mut(&mut |nested| {
            if !nested.location.is_unknown() {
                nested.location = Location::Unknown;
                stripped += 1;
            }
        });
        debug!(stripped, "stripped debug locations");

        // Locations are not part of the tree shape.
        state.mark_analysis_preserved(AnalysisID::OperationCount);
        state.mark_analysis_preserved(AnalysisID::SymbolTable);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
