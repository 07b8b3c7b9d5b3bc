use crate::attributes::Attribute;
use crate::operation::Operation;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisID {
    OperationCount,
    SymbolTable,
    Custom(&'static str),
}

/// The set of analyses a pass promises it left intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreservedAnalyses {
    all: bool,
    preserved: HashSet<AnalysisID>,
}

impl PreservedAnalyses {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            all: true,
            preserved: HashSet::new(),
        }
    }

    pub fn preserve(&mut self, id: AnalysisID) {
        self.preserved.insert(id);
    }

    pub fn preserve_all(&mut self) {
        self.all = true;
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn is_preserved(&self, id: AnalysisID) -> bool {
        self.all || self.preserved.contains(&id)
    }
}

#[derive(Debug, Error)]
pub enum PassError {
    #[error("pass '{pass}' failed: {source}")]
    PassFailed {
        pass: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{} passes failed", .0.len())]
    Multiple(Vec<PassError>),
}

impl PassError {
    pub fn pass_name(&self) -> Option<&'static str> {
        match self {
            PassError::PassFailed { pass, .. } => Some(pass),
            PassError::Multiple(_) => None,
        }
    }
}

/// Execution state handed to a single pass invocation.
///
/// Carries the diagnostic stream the framework injected, the failure signal,
/// and the analyses the pass declared preserved. A fresh state is created for
/// every run, so a pass starts out with nothing failed and nothing preserved.
pub struct PassState<'a> {
    diagnostics: &'a mut dyn Write,
    failure: Option<BoxError>,
    preserved: PreservedAnalyses,
}

impl<'a> PassState<'a> {
    pub fn new(diagnostics: &'a mut dyn Write) -> Self {
        Self {
            diagnostics,
            failure: None,
            preserved: PreservedAnalyses::none(),
        }
    }

    pub fn diagnostics(&mut self) -> &mut dyn Write {
        &mut *self.diagnostics
    }

    pub fn signal_pass_failure(&mut self, reason: impl Into<BoxError>) {
        self.failure = Some(reason.into());
    }

    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn mark_all_analyses_preserved(&mut self) {
        self.preserved.preserve_all();
    }

    pub fn mark_analysis_preserved(&mut self, id: AnalysisID) {
        self.preserved.preserve(id);
    }

    pub fn preserved(&self) -> &PreservedAnalyses {
        &self.preserved
    }

    pub fn finish(self) -> (Option<BoxError>, PreservedAnalyses) {
        (self.failure, self.preserved)
    }
}

pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "No description provided"
    }

    /// Runs the pass. Returning `Err` is equivalent to calling
    /// [`PassState::signal_pass_failure`] with that error.
    fn run_on_operation(
        &mut self,
        op: &mut Operation,
        state: &mut PassState<'_>,
    ) -> anyhow::Result<()>;

    fn as_any(&self) -> &dyn Any;
}

pub trait AnalysisPass: Default {
    type Result: Any + Send + Sync;

    fn analysis_id(&self) -> AnalysisID;

    fn analyze(&mut self, op: &Operation) -> anyhow::Result<Self::Result>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Halt,
    Continue,
}

#[derive(Debug, Clone)]
pub struct PassStatistics {
    pub name: String,
    pub duration: Duration,
    pub failed: bool,
}

pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
    analysis_cache: HashMap<(AnalysisID, u64), Box<dyn Any + Send + Sync>>,
    statistics: Vec<PassStatistics>,
    collect_stats: bool,
    failure_policy: FailurePolicy,
    diagnostics: Box<dyn Write + Send>,
}

impl PassManager {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            analysis_cache: HashMap::new(),
            statistics: Vec::new(),
            collect_stats: false,
            failure_policy: FailurePolicy::Halt,
            diagnostics: Box::new(std::io::stderr()),
        }
    }

    /// Replaces the diagnostic stream (stderr by default) handed to passes.
    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Write + Send>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn enable_statistics(&mut self) {
        self.collect_stats = true;
    }

    pub fn register_pass<P: Pass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    pub fn register_boxed(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn run(&mut self, op: &mut Operation) -> Result<(), PassError> {
        let mut failures = Vec::new();

        for pass in self.passes.iter_mut() {
            let name = pass.name();
            debug!(pass = name, op = %op.name, "running pass");
            let start = self.collect_stats.then(Instant::now);

            let mut state = PassState::new(&mut *self.diagnostics);
            if let Err(err) = pass.run_on_operation(op, &mut state) {
                state.signal_pass_failure(err);
            }
            let (failure, preserved) = state.finish();

            if let Err(err) = self.diagnostics.flush() {
                debug!(pass = name, "failed to flush diagnostics: {}", err);
            }

            // Nested operations may have been rewritten too, so invalidation
            // is not limited to entries owned by the root.
            if !preserved.is_all() {
                self.analysis_cache
                    .retain(|(id, _), _| preserved.is_preserved(*id));
            }

            if let Some(start) = start {
                self.statistics.push(PassStatistics {
                    name: name.to_string(),
                    duration: start.elapsed(),
                    failed: failure.is_some(),
                });
            }

            if let Some(source) = failure {
                error!(pass = name, "pass failed: {}", source);
                let err = PassError::PassFailed { pass: name, source };
                match self.failure_policy {
                    FailurePolicy::Halt => return Err(err),
                    FailurePolicy::Continue => failures.push(err),
                }
            } else {
                debug!(pass = name, "pass finished");
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(PassError::Multiple(failures)),
        }
    }

    pub fn get_analysis<A: AnalysisPass + 'static>(
        &mut self,
        op: &Operation,
    ) -> anyhow::Result<&A::Result> {
        let mut analysis = A::default();
        let id = analysis.analysis_id();
        let key = (id, cache_key(op));

        if !self.analysis_cache.contains_key(&key) {
            let result = analysis.analyze(op)?;
            self.analysis_cache.insert(key.clone(), Box::new(result));
        }

        self.analysis_cache
            .get(&key)
            .and_then(|boxed| boxed.downcast_ref::<A::Result>())
            .ok_or_else(|| anyhow::anyhow!("Failed to get analysis result for {:?}", id))
    }

    pub fn cache_analysis<T: Any + Send + Sync>(
        &mut self,
        analysis_id: AnalysisID,
        op: &Operation,
        result: T,
    ) {
        self.analysis_cache
            .insert((analysis_id, cache_key(op)), Box::new(result));
    }

    pub fn is_analysis_valid(&self, op: &Operation, analysis_id: AnalysisID) -> bool {
        self.analysis_cache
            .contains_key(&(analysis_id, cache_key(op)))
    }

    pub fn statistics(&self) -> &[PassStatistics] {
        &self.statistics
    }

    pub fn get_pass<P: Pass + 'static>(&self) -> Option<&P> {
        self.passes
            .iter()
            .find_map(|p| p.as_any().downcast_ref::<P>())
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies the operation an analysis was computed for by its content.
/// Locations are left out, so dropping debug info keeps an operation's
/// preserved analyses reachable.
fn cache_key(op: &Operation) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_operation(op, &mut hasher);
    hasher.finish()
}

fn hash_operation(op: &Operation, state: &mut DefaultHasher) {
    op.name.hash(state);
    op.operands.hash(state);
    op.results.hash(state);
    op.attributes.len().hash(state);
    for (name, attr) in &op.attributes {
        name.hash(state);
        hash_attribute(attr, state);
    }
    op.regions.len().hash(state);
    for region in &op.regions {
        region.blocks.len().hash(state);
        for block in &region.blocks {
            block.arguments.hash(state);
            block.operations.len().hash(state);
            for nested in &block.operations {
                hash_operation(nested, state);
            }
        }
    }
}

fn hash_attribute(attr: &Attribute, state: &mut DefaultHasher) {
    std::mem::discriminant(attr).hash(state);
    match attr {
        Attribute::Unit => {}
        Attribute::Bool(value) => value.hash(state),
        Attribute::Integer(value, ty) => {
            value.hash(state);
            ty.hash(state);
        }
        Attribute::Float(value, ty) => {
            value.to_bits().hash(state);
            ty.hash(state);
        }
        Attribute::String(value) | Attribute::SymbolRef(value) => value.hash(state),
        Attribute::Type(ty) => ty.hash(state),
        Attribute::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_attribute(item, state);
            }
        }
        Attribute::DenseElements { ty, values } => {
            ty.hash(state);
            values.hash(state);
        }
    }
}
