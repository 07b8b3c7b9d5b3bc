/*! Passes over ophir IR.
 *
 * The centrepiece is `print-ir`, a read-only pass that snapshots the IR between pipeline stages
 * so a change can be traced to the pass that made it. Pipelines are assembled from text through
 * the pass registry, the same way they are written on the command line.
 */

pub mod errors;
pub mod print_ir;
pub mod registry;
pub mod strip_debug_info;

pub use errors::TransformError;
pub use print_ir::{create_print_ir_pass, dump_header, DumpError, PrintIrOptions, PrintIrPass};
pub use registry::{parse_pipeline_entries, PassOptions, PassRegistry, PipelineEntry};
pub use strip_debug_info::StripDebugInfoPass;
