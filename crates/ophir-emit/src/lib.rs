/*! Turn IR back into readable text.
 *
 * Dumps taken between passes are read by people chasing a miscompile, and diffed by tools that
 * check pipelines stay stable. The printer here renders every operation in one generic form with
 * deterministic value names, so two dumps of the same tree are byte-identical.
 */

pub mod config;
pub mod emitter;
pub mod ir_formatter_base;
pub mod text_printer;

pub use config::{IndentStyle, OpPrintingFlags};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Printer};
pub use ir_formatter_base::{IRFormatterBase, SsaNameState, UseMap};
pub use text_printer::TextPrinter;
