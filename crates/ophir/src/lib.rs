/*! Operation IR with pass pipelines and debug dumps.
 *
 * Single import for building IR, running passes over it, and snapshotting it between stages.
 */

pub use ophir_core as core;
pub use ophir_emit as emit;
pub use ophir_transform as transform;

pub use ophir_core::{
    Attribute, Block, IrContext, Location, Operation, OperationBuilder, Pass, PassManager,
    Region, Type, Value,
};

pub use ophir_emit::{OpPrintingFlags, Printer, TextPrinter};

pub use ophir_transform::{PassRegistry, PrintIrOptions, PrintIrPass};
