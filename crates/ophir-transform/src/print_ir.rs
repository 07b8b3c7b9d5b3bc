use ophir_core::{Operation, Pass, PassState};
use ophir_emit::{OpPrintingFlags, Printer, TextPrinter};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintIrOptions {
    /// Destination file. `None` or an empty path means the diagnostic stream.
    pub file_name: Option<PathBuf>,
    /// Appended to the header line when non-empty.
    pub label: String,
}

impl PrintIrOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_file(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Could not open file: {}: {source}", path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The header line that precedes every dump, without its trailing newline.
pub fn dump_header(label: &str) -> String {
    if label.is_empty() {
        "// -----// IR Dump //----- //".to_string()
    } else {
        format!("// -----// IR Dump {} //----- //", label)
    }
}

/// Writes a labelled snapshot of the current operation to the diagnostic
/// stream or to a file. Never modifies the IR and keeps every analysis.
pub struct PrintIrPass {
    options: PrintIrOptions,
    flags: OpPrintingFlags,
    printer: Box<dyn Printer>,
}

impl PrintIrPass {
    pub fn new(options: PrintIrOptions) -> Self {
        Self {
            options,
            flags: OpPrintingFlags::default(),
            printer: Box::new(TextPrinter),
        }
    }

    pub fn with_printing_flags(mut self, flags: OpPrintingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_printer(mut self, printer: Box<dyn Printer>) -> Self {
        self.printer = printer;
        self
    }

    pub fn options(&self) -> &PrintIrOptions {
        &self.options
    }

    pub fn printing_flags(&self) -> &OpPrintingFlags {
        &self.flags
    }

    fn destination(&self) -> Option<&Path> {
        self.options
            .file_name
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Header line followed by the printer's rendering of `op`.
    pub fn print_ir(&self, writer: &mut dyn Write, op: &Operation) -> anyhow::Result<()> {
        writeln!(writer, "{}", dump_header(&self.options.label))?;
        self.printer.render(writer, op, &self.flags)
    }
}

impl Pass for PrintIrPass {
    fn name(&self) -> &'static str {
        "print-ir"
    }

    fn description(&self) -> &'static str {
        "Print IR on the debug stream"
    }

    fn run_on_operation(
        &mut self,
        op: &mut Operation,
        state: &mut PassState<'_>,
    ) -> anyhow::Result<()> {
        state.mark_all_analyses_preserved();

        let Some(path) = self.destination() else {
            debug!(label = %self.options.label, "dumping IR to the diagnostic stream");
            return self.print_ir(state.diagnostics(), op);
        };

        match File::create(path) {
            Ok(file) => {
                debug!(label = %self.options.label, path = %path.display(), "dumping IR to file");
                let mut writer = BufWriter::new(file);
                self.print_ir(&mut writer, op)?;
                writer.flush()?;
            }
            Err(source) => {
                error!(path = %path.display(), "could not open IR dump destination: {}", source);
                state.signal_pass_failure(DumpError::DestinationUnavailable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn create_print_ir_pass(options: PrintIrOptions, flags: OpPrintingFlags) -> Box<dyn Pass> {
    Box::new(PrintIrPass::new(options).with_printing_flags(flags))
}
