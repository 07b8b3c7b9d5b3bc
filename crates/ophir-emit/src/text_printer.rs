use crate::config::OpPrintingFlags;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Printer};
use crate::ir_formatter_base::{IRFormatterBase, SsaNameState, UseMap};
use ophir_core::{Block, Operation, Region};
use std::io::Write;

/// Prints operations in the generic form:
///
/// ```text
/// %0 = "arith.constant"() {value = 1 : i32} : () -> i32
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPrinter;

impl TextPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for TextPrinter {
    fn render(
        &self,
        writer: &mut dyn Write,
        op: &Operation,
        flags: &OpPrintingFlags,
    ) -> EmitResult {
        let names = SsaNameState::build(op);
        let uses = if flags.print_value_users {
            Some(UseMap::build(op, &names))
        } else {
            None
        };
        let mut session = PrintSession {
            flags,
            names: &names,
            uses: uses.as_ref(),
            context: EmitContext::from_flags(flags),
        };
        session.print_operation(writer, op)?;
        writer.flush()?;
        Ok(())
    }
}

struct PrintSession<'a> {
    flags: &'a OpPrintingFlags,
    names: &'a SsaNameState,
    uses: Option<&'a UseMap>,
    context: EmitContext,
}

impl PrintSession<'_> {
    fn print_operation(&mut self, writer: &mut dyn Write, op: &Operation) -> EmitResult {
        let mut head = String::new();
        if !op.results.is_empty() {
            let results: Vec<&str> = op.results.iter().map(|r| self.names.name(r)).collect();
            head.push_str(&results.join(", "));
            head.push_str(" = ");
        }
        let quoted = IRFormatterBase::quote_name(&op.name);
        head.push_str(&EmitHelper::colorize(&self.context, &quoted, "cyan"));
        let operands: Vec<&str> = op.operands.iter().map(|v| self.names.name(v)).collect();
        head.push('(');
        head.push_str(&operands.join(", "));
        head.push(')');

        if op.regions.is_empty() {
            let tail = self.operation_tail(op);
            return EmitHelper::write_line(writer, &self.context, &format!("{}{}", head, tail));
        }

        if self.flags.skip_regions {
            let skipped = vec!["{...}"; op.regions.len()].join(", ");
            let tail = self.operation_tail(op);
            return EmitHelper::write_line(
                writer,
                &self.context,
                &format!("{} ({}){}", head, skipped, tail),
            );
        }

        EmitHelper::write_line(writer, &self.context, &format!("{} ({{", head))?;
        for (i, region) in op.regions.iter().enumerate() {
            if i > 0 {
                EmitHelper::write_line(writer, &self.context, "}, {")?;
            }
            self.print_region(writer, region)?;
        }
        let tail = self.operation_tail(op);
        EmitHelper::write_line(writer, &self.context, &format!("}}){}", tail))
    }

    /// Everything after the operands and regions: attributes, signature,
    /// location and the users comment.
    fn operation_tail(&self, op: &Operation) -> String {
        let mut tail = String::new();
        let attrs = IRFormatterBase::format_attribute_dict(op, self.flags);
        if !attrs.is_empty() {
            tail.push(' ');
            tail.push_str(&attrs);
        }
        tail.push_str(" : ");
        tail.push_str(&IRFormatterBase::format_signature(op));
        if self.flags.print_debug_info {
            tail.push_str(&format!(" loc({})", op.location));
        }
        if let Some(uses) = self.uses {
            let users = uses.users_of(op);
            if !users.is_empty() {
                let comment = format!(" // users: {}", users.join(", "));
                tail.push_str(&EmitHelper::colorize(&self.context, &comment, "bright_black"));
            }
        }
        tail
    }

    fn print_region(&mut self, writer: &mut dyn Write, region: &Region) -> EmitResult {
        for (index, block) in region.blocks.iter().enumerate() {
            if index > 0 || !block.arguments.is_empty() {
                let label = self.block_label(index, block);
                EmitHelper::write_line(writer, &self.context, &label)?;
            }
            self.context.indent();
            for op in &block.operations {
                self.print_operation(writer, op)?;
            }
            self.context.dedent();
        }
        Ok(())
    }

    fn block_label(&self, index: usize, block: &Block) -> String {
        if block.arguments.is_empty() {
            return format!("^bb{}:", index);
        }
        let args: Vec<String> = block
            .arguments
            .iter()
            .map(|arg| format!("{}: {}", self.names.name(arg), arg.ty))
            .collect();
        format!("^bb{}({}):", index, args.join(", "))
    }
}
