use crate::config::OpPrintingFlags;
use anyhow::Result;
use ophir_core::Operation;
use std::io::Write;

pub type EmitResult = Result<()>;

/// Renders an operation tree as text.
///
/// Implementations own the whole rendering of `op` and everything nested in
/// it; callers only choose the destination and the flags.
pub trait Printer: Send + Sync {
    fn render(&self, writer: &mut dyn Write, op: &Operation, flags: &OpPrintingFlags)
        -> EmitResult;

    fn render_to_string(&self, op: &Operation, flags: &OpPrintingFlags) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer, op, flags)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[derive(Debug, Clone)]
pub struct EmitContext {
    pub indent_level: usize,
    pub indent_chars: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_chars: "  ".to_string(),
            use_colors: false,
        }
    }

    pub fn from_flags(flags: &OpPrintingFlags) -> Self {
        Self {
            indent_level: 0,
            indent_chars: flags.indent_style.unit(),
            use_colors: flags.use_colors,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn get_indent(&self) -> String {
        self.indent_chars.repeat(self.indent_level)
    }

    pub fn nested(&self) -> Self {
        let mut ctx = self.clone();
        ctx.indent();
        ctx
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn write_line<W: Write + ?Sized>(
        writer: &mut W,
        context: &EmitContext,
        text: &str,
    ) -> EmitResult {
        writeln!(writer, "{}{}", context.get_indent(), text)?;
        Ok(())
    }

    pub fn colorize(context: &EmitContext, text: &str, color: &str) -> String {
        if !context.use_colors {
            return text.to_string();
        }
        use colored::Colorize;
        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            "cyan" => text.cyan().to_string(),
            "bright_black" => text.bright_black().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndentStyle;

    #[test]
    fn test_print_context_indentation() {
        let mut ctx = EmitContext::new();
        assert_eq!(ctx.get_indent(), "");

        ctx.indent();
        assert_eq!(ctx.get_indent(), "  ");

        ctx.indent();
        assert_eq!(ctx.get_indent(), "    ");

        ctx.dedent();
        ctx.dedent();
        ctx.dedent();
        assert_eq!(ctx.indent_level, 0);
        assert_eq!(ctx.get_indent(), "");
    }

    #[test]
    fn test_context_from_flags() {
        let flags = OpPrintingFlags::new().with_indent(IndentStyle::Tabs);
        let ctx = EmitContext::from_flags(&flags).nested().nested();
        assert_eq!(ctx.get_indent(), "\t\t");
        assert!(!ctx.use_colors);
    }

    #[test]
    fn test_print_helper_write_line() {
        let mut buffer = Vec::new();
        let ctx = EmitContext::new().nested();

        EmitHelper::write_line(&mut buffer, &ctx, "indented line").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "  indented line\n");
    }

    #[test]
    fn test_colorize_is_plain_without_colors() {
        let ctx = EmitContext::new();
        assert_eq!(EmitHelper::colorize(&ctx, "plain", "red"), "plain");
    }

    #[test]
    fn test_colorize_keeps_text() {
        let mut ctx = EmitContext::new();
        ctx.use_colors = true;
        assert!(EmitHelper::colorize(&ctx, "red text", "red").contains("red text"));
    }
}
