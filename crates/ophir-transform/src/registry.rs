//! Textual pass pipelines.
//!
//! A pipeline is a comma separated list of pass entries, each optionally
//! followed by `{key=value ...}` options:
//!
//! ```text
//! print-ir{label=before},strip-debuginfo,print-ir{label=after file-name="out dir/x.mlir"}
//! ```

use crate::errors::TransformError;
use crate::print_ir::{PrintIrOptions, PrintIrPass};
use crate::strip_debug_info::StripDebugInfoPass;
use ophir_core::{Pass, PassManager};
use ophir_emit::OpPrintingFlags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEntry {
    pub name: String,
    pub options: Vec<(String, String)>,
}

/// Options of one pipeline entry, consumed by the pass factory.
#[derive(Debug)]
pub struct PassOptions {
    pass: String,
    entries: Vec<(String, String)>,
}

impl PassOptions {
    pub fn new(pass: impl Into<String>, entries: Vec<(String, String)>) -> Self {
        Self {
            pass: pass.into(),
            entries,
        }
    }

    /// Removes `key`; when given more than once the last value wins.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let mut found = None;
        self.entries.retain(|(k, v)| {
            if k == key {
                found = Some(v.clone());
                false
            } else {
                true
            }
        });
        found
    }

    pub fn take_bool(&mut self, key: &str) -> Result<Option<bool>, TransformError> {
        let Some(value) = self.take(key) else {
            return Ok(None);
        };
        let parsed = match value.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| self.invalid(key, value))
    }

    pub fn take_usize(&mut self, key: &str) -> Result<Option<usize>, TransformError> {
        match self.take(key) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, value)),
        }
    }

    /// Fails on the first option no factory consumed.
    pub fn finish(self) -> Result<(), TransformError> {
        match self.entries.into_iter().next() {
            None => Ok(()),
            Some((option, _)) => Err(TransformError::UnknownOption {
                pass: self.pass,
                option,
            }),
        }
    }

    fn invalid(&self, option: &str, value: String) -> TransformError {
        TransformError::InvalidOptionValue {
            pass: self.pass.clone(),
            option: option.to_string(),
            value,
        }
    }
}

pub type PassFactory = fn(PassOptions) -> Result<Box<dyn Pass>, TransformError>;

pub struct PassInfo {
    pub name: &'static str,
    pub description: &'static str,
    factory: PassFactory,
}

pub struct PassRegistry {
    passes: Vec<PassInfo>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn with_builtin_passes() -> Self {
        let mut registry = Self::new();
        registry.register("print-ir", "Print IR on the debug stream", build_print_ir);
        registry.register(
            "strip-debuginfo",
            "Strip debug info from all operations",
            build_strip_debug_info,
        );
        registry
    }

    pub fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        factory: PassFactory,
    ) {
        self.passes.retain(|info| info.name != name);
        self.passes.push(PassInfo {
            name,
            description,
            factory,
        });
    }

    pub fn passes(&self) -> &[PassInfo] {
        &self.passes
    }

    pub fn create(&self, entry: &PipelineEntry) -> Result<Box<dyn Pass>, TransformError> {
        let info = self
            .passes
            .iter()
            .find(|info| info.name == entry.name)
            .ok_or_else(|| TransformError::UnknownPass(entry.name.clone()))?;
        (info.factory)(PassOptions::new(entry.name.clone(), entry.options.clone()))
    }

    pub fn parse_pipeline(&self, pipeline: &str) -> Result<Vec<Box<dyn Pass>>, TransformError> {
        parse_pipeline_entries(pipeline)?
            .iter()
            .map(|entry| self.create(entry))
            .collect()
    }

    /// Appends every pass of `pipeline` to `manager`.
    pub fn populate(
        &self,
        manager: &mut PassManager,
        pipeline: &str,
    ) -> Result<(), TransformError> {
        for pass in self.parse_pipeline(pipeline)? {
            manager.register_boxed(pass);
        }
        Ok(())
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::with_builtin_passes()
    }
}

fn build_print_ir(mut opts: PassOptions) -> Result<Box<dyn Pass>, TransformError> {
    let mut options = PrintIrOptions::default();
    if let Some(label) = opts.take("label") {
        options.label = label;
    }
    if let Some(file_name) = opts.take("file-name") {
        options.file_name = Some(file_name.into());
    }

    let mut flags = OpPrintingFlags::default();
    if let Some(limit) = opts.take_usize("elide-elementsattrs-if-larger")? {
        flags = flags.elide_large_elements_attrs(limit);
    }
    if let Some(enabled) = opts.take_bool("print-debuginfo")? {
        flags.print_debug_info = enabled;
    }
    if let Some(enabled) = opts.take_bool("print-value-users")? {
        flags.print_value_users = enabled;
    }
    if let Some(enabled) = opts.take_bool("skip-regions")? {
        flags.skip_regions = enabled;
    }
    opts.finish()?;

    Ok(Box::new(
        PrintIrPass::new(options).with_printing_flags(flags),
    ))
}

fn build_strip_debug_info(opts: PassOptions) -> Result<Box<dyn Pass>, TransformError> {
    opts.finish()?;
    Ok(Box::new(StripDebugInfoPass::new()))
}

pub fn parse_pipeline_entries(pipeline: &str) -> Result<Vec<PipelineEntry>, TransformError> {
    if pipeline.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(pipeline, |c| c == ',', true)?
        .into_iter()
        .map(|raw| parse_entry(raw.trim()))
        .collect()
}

fn parse_entry(raw: &str) -> Result<PipelineEntry, TransformError> {
    let (name, options) = match raw.find('{') {
        None => (raw, Vec::new()),
        Some(open) => {
            let inner = raw[open + 1..].strip_suffix('}').ok_or_else(|| {
                TransformError::MalformedPipeline(format!("expected '}}' at end of '{}'", raw))
            })?;
            (raw[..open].trim(), parse_options(inner)?)
        }
    };

    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(TransformError::MalformedPipeline(format!(
            "invalid pass name '{}'",
            name
        )));
    }

    Ok(PipelineEntry {
        name: name.to_string(),
        options,
    })
}

fn parse_options(inner: &str) -> Result<Vec<(String, String)>, TransformError> {
    let mut options = Vec::new();
    for token in split_top_level(inner, char::is_whitespace, false)? {
        if token.is_empty() {
            continue;
        }
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, unquote(value)),
            None => (token, "true"),
        };
        if key.is_empty() {
            return Err(TransformError::MalformedPipeline(format!(
                "option without a name: '{}'",
                token
            )));
        }
        options.push((key.to_string(), value.to_string()));
    }
    Ok(options)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Splits on `is_separator` outside of quotes and braces. With `reject_empty`,
/// an empty piece is a malformed pipeline.
fn split_top_level(
    input: &str,
    is_separator: impl Fn(char) -> bool,
    reject_empty: bool,
) -> Result<Vec<&str>, TransformError> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '{' if !in_quotes => depth += 1,
            '}' if !in_quotes => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    TransformError::MalformedPipeline(format!("unbalanced '}}' in '{}'", input))
                })?
            }
            c if !in_quotes && depth == 0 && is_separator(c) => {
                pieces.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if in_quotes || depth != 0 {
        return Err(TransformError::MalformedPipeline(format!(
            "unterminated quote or brace in '{}'",
            input
        )));
    }
    pieces.push(&input[start..]);

    if reject_empty && pieces.iter().any(|p| p.trim().is_empty()) {
        return Err(TransformError::MalformedPipeline(format!(
            "empty pass entry in '{}'",
            input
        )));
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_parse_entries() {
        let entries =
            parse_pipeline_entries("print-ir{label=before}, strip-debuginfo ,print-ir").unwrap();
        assert_eq!(
            entries,
            vec![
                PipelineEntry {
                    name: "print-ir".into(),
                    options: vec![("label".into(), "before".into())],
                },
                PipelineEntry {
                    name: "strip-debuginfo".into(),
                    options: vec![],
                },
                PipelineEntry {
                    name: "print-ir".into(),
                    options: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_quoted_values_and_flags() {
        let entries =
            parse_pipeline_entries(r#"print-ir{file-name="a b,c.mlir" print-debuginfo}"#)
                .unwrap();
        assert_eq!(
            entries[0].options,
            vec![
                ("file-name".to_string(), "a b,c.mlir".to_string()),
                ("print-debuginfo".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_pipeline() {
        assert!(parse_pipeline_entries("  ").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_pipelines() {
        for bad in ["print-ir{label=x", "print-ir}", "a,,b", "print-ir{=x}", "bad name"] {
            assert!(
                matches!(
                    parse_pipeline_entries(bad),
                    Err(TransformError::MalformedPipeline(_))
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_build_print_ir_from_options() {
        let registry = PassRegistry::with_builtin_passes();
        let passes = registry
            .parse_pipeline(
                "print-ir{label=after-fold file-name=out.mlir elide-elementsattrs-if-larger=8 print-value-users=true}",
            )
            .unwrap();
        assert_eq!(passes.len(), 1);

        let pass = passes[0].as_any().downcast_ref::<PrintIrPass>().unwrap();
        assert_eq!(pass.options().label, "after-fold");
        assert_eq!(pass.options().file_name, Some(PathBuf::from("out.mlir")));
        assert_eq!(pass.printing_flags().elide_large_elements_attrs, Some(8));
        assert!(pass.printing_flags().print_value_users);
        assert!(!pass.printing_flags().print_debug_info);
    }

    #[test]
    fn test_unknown_pass_and_option() {
        let registry = PassRegistry::default();
        assert_eq!(
            registry.parse_pipeline("canonicalize").err(),
            Some(TransformError::UnknownPass("canonicalize".into()))
        );
        assert_eq!(
            registry.parse_pipeline("strip-debuginfo{label=x}").err(),
            Some(TransformError::UnknownOption {
                pass: "strip-debuginfo".into(),
                option: "label".into(),
            })
        );
        assert_eq!(
            registry
                .parse_pipeline("print-ir{elide-elementsattrs-if-larger=many}")
                .err(),
            Some(TransformError::InvalidOptionValue {
                pass: "print-ir".into(),
                option: "elide-elementsattrs-if-larger".into(),
                value: "many".into(),
            })
        );
    }

    #[test]
    fn test_populate_manager() {
        let registry = PassRegistry::default();
        let mut manager = PassManager::new();
        registry
            .populate(&mut manager, "print-ir,strip-debuginfo,print-ir{label=after}")
            .unwrap();
        assert_eq!(
            manager.pass_names(),
            vec!["print-ir", "strip-debuginfo", "print-ir"]
        );
    }
}
