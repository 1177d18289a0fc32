/// Output formatting: engine envelopes as text, tables or JSON.
use std::io::{self, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;
use serde_json::{Map, Value};

use super::args::OutputFormat;
use crate::sandbox::SandboxOutput;
use crate::sandbox::rewrite::brand_hints;
use crate::types::{ErrorOutput, InitOutput};

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// When true, log timing spans.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            debug,
        }
    }

    /// Start a named timer. Logs elapsed time on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }
}

// --- Engine envelope ---

/// Write an engine envelope to `out`.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_sandbox_output<W: Write>(
    output: &SandboxOutput,
    ctx: &OutputCtx,
    out: &mut W,
) -> io::Result<()> {
    match ctx.format {
        OutputFormat::Json => write_json(out, &branded(output)),
        OutputFormat::Text => {
            let text = render_text(output, ctx.no_header);
            if text.is_empty() {
                Ok(())
            } else {
                writeln!(out, "{text}")
            }
        }
    }
}

/// Render an envelope as text.
///
/// Shows the first non-empty of: table, captured transcript, formatted
/// lines, entity.
#[must_use]
pub fn render_text(output: &SandboxOutput, no_header: bool) -> String {
    if !output.table.is_empty() {
        return render_table(&output.table, no_header);
    }
    if !output.captured.is_empty() {
        return join_branded(&output.captured);
    }
    if !output.formatted.is_empty() {
        return join_branded(&output.formatted);
    }
    match &output.entity {
        Some(Value::String(s)) => brand_hints(s).into_owned(),
        Some(entity) => serde_json::to_string_pretty(entity).unwrap_or_default(),
        None => String::new(),
    }
}

fn join_branded(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| brand_hints(l))
        .collect::<Vec<_>>()
        .join("\n")
}

fn branded(output: &SandboxOutput) -> SandboxOutput {
    let brand = |lines: &[String]| -> Vec<String> {
        lines.iter().map(|l| brand_hints(l).into_owned()).collect()
    };
    SandboxOutput {
        captured: brand(&output.captured),
        formatted: brand(&output.formatted),
        ..output.clone()
    }
}

fn render_table(rows: &[Map<String, Value>], no_header: bool) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !no_header {
        table.set_header(columns.iter().map(|c| c.to_uppercase()));
    }
    for row in rows {
        table.add_row(columns.iter().map(|c| cell_text(row.get(*c))));
    }
    table.to_string()
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// --- Init ---

/// Text shown after `sandbox init` created a project, ending in a blank line.
#[must_use]
pub fn render_init(result: &InitOutput) -> String {
    format!(
        "A local sandbox area '{}' was created for you.\n\
         You may deploy it by running the command shown on the next line:\n  {}\n\n",
        result.project, result.next_command
    )
}

/// Write the result of `sandbox init` to `out`.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_init<W: Write>(result: &InitOutput, ctx: &OutputCtx, out: &mut W) -> io::Result<()> {
    match ctx.format {
        OutputFormat::Json => write_json(out, result),
        OutputFormat::Text => out.write_all(render_init(result).as_bytes()),
    }
}

// --- Transcript ---

/// Best-effort dump of an engine transcript that accompanies a failure.
pub fn write_transcript<W: Write>(lines: &[String], out: &mut W) {
    let _ = writeln!(out, "{}", join_branded(lines));
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match resolve_format(format, json_flag) {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Text => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            log::debug!("{}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic JSON helpers ---

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(value: Value) -> SandboxOutput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_table_takes_priority() {
        let out = envelope(json!({
            "table": [{"name": "hello", "kind": "nodejs:14"}, {"name": "bye", "web": true}],
            "captured": ["ignored"],
        }));
        let text = render_text(&out, false);
        assert!(text.contains("NAME"));
        assert!(text.contains("KIND"));
        assert!(text.contains("WEB"));
        assert!(text.contains("nodejs:14"));
        assert!(text.contains("true"));
        assert!(!text.contains("ignored"));
        assert!(!text.contains("\"hello\""));
    }

    #[test]
    fn test_table_without_header() {
        let out = envelope(json!({"table": [{"name": "hello"}]}));
        let text = render_text(&out, true);
        assert!(!text.contains("NAME"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn test_captured_before_formatted_and_branded() {
        let out = envelope(json!({
            "captured": ["Deployed 'p'", "see nim action get f --url"],
            "formatted": ["ignored"],
        }));
        assert_eq!(
            render_text(&out, false),
            "Deployed 'p'\nsee cloudctl sbx fn get f --url"
        );
    }

    #[test]
    fn test_entity_rendering() {
        assert_eq!(render_text(&envelope(json!({"entity": "plain"})), false), "plain");
        assert_eq!(
            render_text(&envelope(json!({"entity": {"a": 1}})), false),
            "{\n  \"a\": 1\n}"
        );
        assert_eq!(render_text(&SandboxOutput::default(), false), "");
    }

    #[test]
    fn test_init_text() {
        let result = InitOutput {
            project: "hello".to_owned(),
            next_command: "cloudctl sandbox deploy hello".to_owned(),
        };
        assert_eq!(
            render_init(&result),
            "A local sandbox area 'hello' was created for you.\n\
             You may deploy it by running the command shown on the next line:\n  \
             cloudctl sandbox deploy hello\n\n"
        );
    }

    #[test]
    fn test_init_json() {
        let result = InitOutput {
            project: "hello".to_owned(),
            next_command: "cloudctl sandbox deploy hello".to_owned(),
        };
        let ctx = OutputCtx::new(OutputFormat::Json, false, false, false);
        let mut out = Vec::new();
        write_init(&result, &ctx, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"project": "hello", "next_command": "cloudctl sandbox deploy hello"})
        );
    }

    #[test]
    fn test_json_envelope_is_branded() {
        let ctx = OutputCtx::new(OutputFormat::Json, false, false, false);
        let mut out = Vec::new();
        write_sandbox_output(&envelope(json!({"formatted": ["nim project watch p"]})), &ctx, &mut out)
            .unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, json!({"formatted": ["cloudctl sandbox watch p"]}));
    }

    #[test]
    fn test_json_flag_wins() {
        assert_eq!(resolve_format(OutputFormat::Text, true), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Text, false), OutputFormat::Text);
    }
}
