//! Output Rendering
//!
//! Renders use case results as human-readable text or JSON. Text renderers
//! return strings so commands decide where they go and tests can snapshot
//! them with color disabled.

use std::fmt::Write as _;
use std::path::Path;

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::application::{
    ArchiveListing, BuildReport, CheckResult, CheckStatus, DependencyReport, WatchEvent,
};
use crate::domain::ports::{BuildEvent, BuildEventSink};

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
#[derive(Debug, Clone, Copy)]
struct Icons {
    check: &'static str,
    cross: &'static str,
    warn: &'static str,
    arrow: &'static str,
    watch: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            warn: "⚠",
            arrow: "→",
            watch: "⟳",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            warn: "[WARN]",
            arrow: "->",
            watch: "[WATCH]",
        }
    }
}

/// Text renderer for every command
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    use_color: bool,
    icons: Icons,
}

impl TextRenderer {
    pub fn new(use_color: bool, unicode: bool) -> Self {
        Self {
            use_color,
            icons: if unicode {
                Icons::unicode()
            } else {
                Icons::ascii()
            },
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, Color::DarkGrey)
    }

    pub fn render_build(&self, report: &BuildReport, verbose: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} Built {}",
            self.success(self.icons.check),
            display_path(&report.output)
        );
        let replaced = report.duplicates.len() - report.conflicts.len();
        let rows = [
            ("entries", report.entries.to_string()),
            ("size", format_bytes(report.bytes)),
            ("embedded", report.artifacts.len().to_string()),
            ("duplicates", replaced.to_string()),
            ("conflicts", report.conflicts.len().to_string()),
            ("signatures removed", report.excluded_entries.len().to_string()),
        ];
        out.push_str(&self.key_values(&rows));

        if verbose {
            for artifact in &report.artifacts {
                let _ = writeln!(out, "  {} {}", self.dim(self.icons.arrow), artifact);
            }
            for module in &report.excluded_modules {
                let _ = writeln!(out, "  {} excluded {}", self.dim("-"), module);
            }
            for entry in &report.excluded_entries {
                let _ = writeln!(out, "  {} stripped {}", self.dim("-"), entry);
            }
        }

        for conflict in &report.conflicts {
            let _ = writeln!(
                out,
                "{} {}: kept {}, dropped {}",
                self.warning(self.icons.warn),
                conflict.path,
                conflict.kept_from,
                conflict.dropped_from
            );
        }
        out
    }

    pub fn render_check(&self, result: &CheckResult) -> String {
        let mut out = String::new();
        let width = result
            .items
            .iter()
            .map(|item| UnicodeWidthStr::width(item.name.as_str()))
            .max()
            .unwrap_or(0);
        for item in &result.items {
            let icon = match item.status {
                CheckStatus::Pass => self.success(self.icons.check),
                CheckStatus::Warning => self.warning(self.icons.warn),
                CheckStatus::Error => self.error(self.icons.cross),
            };
            let _ = writeln!(
                out,
                "{} {}  {}",
                icon,
                pad(&item.name, width),
                item.message
            );
        }
        let _ = writeln!(
            out,
            "\n{} passed, {} warnings, {} errors",
            result.passed, result.warnings, result.errors
        );
        out
    }

    pub fn render_dependencies(&self, report: &DependencyReport) -> String {
        let mut out = String::new();
        if report.tree.is_empty() && report.local.is_empty() {
            out.push_str("No embedded dependencies\n");
            return out;
        }
        out.push_str(&report.tree);
        for path in &report.local {
            let _ = writeln!(out, "{} (local)", display_path(path));
        }
        if !report.excluded.is_empty() {
            let _ = writeln!(
                out,
                "\n{} {}",
                self.dim("excluded:"),
                report.excluded.join(", ")
            );
        }
        out
    }

    pub fn render_listing(&self, listing: &ArchiveListing) -> String {
        let files: Vec<_> = listing.entries.iter().filter(|e| !e.directory).collect();
        let width = files
            .iter()
            .map(|e| UnicodeWidthStr::width(e.name.as_str()))
            .max()
            .unwrap_or(0);
        let sizes: Vec<String> = files.iter().map(|e| e.size.to_string()).collect();
        let size_width = sizes.iter().map(String::len).max().unwrap_or(0);

        let mut out = String::new();
        for (entry, size) in files.iter().zip(&sizes) {
            let hash = entry
                .hash
                .as_deref()
                .map(short_hash)
                .unwrap_or("-");
            let _ = write!(
                out,
                "{}  {:>size_width$}  {}",
                pad(&entry.name, width),
                size,
                self.dim(hash),
            );
            if entry.signature {
                let _ = write!(out, "  {}", self.warning("signature"));
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "\n{} files, {}, {} signature entries",
            files.len(),
            format_bytes(listing.total_size),
            listing.signature_count()
        );
        out
    }

    pub fn render_watch_event(&self, event: &WatchEvent) -> String {
        match event {
            WatchEvent::WatchStarted { watching } => format!(
                "{} Watching {}\n",
                self.paint(self.icons.watch, Color::Cyan),
                watching.join(", ")
            ),
            WatchEvent::FileChanged { path } => {
                format!("  {} {}\n", self.dim("changed"), path)
            }
            WatchEvent::ConfigReloaded => format!("  {}\n", self.dim("configuration reloaded")),
            WatchEvent::BuildStarted => String::new(),
            WatchEvent::BuildComplete {
                output,
                entries,
                conflicts,
            } => {
                let mut line = format!(
                    "{} Built {} ({} entries)",
                    self.success(self.icons.check),
                    output,
                    entries
                );
                if *conflicts > 0 {
                    line.push_str(&self.warning(&format!(", {} conflicts", conflicts)));
                }
                line.push('\n');
                line
            }
            WatchEvent::Error { message } => {
                format!("{} {}\n", self.error(self.icons.cross), message)
            }
            WatchEvent::Shutdown => format!("{}\n", self.dim("Stopped watching")),
        }
    }

    fn key_values(&self, rows: &[(&str, String)]) -> String {
        let width = rows
            .iter()
            .map(|(k, _)| UnicodeWidthStr::width(*k))
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for (key, value) in rows {
            let _ = writeln!(out, "  {}  {}", self.dim(&pad(key, width)), value);
        }
        out
    }
}

/// One JSON object with a `command` field, for `--json` output
pub fn json_line<T: Serialize>(command: &str, value: &T) -> String {
    match serde_json::to_value(value).unwrap_or(serde_json::Value::Null) {
        serde_json::Value::Object(mut obj) => {
            obj.insert("command".to_string(), serde_json::json!(command));
            serde_json::Value::Object(obj).to_string()
        }
        other => serde_json::json!({ "command": command, "result": other }).to_string(),
    }
}

/// Progress lines on stderr while resolving and assembling
pub struct ConsoleEventSink {
    renderer: TextRenderer,
}

impl ConsoleEventSink {
    pub fn new(renderer: TextRenderer) -> Self {
        Self { renderer }
    }

    pub fn format(&self, event: &BuildEvent) -> Option<String> {
        match event {
            BuildEvent::Fetching { artifact } => Some(format!(
                "  {} {}",
                self.renderer.dim("fetch"),
                artifact
            )),
            BuildEvent::Resolved { modules, excluded } => Some(format!(
                "  {} {} modules ({} excluded)",
                self.renderer.dim("resolved"),
                modules,
                excluded
            )),
            BuildEvent::ConflictingDuplicate { .. }
            | BuildEvent::HostArtifactFound { .. }
            | BuildEvent::LayerStarted { .. }
            | BuildEvent::Completed { .. } => None,
        }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        if let Some(line) = self.format(&event) {
            eprintln!("{}", line);
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(current)))
}

fn short_hash(hash: &str) -> &str {
    let hex = hash.strip_prefix("sha256:").unwrap_or(hash);
    &hex[..hex.len().min(12)]
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}
