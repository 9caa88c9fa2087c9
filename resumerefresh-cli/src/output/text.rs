//! Text output formatting with colors.

use std::time::Duration;

use chrono::Local;
use resumerefresh_core::{PipelineOutcome, ProviderKind, RunReport};
use resumerefresh_providers::{ProviderDescriptor, ProviderRegistration, ProviderRegistry};
use resumerefresh_store::LoadedConfig;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const NAME_WIDTH: usize = 12;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Run report
    // ========================================================================

    /// Formats a run report: one line per provider, then a tally.
    pub fn format_report(&self, report: &RunReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold("Resume refresh"),
            self.dim(&format!(
                "(started {}, took {})",
                report
                    .started_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S"),
                format_duration(report.duration)
            ))
        ));

        for outcome in &report.outcomes {
            lines.push(self.format_outcome(outcome));
        }

        let failed = report.failures().len();
        let succeeded = report.outcomes.len() - failed;
        lines.push(String::new());
        let tally = format!("{succeeded} succeeded, {failed} failed");
        lines.push(if failed == 0 {
            self.green(&tally)
        } else {
            self.red(&tally)
        });

        lines.join("\n")
    }

    /// Formats one provider outcome.
    pub fn format_outcome(&self, outcome: &PipelineOutcome) -> String {
        let name = format!("{:<NAME_WIDTH$}", provider_display_name(&outcome.provider));
        let took = self.dim(&format!("{:>7}", format_duration(outcome.duration)));

        match outcome.error() {
            None => format!("{} {name} {took}", self.green("✓")),
            Some(err) => {
                let location = err
                    .origin()
                    .map(|(_, step)| format!(" at {step}"))
                    .unwrap_or_default();
                format!(
                    "{} {name} {took}  {}{location}: {}",
                    self.red("✗"),
                    self.red(err.kind().display_name()),
                    err.root()
                )
            }
        }
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Formats provider list header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{} {} {} {}",
            self.bold(&format!("{:<NAME_WIDTH$}", "Provider")),
            self.bold(&format!("{:<10}", "CLI")),
            self.bold(&format!("{:<9}", "Priority")),
            self.bold("Status")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(
        &self,
        desc: &ProviderDescriptor,
        registration: &ProviderRegistration,
    ) -> String {
        let status = if registration.enabled {
            self.green("✓ enabled")
        } else {
            self.dim("− no credentials")
        };

        format!(
            "{:<NAME_WIDTH$} {:<10} {:<9} {}",
            desc.display_name(),
            desc.cli_name(),
            registration.priority,
            status
        )
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Formats the effective configuration with passwords redacted.
    pub fn format_config(&self, loaded: &LoadedConfig) -> String {
        let config = loaded.config.redacted();
        let mut lines = Vec::new();

        lines.push(self.bold("ResumeRefresh Configuration"));
        lines.push("─".repeat(40));
        lines.push(String::new());

        let file_note = if loaded.file_found {
            String::new()
        } else {
            format!(" {}", self.dim("(not found, using defaults)"))
        };
        lines.push(format!("File:      {}{file_note}", loaded.path.display()));
        if !loaded.env_overrides.is_empty() {
            lines.push(format!("Env:       {}", loaded.env_overrides.join(", ")));
        }
        lines.push(String::new());

        let resume = match (&config.resume.path, &config.resume.filename) {
            (Some(path), Some(name)) => format!("{path} as {}", self.cyan(name)),
            (Some(path), None) => format!("{path} {}", self.red("(filename missing)")),
            (None, _) => self.red("not configured"),
        };
        lines.push(format!("Resume:    {resume}"));
        lines.push(format!(
            "HTTP:      timeout {}s, {} retries, wire log {}",
            config.http.timeout_secs,
            config.http.max_retries,
            if config.http.wire_log { "on" } else { "off" }
        ));
        lines.push(String::new());

        lines.push("Providers:".to_string());
        for kind in ProviderKind::all() {
            let settings = config.provider(*kind);
            let name = format!("{:<NAME_WIDTH$}", kind.display_name());
            let account = match (&settings.username, config.is_provider_enabled(*kind)) {
                (Some(user), true) => format!(
                    "{} password {}",
                    self.cyan(user),
                    settings.password.as_deref().unwrap_or_default()
                ),
                _ => self.dim("no credentials"),
            };
            let base_url = settings
                .base_url
                .as_deref()
                .map(|url| format!("  {}", self.dim(url)))
                .unwrap_or_default();
            lines.push(format!(
                "  {name} priority {:<4} {account}{base_url}",
                config.priority(*kind)
            ));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn provider_display_name(cli_name: &str) -> &str {
    ProviderRegistry::get_by_cli_name(cli_name).map_or(cli_name, |desc| desc.display_name())
}

/// Formats a duration as milliseconds below one second, seconds above.
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
