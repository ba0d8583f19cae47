// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Text and JSON rendering of run reports.

use std::io::{self, Write};

use console::Style;

use crate::config::Verbosity;

use super::finding::{Finding, PatchOrigin, PatchReport, RunReport, Section, SectionOutcome};

/// Where commit message conventions are documented.
pub const MESSAGE_FORMAT_URL: &str =
    "https://github.com/tianocore/tianocore.github.io/wiki/Commit-Message-Format";

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Renders a [`RunReport`].
#[derive(Debug, Clone)]
pub struct Renderer {
    verbosity: Verbosity,
    format: OutputFormat,
    color: bool,
}

impl Renderer {
    pub fn new(verbosity: Verbosity, format: OutputFormat, color: bool) -> Self {
        Self {
            verbosity,
            format,
            color,
        }
    }

    /// Write the report to `out`.
    pub fn render(&self, report: &RunReport, out: &mut dyn Write) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.render_json(report, out),
            OutputFormat::Text => self.render_text(report, out),
        }
    }

    /// Print the report to stdout.
    pub fn print(&self, report: &RunReport) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.render(report, &mut lock)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render_text(&self, report: &RunReport, out: &mut dyn Write) -> io::Result<()> {
        match self.verbosity {
            Verbosity::Silent => Ok(()),
            Verbosity::Oneline => {
                for patch in &report.patches {
                    let summary = if patch.is_ok() {
                        self.paint(&patch.summary(), Style::new().green())
                    } else {
                        self.paint(&patch.summary(), Style::new().red())
                    };
                    writeln!(out, "{} {}", patch.name, summary)?;
                }
                self.render_unresolved(report, out)
            }
            Verbosity::Normal => {
                for (i, patch) in report.patches.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    self.render_patch(patch, out)?;
                }
                self.render_unresolved(report, out)
            }
        }
    }

    fn render_unresolved(&self, report: &RunReport, out: &mut dyn Write) -> io::Result<()> {
        for spec in &report.unresolved {
            writeln!(out, "Couldn't find commit matching: '{}'", spec)?;
        }
        Ok(())
    }

    fn render_patch(&self, patch: &PatchReport, out: &mut dyn Write) -> io::Result<()> {
        let heading = match patch.origin {
            PatchOrigin::GitCommit => "Checking git commit:",
            PatchOrigin::PatchFile => "Checking patch file:",
        };
        writeln!(
            out,
            "{} {}",
            heading,
            self.paint(&patch.name, Style::new().cyan())
        )?;

        for section in &patch.sections {
            match section.section {
                Section::CommitterEmail | Section::AuthorEmail => {
                    self.render_email(section, out)?;
                }
                Section::Message => self.render_message(patch, section, out)?,
                Section::Diff => self.render_diff(patch, section, out)?,
            }
        }

        Ok(())
    }

    fn render_email(&self, section: &SectionOutcome, out: &mut dyn Write) -> io::Result<()> {
        let heading = format!("The '{}' email address is not valid:", section.label);
        self.render_findings(section, &heading, out)
    }

    fn render_message(
        &self,
        patch: &PatchReport,
        section: &SectionOutcome,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if let Some(ref subject) = patch.subject {
            writeln!(out, "{}", subject)?;
        }

        self.render_findings(section, "The commit message format is not valid:", out)?;

        if section.is_ok() {
            writeln!(
                out,
                "{}",
                self.paint(
                    "The commit message format passed all checks.",
                    Style::new().green()
                )
            )
        } else {
            writeln!(out, "{}", MESSAGE_FORMAT_URL)
        }
    }

    fn render_diff(
        &self,
        patch: &PatchReport,
        section: &SectionOutcome,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        self.render_findings(section, "Code format is not valid:", out)?;

        if section.is_ok() {
            writeln!(
                out,
                "{}",
                self.paint("The code passed all checks.", Style::new().green())
            )?;
        }

        if !patch.new_binaries.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "{} - The following binary files will be added into the repository:",
                self.paint("WARNING", Style::new().yellow().bold())
            )?;
            for binary in &patch.new_binaries {
                writeln!(out, "  {}", binary)?;
            }
        }

        Ok(())
    }

    /// Errors get a heading before the first one; warnings print inline.
    fn render_findings(
        &self,
        section: &SectionOutcome,
        heading: &str,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let mut heading_written = false;

        for finding in &section.findings {
            if finding.is_error() {
                if !heading_written {
                    writeln!(out, "{}", self.paint(heading, Style::new().red().bold()))?;
                    heading_written = true;
                }
                self.render_error(finding, out)?;
            } else {
                writeln!(
                    out,
                    "{} - {}",
                    self.paint("WARNING", Style::new().yellow().bold()),
                    finding.message
                )?;
                for detail in &finding.details {
                    writeln!(out, "{}", detail)?;
                }
            }
        }

        Ok(())
    }

    fn render_error(&self, finding: &Finding, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, " * {}", finding.message)?;
        for detail in &finding.details {
            writeln!(out, "   {}", detail)?;
        }
        Ok(())
    }

    fn render_json(&self, report: &RunReport, out: &mut dyn Write) -> io::Result<()> {
        let json = serde_json::json!({
            "ok": report.is_ok(),
            "errors": report.error_count(),
            "patches": report.patches.iter().map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "source": p.origin.to_string(),
                    "ok": p.is_ok(),
                    "subject": p.subject,
                    "sections": p.sections.iter().map(|s| {
                        serde_json::json!({
                            "section": s.section.to_string(),
                            "label": s.label,
                            "ok": s.is_ok(),
                            "findings": s.findings.iter().map(|f| {
                                serde_json::json!({
                                    "code": f.kind.code(),
                                    "severity": f.severity.to_string(),
                                    "message": f.message,
                                    "details": f.details,
                                })
                            }).collect::<Vec<_>>(),
                        })
                    }).collect::<Vec<_>>(),
                    "new_binaries": p.new_binaries,
                })
            }).collect::<Vec<_>>(),
            "unresolved": report.unresolved,
        });

        let text = serde_json::to_string_pretty(&json).map_err(io::Error::other)?;
        writeln!(out, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Finding, FindingKind};

    fn sample_report() -> RunReport {
        let mut patch = PatchReport::new("HEAD", PatchOrigin::GitCommit);
        patch.subject = Some("MdePkg: Fix typo".to_string());
        patch
            .sections
            .push(SectionOutcome::new(Section::AuthorEmail, "Author"));

        let mut message = SectionOutcome::new(Section::Message, "message");
        message.push(
            Finding::warning(
                FindingKind::MessageFormat,
                "Line 3 of commit message is too long (80 >= 76).",
            )
            .with_detail("x".repeat(80)),
        );
        patch.sections.push(message);

        let mut diff = SectionOutcome::new(Section::Diff, "diff");
        diff.push(
            Finding::error(FindingKind::DisallowedContent, "Tab character used")
                .with_detail("File: MdePkg/Foo.c")
                .with_detail("Line: \tx = 1;"),
        );
        patch.sections.push(diff);
        patch.new_binaries.push("MdePkg/logo.bmp".to_string());

        RunReport {
            patches: vec![patch],
            unresolved: Vec::new(),
        }
    }

    fn render(verbosity: Verbosity, format: OutputFormat) -> String {
        let renderer = Renderer::new(verbosity, format, false);
        let mut buf = Vec::new();
        renderer.render(&sample_report(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_normal_output() {
        let text = render(Verbosity::Normal, OutputFormat::Text);
        assert!(text.starts_with("Checking git commit: HEAD\nMdePkg: Fix typo\n"));
        assert!(text.contains("WARNING - Line 3 of commit message is too long"));
        assert!(text.contains("The commit message format passed all checks."));
        assert!(text.contains("Code format is not valid:\n * Tab character used\n   File: MdePkg/Foo.c\n"));
        assert!(!text.contains("The code passed all checks."));
        assert!(text.contains("binary files will be added into the repository:\n  MdePkg/logo.bmp\n"));
        assert!(!text.contains("email address is not valid"));
    }

    #[test]
    fn test_oneline_output() {
        let text = render(Verbosity::Oneline, OutputFormat::Text);
        assert_eq!(text, "HEAD bad diff content\n");
    }

    #[test]
    fn test_silent_output() {
        assert!(render(Verbosity::Silent, OutputFormat::Text).is_empty());
    }

    #[test]
    fn test_json_output() {
        let text = render(Verbosity::Silent, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["errors"], 1);
        let diff = &value["patches"][0]["sections"][2];
        assert_eq!(diff["section"], "diff");
        assert_eq!(diff["findings"][0]["code"], "disallowed-content");
        assert_eq!(value["patches"][0]["new_binaries"][0], "MdePkg/logo.bmp");
    }

    #[test]
    fn test_unresolved_output() {
        let report = RunReport {
            patches: Vec::new(),
            unresolved: vec!["nope".to_string()],
        };
        let renderer = Renderer::new(Verbosity::Normal, OutputFormat::Text, false);
        let mut buf = Vec::new();
        renderer.render(&report, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Couldn't find commit matching: 'nope'\n"
        );
    }
}
