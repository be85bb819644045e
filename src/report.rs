//! Human and machine renderings of a validation verdict

use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::orchestrator::{StageOutcome, StageResult, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    verdict: &'static str,
    exit_code: u8,
    stages: &'a [StageResult],
    errors: &'a [String],
}

pub fn write_report<W: Write>(
    out: &mut W,
    verdict: &Verdict,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => write_text(out, verdict),
        ReportFormat::Json => {
            let json = to_json(verdict).map_err(io::Error::other)?;
            writeln!(out, "{json}")
        }
    }
}

pub fn write_text<W: Write>(out: &mut W, verdict: &Verdict) -> io::Result<()> {
    for stage in &verdict.stages {
        write_stage_line(out, stage)?;
    }

    writeln!(out)?;
    if verdict.passed() {
        writeln!(
            out,
            "{}",
            "✅ All documentation is valid and current!".green().bold()
        )?;
    } else {
        writeln!(out, "{}", "❌ Documentation validation failed:".red().bold())?;
        for error in &verdict.errors {
            let mut lines = error.lines();
            if let Some(first) = lines.next() {
                writeln!(out, "  ❌ {first}")?;
            }
            for line in lines {
                writeln!(out, "     {line}")?;
            }
        }
    }
    Ok(())
}

fn write_stage_line<W: Write>(out: &mut W, stage: &StageResult) -> io::Result<()> {
    let (icon, label) = match stage.outcome {
        StageOutcome::Pass => ("✅", stage.stage.green()),
        StageOutcome::Fail => ("❌", stage.stage.red()),
        StageOutcome::Skipped => ("⏭️ ", stage.stage.dimmed()),
    };
    match stage.message.as_deref() {
        // Multi-line failure output is listed in the summary instead
        Some(message) => {
            let first = message.lines().next().unwrap_or_default();
            writeln!(out, "{icon} {label}: {first}")
        }
        None => writeln!(out, "{icon} {label}"),
    }
}

pub fn to_json(verdict: &Verdict) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        verdict: if verdict.passed() { "pass" } else { "fail" },
        exit_code: verdict.exit_code(),
        stages: &verdict.stages,
        errors: &verdict.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn verdict() -> Verdict {
        Verdict {
            stages: vec![
                StageResult::pass("architecture", Some("Documented modules not found: b".into())),
                StageResult::fail("api-docs", "API docs out of date"),
                StageResult::skipped("build-check", "Skipping build check"),
            ],
            errors: vec!["API docs out of date".to_string()],
        }
    }

    #[test]
    fn test_text_report_lists_stages_and_errors() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_text(&mut out, &verdict()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("✅ architecture: Documented modules not found: b"));
        assert!(text.contains("⏭️  build-check: Skipping build check"));
        assert!(text.contains("❌ Documentation validation failed:"));
        assert!(text.contains("  ❌ API docs out of date"));
    }

    #[test]
    fn test_json_report_shape() {
        let json: Value = serde_json::from_str(&to_json(&verdict()).unwrap()).unwrap();
        assert_eq!(json["verdict"], "fail");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["stages"][1]["outcome"], "fail");
        assert_eq!(json["stages"][2]["outcome"], "skipped");
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}
