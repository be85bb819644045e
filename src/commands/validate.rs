use anyhow::Result;
use docguard::config::Project;
use docguard::orchestrator::ValidationOrchestrator;
use docguard::report::{ReportFormat, write_report};
use std::io::Write;
use std::process::ExitCode;

pub fn validate_command(project: &Project, format: ReportFormat) -> Result<ExitCode> {
    if format == ReportFormat::Text {
        println!("🔍 Validating documentation in {}\n", project.root.display());
    }

    let verdict = ValidationOrchestrator::for_project(project).run();

    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, &verdict, format)?;
    stdout.flush()?;

    Ok(ExitCode::from(verdict.exit_code()))
}
