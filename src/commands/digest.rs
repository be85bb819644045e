use anyhow::Result;
use docguard::config::Project;
use docguard::sources::{Scan, SourceSet};
use std::process::ExitCode;

/// Print the digest validation would compare against (or, with
/// `generate_set`, the one generation would embed)
pub fn digest_command(project: &Project, generate_set: bool) -> Result<ExitCode> {
    let (dir, scan) = if generate_set {
        (project.generate_dir(), Scan::Flat)
    } else {
        (project.validate_root(), Scan::Recursive)
    };

    let extension = &project.config.schema.extension;
    let sources = SourceSet::discover(&project.root, &dir, extension, scan)?;
    if sources.is_empty() {
        eprintln!("No *.{extension} files found in {}", dir.display());
        return Ok(ExitCode::FAILURE);
    }

    for path in sources.display_paths() {
        tracing::debug!("  {path}");
    }
    println!("{}", sources.digest()?);
    Ok(ExitCode::SUCCESS)
}
