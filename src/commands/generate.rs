use anyhow::{Context, Result};
use chrono::Utc;
use docguard::DocguardError;
use docguard::artifact::ArtifactRenderer;
use docguard::config::Project;
use docguard::sources::{Scan, SourceSet};
use std::process::ExitCode;

pub fn generate_command(project: &Project) -> Result<ExitCode> {
    println!("📝 Generating API documentation...");

    let schema = &project.config.schema;
    let sources = match SourceSet::discover(
        &project.root,
        &project.generate_dir(),
        &schema.extension,
        Scan::Flat,
    ) {
        Ok(sources) => sources,
        Err(DocguardError::MissingInput { .. }) => {
            println!(
                "⚠️  Schema directory doesn't exist yet: {}",
                schema.generate_dir.display()
            );
            println!("   Add the *.{} files there first", schema.extension);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if sources.is_empty() {
        println!(
            "⚠️  No *.{} files found in {}",
            schema.extension,
            schema.generate_dir.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let renderer = ArtifactRenderer::new(&project.config.artifact, &schema.extension)?;
    let artifact = renderer
        .render(&sources, Utc::now())
        .context("Failed to render API documentation")?;

    let output = project.artifact_path();
    artifact.write_to(&output)?;

    println!("✅ Generated {}", project.config.artifact.path.display());
    if let Some(digest) = artifact.metadata.digest() {
        println!(
            "   {} source file(s), schema hash {}",
            sources.len(),
            digest.display_prefix()
        );
    }
    println!("   Remember to also regenerate the client and server bindings from the same schema.");

    Ok(ExitCode::SUCCESS)
}
