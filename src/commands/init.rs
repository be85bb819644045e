use anyhow::Result;
use docguard::artifact::ArtifactRenderer;
use docguard::config::Project;
use std::process::ExitCode;

pub fn init_command(project: &Project, force: bool) -> Result<ExitCode> {
    let path = project.artifact_path();
    let display = project.config.artifact.path.display();

    if path.exists() && !force {
        println!("⚠️  {display} already exists (use --force to replace it)");
        return Ok(ExitCode::FAILURE);
    }

    let renderer =
        ArtifactRenderer::new(&project.config.artifact, &project.config.schema.extension)?;
    renderer.render_placeholder()?.write_to(&path)?;

    println!("✅ Wrote placeholder {display}");
    println!(
        "   Validation fails until it is replaced by `{}`",
        project.config.artifact.regenerate_command
    );
    Ok(ExitCode::SUCCESS)
}
