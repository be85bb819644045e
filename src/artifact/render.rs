use chrono::{DateTime, SecondsFormat, Utc};
use minijinja::{Environment, context};
use tracing::debug;

use super::RenderedArtifact;
use super::metadata::ArtifactMetadata;
use crate::config::ArtifactConfig;
use crate::error::{DocguardError, Result};
use crate::sources::SourceSet;

const ARTIFACT_TEMPLATE: &str = include_str!("artifact.md.j2");
const PLACEHOLDER_TEMPLATE: &str = include_str!("placeholder.md.j2");

/// Renders the API reference document from schema sources
pub struct ArtifactRenderer {
    env: Environment<'static>,
    title: String,
    regenerate_command: String,
    extension: String,
}

impl ArtifactRenderer {
    pub fn new(config: &ArtifactConfig, extension: &str) -> Result<Self> {
        let mut env = Environment::new();

        // Fail on undefined variables instead of rendering blanks
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_template("artifact.md", ARTIFACT_TEMPLATE)
            .map_err(DocguardError::Render)?;
        env.add_template("placeholder.md", PLACEHOLDER_TEMPLATE)
            .map_err(DocguardError::Render)?;

        Ok(Self {
            env,
            title: config.title.clone(),
            regenerate_command: config.regenerate_command.clone(),
            extension: extension.to_string(),
        })
    }

    /// Render the full document for `sources`.
    ///
    /// Refuses an empty set: an empty schema section would be
    /// indistinguishable from a document that was never generated.
    pub fn render(
        &self,
        sources: &SourceSet,
        generated_at: DateTime<Utc>,
    ) -> Result<RenderedArtifact> {
        if sources.is_empty() {
            return Err(DocguardError::EmptySourceSet {
                dir: sources.root().to_path_buf(),
                extension: self.extension.clone(),
            });
        }

        let digest = sources.digest()?;
        let schema = sources.read_contents()?.join("\n\n");
        let generated_at = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let source_names = sources.display_paths();

        let metadata =
            ArtifactMetadata::generated(&digest, generated_at.clone(), source_names.clone());
        let metadata_yaml = metadata.to_yaml().map_err(|e| DocguardError::Metadata {
            path: sources.root().to_path_buf(),
            message: e.to_string(),
        })?;

        let body = self
            .env
            .get_template("artifact.md")
            .and_then(|template| {
                template.render(context! {
                    metadata => metadata_yaml,
                    title => &self.title,
                    extension => &self.extension,
                    fence => fence_language(&self.extension),
                    generated_at => &generated_at,
                    digest => digest.to_hex(),
                    digest_prefix => digest.display_prefix(),
                    sources => source_names,
                    schema => schema,
                    regenerate_command => &self.regenerate_command,
                })
            })
            .map_err(DocguardError::Render)?;

        debug!(
            "Rendered artifact from {} source file(s), digest {}",
            sources.len(),
            digest.display_prefix()
        );
        Ok(RenderedArtifact { metadata, body })
    }

    /// Render the "not yet generated" stand-in document
    pub fn render_placeholder(&self) -> Result<RenderedArtifact> {
        let metadata = ArtifactMetadata::placeholder();
        let metadata_yaml = metadata.to_yaml().map_err(|e| DocguardError::Metadata {
            path: "<placeholder>".into(),
            message: e.to_string(),
        })?;

        let body = self
            .env
            .get_template("placeholder.md")
            .and_then(|template| {
                template.render(context! {
                    metadata => metadata_yaml,
                    title => &self.title,
                    extension => &self.extension,
                    regenerate_command => &self.regenerate_command,
                })
            })
            .map_err(DocguardError::Render)?;

        Ok(RenderedArtifact { metadata, body })
    }
}

fn fence_language(extension: &str) -> &str {
    match extension {
        "proto" => "protobuf",
        "graphql" | "gql" => "graphql",
        other => other,
    }
}
