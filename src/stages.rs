//! The concrete validation stages

use std::time::Duration;
use tracing::debug;

use crate::build_check::{CheckOutcome, Checker};
use crate::config::Project;
use crate::error::DocguardError;
use crate::freshness::{Freshness, check_freshness};
use crate::orchestrator::{Stage, StageResult};
use crate::sources::{Scan, SourceSet};
use crate::structure::{StructureReport, cross_check};

pub const API_DOCS_STAGE: &str = "api-docs";
pub const ARCHITECTURE_STAGE: &str = "architecture";
pub const BUILD_CHECK_STAGE: &str = "build-check";

/// An error with every underlying cause, e.g. `failed to read x: invalid UTF-8`
fn with_causes(err: DocguardError) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

/// Is the generated API reference current with the schema sources?
pub struct FreshnessStage<'a> {
    project: &'a Project,
}

impl<'a> FreshnessStage<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }
}

impl Stage for FreshnessStage<'_> {
    fn name(&self) -> &str {
        API_DOCS_STAGE
    }

    fn run(&self) -> StageResult {
        let gate = self.project.gate_dir();
        if !gate.is_dir() {
            return StageResult::skipped(
                API_DOCS_STAGE,
                format!(
                    "Skipping API docs validation ({} not yet created)",
                    self.project.config.schema.gate_dir.display()
                ),
            );
        }

        let extension = &self.project.config.schema.extension;
        let sources = match SourceSet::discover(
            &self.project.root,
            &self.project.validate_root(),
            extension,
            Scan::Recursive,
        ) {
            Ok(sources) => sources,
            Err(DocguardError::MissingInput { path, .. }) => {
                return StageResult::skipped(
                    API_DOCS_STAGE,
                    format!("Skipping API docs validation ({} not found)", path.display()),
                );
            }
            Err(e) => {
                return StageResult::fail(
                    API_DOCS_STAGE,
                    format!("API docs check failed: {}", with_causes(e)),
                );
            }
        };

        if sources.is_empty() {
            return StageResult::skipped(
                API_DOCS_STAGE,
                format!("Skipping API docs validation (no *.{extension} files yet)"),
            );
        }

        match check_freshness(&self.project.artifact_path(), &sources) {
            Ok(freshness @ Freshness::Fresh { .. }) => {
                StageResult::pass(API_DOCS_STAGE, Some(freshness.to_string()))
            }
            Ok(freshness) => StageResult::fail(API_DOCS_STAGE, freshness.to_string()),
            Err(e) => StageResult::fail(
                API_DOCS_STAGE,
                format!("API docs check failed: {}", with_causes(e)),
            ),
        }
    }
}

/// Do the modules the architecture docs describe exist?
pub struct StructureStage<'a> {
    project: &'a Project,
}

impl<'a> StructureStage<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }
}

impl Stage for StructureStage<'_> {
    fn name(&self) -> &str {
        ARCHITECTURE_STAGE
    }

    fn run(&self) -> StageResult {
        let overview = self.project.overview_path();
        if !overview.is_file() {
            return StageResult::fail(
                ARCHITECTURE_STAGE,
                format!(
                    "Architecture overview doesn't exist ({})",
                    self.project.config.architecture.overview.display()
                ),
            );
        }

        let architecture = &self.project.config.architecture;
        match cross_check(&architecture.expected, &self.project.modules_dir()) {
            Ok(StructureReport::NotBuilt) => StageResult::skipped(
                ARCHITECTURE_STAGE,
                format!(
                    "Skipping architecture check ({} not yet created)",
                    architecture.modules_dir.display()
                ),
            ),
            Ok(report) => StageResult::pass(ARCHITECTURE_STAGE, report.advisory()),
            Err(e) => StageResult::fail(
                ARCHITECTURE_STAGE,
                format!("Architecture check failed: {}", with_causes(e)),
            ),
        }
    }
}

/// Does the workspace still build?
pub struct BuildCheckStage<'a, C> {
    project: &'a Project,
    checker: C,
}

impl<'a, C: Checker> BuildCheckStage<'a, C> {
    pub fn new(project: &'a Project, checker: C) -> Self {
        Self { project, checker }
    }

    fn timeout(&self) -> Duration {
        self.project.config.build_check.timeout()
    }
}

impl<C: Checker> Stage for BuildCheckStage<'_, C> {
    fn name(&self) -> &str {
        BUILD_CHECK_STAGE
    }

    fn run(&self) -> StageResult {
        if !self.project.config.build_check.enabled {
            return StageResult::skipped(BUILD_CHECK_STAGE, "Build check disabled");
        }

        if !self.project.modules_dir().is_dir() {
            return StageResult::skipped(
                BUILD_CHECK_STAGE,
                format!(
                    "Skipping build check ({} not yet created)",
                    self.project.config.architecture.modules_dir.display()
                ),
            );
        }

        debug!("Build check: {}", self.checker.describe());
        match self.checker.run(self.timeout()) {
            CheckOutcome::Success => StageResult::pass(
                BUILD_CHECK_STAGE,
                Some(format!("`{}` passed", self.checker.describe())),
            ),
            outcome => StageResult::fail(BUILD_CHECK_STAGE, outcome.to_string()),
        }
    }
}
