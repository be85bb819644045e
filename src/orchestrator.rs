//! Runs every validation stage and folds the results into one verdict

use serde::Serialize;
use tracing::{debug, info};

use crate::build_check::{Checker, CommandChecker};
use crate::config::Project;
use crate::stages::{BuildCheckStage, FreshnessStage, StructureStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    Pass,
    Fail,
    /// The stage does not apply to the project yet
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub stage: String,
    pub outcome: StageOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageResult {
    pub fn pass(stage: &str, message: Option<String>) -> Self {
        Self {
            stage: stage.to_string(),
            outcome: StageOutcome::Pass,
            message,
        }
    }

    pub fn fail(stage: &str, message: impl Into<String>) -> Self {
        Self {
            stage: stage.to_string(),
            outcome: StageOutcome::Fail,
            message: Some(message.into()),
        }
    }

    pub fn skipped(stage: &str, message: impl Into<String>) -> Self {
        Self {
            stage: stage.to_string(),
            outcome: StageOutcome::Skipped,
            message: Some(message.into()),
        }
    }
}

/// One independent check. Stages report problems through their result and
/// never abort the run.
pub trait Stage {
    fn name(&self) -> &str;
    fn run(&self) -> StageResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub stages: Vec<StageResult>,
    pub errors: Vec<String>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }
}

#[derive(Default)]
pub struct ValidationOrchestrator<'a> {
    stages: Vec<Box<dyn Stage + 'a>>,
}

impl<'a> ValidationOrchestrator<'a> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pipeline: API docs freshness, architecture layout, build check
    pub fn for_project(project: &'a Project) -> Self {
        let checker = CommandChecker::from_config(&project.config.build_check, &project.root);
        Self::for_project_with_checker(project, checker)
    }

    /// Same as [`ValidationOrchestrator::for_project`] with a custom build checker
    pub fn for_project_with_checker<C: Checker + 'a>(project: &'a Project, checker: C) -> Self {
        Self::new()
            .with_stage(FreshnessStage::new(project))
            .with_stage(StructureStage::new(project))
            .with_stage(BuildCheckStage::new(project, checker))
    }

    pub fn with_stage(mut self, stage: impl Stage + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run every stage in order. A failing stage does not stop later ones.
    pub fn run(&self) -> Verdict {
        let mut results = Vec::with_capacity(self.stages.len());
        let mut errors = Vec::new();

        for stage in &self.stages {
            debug!("Running stage '{}'", stage.name());
            let result = stage.run();
            debug!("Stage '{}' -> {:?}", result.stage, result.outcome);

            if result.outcome == StageOutcome::Fail {
                errors.push(
                    result
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("{} failed", result.stage)),
                );
            }
            results.push(result);
        }

        info!(
            "{} stage(s) run, {} failed",
            results.len(),
            errors.len()
        );
        Verdict {
            stages: results,
            errors,
        }
    }
}
