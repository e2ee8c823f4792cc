//! Phase-ordered execution of a build descriptor's goals.

use std::fmt;

use anyhow::{Context, Result};
use apipack_model::{BuildDescriptor, Phase, PluginBinding};
use tracing::{info, info_span};

/// How a goal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Completed,
    /// Switched off for this build.
    Skipped,
    /// Left to an external build host.
    Delegated,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Delegated => "delegated",
        })
    }
}

/// Runs one goal of a plugin binding.
pub trait GoalRunner {
    fn run_goal(&mut self, binding: &PluginBinding, goal: &str) -> Result<GoalStatus>;
}

/// A goal the lifecycle ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedGoal {
    pub phase: Phase,
    pub execution_id: String,
    pub goal: String,
    pub status: GoalStatus,
}

/// Run every bound goal up to and including `until`.
///
/// Phases run in lifecycle order, bindings within a phase in declaration
/// order and goals within a binding in list order. The first failing goal
/// stops the run; later goals are never invoked.
pub fn run_lifecycle<R: GoalRunner + ?Sized>(
    build: &BuildDescriptor,
    until: Phase,
    runner: &mut R,
) -> Result<Vec<ExecutedGoal>> {
    let mut executed = Vec::new();
    for phase in Phase::ALL.into_iter().filter(|phase| *phase <= until) {
        let _span = info_span!("phase", %phase).entered();
        for binding in build.bindings_for(phase) {
            for goal in &binding.goals {
                let status = runner.run_goal(binding, goal).with_context(|| {
                    format!(
                        "goal {goal} (execution {}) failed in phase {phase}",
                        binding.execution_id
                    )
                })?;
                info!(execution = %binding.execution_id, %goal, %status, "goal finished");
                executed.push(ExecutedGoal {
                    phase,
                    execution_id: binding.execution_id.clone(),
                    goal: goal.clone(),
                    status,
                });
            }
        }
    }
    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apipack_build::synthesize;
    use apipack_model::{BuildSwitches, ProjectDescriptor};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl GoalRunner for Recorder {
        fn run_goal(&mut self, binding: &PluginBinding, goal: &str) -> Result<GoalStatus> {
            self.calls.push(format!("{}:{goal}", binding.phase));
            Ok(GoalStatus::Completed)
        }
    }

    fn build(classifier: &str) -> BuildDescriptor {
        let descriptor = ProjectDescriptor {
            main: Some("api.raml".to_string()),
            classifier: Some(classifier.to_string()),
            group_id: "acme".to_string(),
            asset_id: "orders".to_string(),
            version: "1.0.0".to_string(),
            ..ProjectDescriptor::default()
        };
        synthesize(&descriptor, &BuildSwitches::default())
    }

    #[test]
    fn test_stops_at_requested_phase() {
        let mut runner = Recorder::default();
        let executed = run_lifecycle(&build("raml"), Phase::Compile, &mut runner).unwrap();
        assert_eq!(
            runner.calls,
            vec!["generate-sources:generate-full-api", "compile:validate-api"]
        );
        assert_eq!(executed.len(), 2);
    }

    #[test]
    fn test_goal_order_within_binding() {
        let mut runner = Recorder::default();
        run_lifecycle(&build("raml-fragment"), Phase::Deploy, &mut runner).unwrap();
        assert_eq!(
            runner.calls[2..],
            ["package:package-api", "package:rest-connect"]
        );
        assert_eq!(runner.calls.len(), 4);
    }
}
