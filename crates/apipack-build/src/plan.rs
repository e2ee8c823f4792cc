//! Text rendering of the lifecycle plan.

use std::fmt::Write;

use apipack_model::{BuildDescriptor, Phase};

/// One line per execution, grouped under the phase it is bound to.
///
/// Phases without bindings are omitted.
pub fn render_plan(build: &BuildDescriptor) -> String {
    let mut out = String::new();
    for phase in Phase::ALL {
        let mut bindings = build.bindings_for(phase).peekable();
        if bindings.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "{phase}:");
        for binding in bindings {
            let _ = writeln!(
                out,
                "  {} ({}) -> {}",
                binding.execution_id,
                binding.plugin.artifact_id,
                binding.goals.join(", ")
            );
        }
    }
    out
}
