//! GitHub Actions YAML emission.
//!
//! `serialize` is a pure function from a `Workflow` to YAML text: no I/O,
//! no randomness, and no failure mode. Missing fields fall back to their
//! documented defaults instead of erroring, so any well-formed `Workflow`
//! value produces well-formed output text. Duplicate job ids are emitted
//! as-is; deduplication is deliberately not this layer's job.
//!
//! Not full YAML: no multi-line scalars, anchors, or comments. The only
//! quoting applied is the scalar-escaping rule in [`escape`].

use super::types::{StepAction, Workflow, DEFAULT_RUNNER, DEFAULT_STEP_NAME, DEFAULT_WORKFLOW_NAME};

/// Fixed trigger scaffold: every emitted workflow runs on pushes to
/// `main`. Triggers are not configurable through the model.
const TRIGGER_BLOCK: &str = "on:\n  push:\n    branches: [ main ]\n";

/// Quote a scalar for safe YAML emission.
///
/// A string is wrapped in double quotes iff it contains a colon or a
/// hyphen; otherwise it passes through unchanged. The empty string stays
/// empty (never `""`). Applies to the workflow name, step names, and run
/// commands; `uses` references and `runs-on` values are emitted raw.
///
/// Embedded double quotes and newlines are not escaped and can produce
/// invalid YAML. Retained as observed behavior.
pub fn escape(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.contains(':') || value.contains('-') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// Serialize a workflow into GitHub Actions YAML text.
///
/// Deterministic: identical input produces byte-identical output. Jobs
/// and steps are emitted in insertion order.
pub fn serialize(workflow: &Workflow) -> String {
    let name = if workflow.name.is_empty() {
        DEFAULT_WORKFLOW_NAME
    } else {
        workflow.name.as_str()
    };

    let mut yaml = format!("name: {}\n\n{}\njobs:\n", escape(name), TRIGGER_BLOCK);

    for job in &workflow.jobs {
        if job.id.is_empty() {
            yaml.push_str(&format!("  job{}:\n", job.ordinal()));
        } else {
            yaml.push_str(&format!("  {}:\n", job.id));
        }

        let runs_on = if job.runs_on.is_empty() {
            DEFAULT_RUNNER
        } else {
            job.runs_on.as_str()
        };
        yaml.push_str(&format!("    runs-on: {}\n", runs_on));
        yaml.push_str("    steps:\n");

        for step in &job.steps {
            let name = if step.name.is_empty() {
                DEFAULT_STEP_NAME
            } else {
                step.name.as_str()
            };
            yaml.push_str(&format!("      - name: {}\n", escape(name)));

            match &step.action {
                StepAction::Uses { uses } => {
                    // Version pins routinely contain `@` and `/`; emitted raw
                    yaml.push_str(&format!("        uses: {}\n", uses));
                }
                StepAction::Run { run } => {
                    yaml.push_str(&format!("        run: {}\n", escape(run)));
                }
            }
        }
    }

    yaml
}
