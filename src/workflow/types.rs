//! Workflow type definitions and model operations.
//!
//! These types form the in-memory document that the emitter turns into
//! GitHub Actions YAML. Producers (definition files, the template catalog)
//! mutate a `Workflow` through the handle-based operations below; nothing
//! here validates cross-field consistency, and missing values fall back to
//! documented defaults at emission time.

use serde::{Deserialize, Serialize};

/// Workflow name used when none is supplied.
pub const DEFAULT_WORKFLOW_NAME: &str = "CI";

/// Runner image used when a job does not declare one.
pub const DEFAULT_RUNNER: &str = "ubuntu-latest";

/// Step label used when a step does not declare one.
pub const DEFAULT_STEP_NAME: &str = "Step";

/// Versioned reference of the checkout step injected for manually
/// authored jobs. Template jobs carry their own checkout step instead.
pub const CHECKOUT_ACTION: &str = "actions/checkout@v3";

/// Runner images offered by interactive frontends. Advisory only: the
/// model passes any `runs_on` string through verbatim.
pub const RUNNER_CHOICES: &[&str] = &["ubuntu-latest", "windows-latest", "macos-latest"];

/// A complete workflow document.
///
/// Job order is insertion order and is preserved through emission; the
/// model never reorders, sorts, or dedupes. Duplicate job ids are passed
/// through to the emitter as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    /// Document name (empty means "use the default at emission time")
    #[serde(default)]
    pub name: String,

    /// Jobs in insertion order
    #[serde(default)]
    pub jobs: Vec<Job>,

    /// Creation counter for synthetic job ids. Monotonic: ordinals are
    /// assigned at add time and never reused, even after removals.
    #[serde(skip)]
    next_ordinal: usize,
}

/// Stable handle to a job within one `Workflow`.
///
/// Wraps the job's creation ordinal, which is never reused, so a handle
/// left over from a removed job can never resolve to a newer job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobHandle(usize);

/// Stable handle to a step within one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepHandle(usize);

/// A named unit of execution bound to a runner image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Mapping key in the emitted document. May be empty: emission then
    /// falls back to the synthetic `job<ordinal>` form.
    #[serde(default)]
    pub id: String,

    /// Runner image identifier (e.g. `ubuntu-latest`). Not validated;
    /// any string is emitted verbatim.
    #[serde(default, rename = "runs-on")]
    pub runs_on: String,

    /// Steps in insertion order. May be empty; the `steps:` key is
    /// emitted regardless.
    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(skip)]
    ordinal: usize,

    #[serde(skip)]
    next_step_ordinal: usize,
}

/// One action within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable label (empty means "use the default at emission time")
    #[serde(default)]
    pub name: String,

    /// The action payload, exactly one of `uses:` or `run:`
    #[serde(flatten)]
    pub action: StepAction,

    #[serde(skip)]
    ordinal: usize,
}

/// The action payload of a step.
///
/// The variant is fixed at construction: a step with a reusable-action
/// reference is `Uses`, anything else is `Run`. The sum type makes it
/// impossible for a step to carry both payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepAction {
    /// Invoke a reusable action by versioned reference (e.g. `owner/repo@tag`)
    Uses { uses: String },
    /// Execute a shell command; an empty command is valid
    Run { run: String },
}

impl Step {
    /// Create a step that invokes a reusable action.
    pub fn uses(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: StepAction::Uses {
                uses: reference.into(),
            },
            ordinal: 0,
        }
    }

    /// Create a step that runs a shell command.
    pub fn run(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: StepAction::Run {
                run: command.into(),
            },
            ordinal: 0,
        }
    }

    /// Construction rule for loosely typed producers: a present reference
    /// makes the step a `Uses` action, otherwise it runs `command`
    /// (defaulting to the empty command).
    pub fn from_fields(
        name: impl Into<String>,
        reference: Option<String>,
        command: Option<String>,
    ) -> Self {
        match reference {
            Some(uses) => Self::uses(name, uses),
            None => Self::run(name, command.unwrap_or_default()),
        }
    }
}

impl Job {
    /// Create a job with no steps.
    pub fn new(id: impl Into<String>, runs_on: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            runs_on: runs_on.into(),
            steps: Vec::new(),
            ordinal: 0,
            next_step_ordinal: 0,
        }
    }

    /// Replace the step list (builder style).
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self.renumber_steps();
        self
    }

    /// Creation ordinal assigned by the owning workflow.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn renumber_steps(&mut self) {
        for step in &mut self.steps {
            step.ordinal = self.next_step_ordinal;
            self.next_step_ordinal += 1;
        }
    }

    fn push_step(&mut self, mut step: Step) -> StepHandle {
        step.ordinal = self.next_step_ordinal;
        self.next_step_ordinal += 1;
        let handle = StepHandle(step.ordinal);
        self.steps.push(step);
        handle
    }
}

impl Workflow {
    /// Create an empty workflow. The name stays empty and defaults to
    /// `CI` at emission time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty workflow with the given document name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a job and return a stable handle for later removal.
    /// Never fails.
    pub fn add_job(&mut self, mut job: Job) -> JobHandle {
        job.ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        job.renumber_steps();
        let handle = JobHandle(job.ordinal);
        self.jobs.push(job);
        handle
    }

    /// The manual-entry producer path: append a job with an implicit
    /// leading checkout step ahead of any user-authored steps. Template
    /// instantiation does not go through here; templates are authored to
    /// carry their own checkout step.
    pub fn add_manual_job(
        &mut self,
        id: impl Into<String>,
        runs_on: impl Into<String>,
        steps: Vec<Step>,
    ) -> JobHandle {
        let mut all_steps = vec![Step::uses("Checkout", CHECKOUT_ACTION)];
        all_steps.extend(steps);
        self.add_job(Job::new(id, runs_on).with_steps(all_steps))
    }

    /// Remove the referenced job. Idempotent: a handle that no longer
    /// resolves is a no-op, not an error.
    pub fn remove_job(&mut self, handle: JobHandle) {
        self.jobs.retain(|job| job.ordinal != handle.0);
    }

    /// Look up a job by handle.
    pub fn job(&self, handle: JobHandle) -> Option<&Job> {
        self.jobs.iter().find(|job| job.ordinal == handle.0)
    }

    fn job_mut(&mut self, handle: JobHandle) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.ordinal == handle.0)
    }

    /// Append a step to the referenced job. Returns `None` (and does
    /// nothing) when the job handle no longer resolves.
    pub fn add_step(&mut self, job: JobHandle, step: Step) -> Option<StepHandle> {
        self.job_mut(job).map(|j| j.push_step(step))
    }

    /// Remove a step from the referenced job. Idempotent, like
    /// `remove_job`.
    pub fn remove_step(&mut self, job: JobHandle, step: StepHandle) {
        if let Some(j) = self.job_mut(job) {
            j.steps.retain(|s| s.ordinal != step.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_job() {
        let mut workflow = Workflow::new();
        let build = workflow.add_job(Job::new("build", DEFAULT_RUNNER));
        let test = workflow.add_job(Job::new("test", DEFAULT_RUNNER));

        assert_eq!(workflow.jobs.len(), 2);

        workflow.remove_job(build);
        assert_eq!(workflow.jobs.len(), 1);
        assert_eq!(workflow.jobs[0].id, "test");

        // Removal is idempotent
        workflow.remove_job(build);
        assert_eq!(workflow.jobs.len(), 1);
        assert!(workflow.job(test).is_some());
    }

    #[test]
    fn test_ordinals_never_reused_after_removal() {
        let mut workflow = Workflow::new();
        let first = workflow.add_job(Job::new("", DEFAULT_RUNNER));
        workflow.add_job(Job::new("", DEFAULT_RUNNER));
        workflow.remove_job(first);

        let third = workflow.add_job(Job::new("", DEFAULT_RUNNER));
        assert_eq!(workflow.job(third).unwrap().ordinal(), 2);
        assert_ne!(first, third);
    }

    #[test]
    fn test_manual_job_injects_checkout() {
        let mut workflow = Workflow::new();
        let handle =
            workflow.add_manual_job("build", "", vec![Step::run("Run tests", "npm test")]);

        let job = workflow.job(handle).unwrap();
        assert_eq!(job.steps.len(), 2);
        assert!(matches!(
            &job.steps[0].action,
            StepAction::Uses { uses } if uses == CHECKOUT_ACTION
        ));
        assert_eq!(job.steps[1].name, "Run tests");
    }

    #[test]
    fn test_step_handles_scoped_to_job() {
        let mut workflow = Workflow::new();
        let job = workflow.add_job(Job::new("build", DEFAULT_RUNNER));

        let first = workflow.add_step(job, Step::run("One", "true")).unwrap();
        workflow.add_step(job, Step::run("Two", "true")).unwrap();

        workflow.remove_step(job, first);
        let steps = &workflow.job(job).unwrap().steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "Two");

        // Dead job handle: add_step is a no-op
        workflow.remove_job(job);
        assert!(workflow.add_step(job, Step::run("Three", "true")).is_none());
    }

    #[test]
    fn test_default_runner_is_an_offered_choice() {
        assert!(RUNNER_CHOICES.contains(&DEFAULT_RUNNER));
    }

    #[test]
    fn test_from_fields_prefers_reference() {
        let step = Step::from_fields("s", Some("actions/cache@v3".to_string()), None);
        assert!(matches!(step.action, StepAction::Uses { .. }));

        let step = Step::from_fields("s", None, Some("make".to_string()));
        assert!(matches!(step.action, StepAction::Run { run } if run == "make"));

        let step = Step::from_fields("s", None, None);
        assert!(matches!(step.action, StepAction::Run { run } if run.is_empty()));
    }
}
