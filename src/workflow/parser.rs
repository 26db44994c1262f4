//! Workflow definition file parser.
//!
//! The manual-entry producer reads a compact YAML definition:
//!
//! ```yaml
//! name: Build
//! jobs:
//!   - id: test
//!     runs-on: ubuntu-latest
//!     steps:
//!       - name: Run tests
//!         run: npm test
//! ```
//!
//! Parsed jobs are funneled through the manual-entry path on `Workflow`,
//! so every job picks up the implicit leading checkout step.

use std::path::Path;

use super::types::Workflow;
use crate::error::{Error, Result};

/// Parse a workflow definition from a YAML string.
pub fn parse_definition(yaml: &str) -> Result<Workflow> {
    if yaml.trim().is_empty() {
        return Err(Error::Parse("Empty workflow definition".to_string()));
    }

    let raw: Workflow = serde_yaml::from_str(yaml).map_err(|e| {
        let msg = e.to_string();
        if let Some(field) = extract_missing_field(&msg) {
            Error::Parse(format!("Missing required field: {}", field))
        } else {
            Error::Parse(format!("Invalid YAML: {}", msg))
        }
    })?;

    let mut workflow = Workflow::named(raw.name);
    for job in raw.jobs {
        workflow.add_manual_job(job.id, job.runs_on, job.steps);
    }
    Ok(workflow)
}

/// Parse a workflow definition from a file path.
pub fn load_definition(path: &Path) -> Result<Workflow> {
    let content = std::fs::read_to_string(path)?;
    parse_definition(&content)
}

fn extract_missing_field(error_message: &str) -> Option<&str> {
    let marker = "missing field `";
    let start = error_message.find(marker)? + marker.len();
    let rest = &error_message[start..];
    let end = rest.find('`')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{StepAction, CHECKOUT_ACTION};

    #[test]
    fn test_parse_simple_definition() {
        let yaml = r#"
name: Build

jobs:
  - id: test
    runs-on: ubuntu-latest
    steps:
      - name: Run tests
        run: npm test
"#;

        let workflow = parse_definition(yaml).unwrap();
        assert_eq!(workflow.name, "Build");
        assert_eq!(workflow.jobs.len(), 1);

        // Manual entry injects checkout ahead of the authored steps
        let job = &workflow.jobs[0];
        assert_eq!(job.steps.len(), 2);
        assert!(matches!(
            &job.steps[0].action,
            StepAction::Uses { uses } if uses == CHECKOUT_ACTION
        ));
        assert!(matches!(
            &job.steps[1].action,
            StepAction::Run { run } if run == "npm test"
        ));
    }

    #[test]
    fn test_parse_uses_step() {
        let yaml = r#"
jobs:
  - id: deploy
    steps:
      - name: Checkout
        uses: actions/checkout@v3
"#;

        let workflow = parse_definition(yaml).unwrap();
        assert!(matches!(
            &workflow.jobs[0].steps[1].action,
            StepAction::Uses { uses } if uses == "actions/checkout@v3"
        ));
    }

    #[test]
    fn test_step_with_both_keys_is_uses() {
        // Construction rule: a present reference wins over a command
        let yaml = r#"
jobs:
  - id: build
    steps:
      - name: Odd step
        uses: actions/cache@v3
        run: make
"#;

        let workflow = parse_definition(yaml).unwrap();
        assert!(matches!(
            &workflow.jobs[0].steps[1].action,
            StepAction::Uses { uses } if uses == "actions/cache@v3"
        ));
    }

    #[test]
    fn test_empty_definition_is_an_error() {
        assert!(parse_definition("").is_err());
        assert!(parse_definition("   \n  ").is_err());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let yaml = r#"
jobs:
  - steps: []
"#;

        let workflow = parse_definition(yaml).unwrap();
        assert_eq!(workflow.name, "");
        assert_eq!(workflow.jobs[0].id, "");
        assert_eq!(workflow.jobs[0].runs_on, "");
    }
}
