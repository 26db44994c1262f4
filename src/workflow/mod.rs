//! Workflow definition, assembly, and YAML emission.
//!
//! A workflow document consists of:
//! - Name: The document title, defaulting to `CI`
//! - Jobs: Ordered units of execution, each bound to a runner image
//! - Steps: Ordered actions within a job (reusable action or shell command)

pub mod emitter;
mod parser;
mod types;

pub use parser::{load_definition, parse_definition};
pub use types::*;
