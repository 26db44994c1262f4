//! actforge - GitHub Actions workflow generator
//!
//! actforge assembles a CI workflow definition in memory (jobs, steps,
//! runner images) and serializes it into YAML compatible with the GitHub
//! Actions workflow schema. Jobs come from two producers: manual entry
//! (a compact definition file) and the builtin template catalog, and the
//! two can be mixed into one document.
//!
//! ## Example
//!
//! ```
//! use actforge::templates::TemplateCatalog;
//! use actforge::workflow::{emitter, Workflow};
//!
//! let catalog = TemplateCatalog::new();
//! let mut workflow = Workflow::named("Build");
//!
//! if let Some(template) = catalog.get("node-ci") {
//!     workflow.add_job(template.instantiate());
//! }
//!
//! let yaml = emitter::serialize(&workflow);
//! assert!(yaml.starts_with("name: Build\n"));
//! ```

pub mod config;
pub mod error;
pub mod templates;
pub mod workflow;

pub use error::{Error, Result};
