use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use actforge::config::Config;
use actforge::templates::TemplateCatalog;
use actforge::workflow::{self, emitter, StepAction, Workflow};

#[derive(Parser)]
#[command(name = "actforge")]
#[command(about = "Assemble GitHub Actions workflows and emit them as YAML", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workflow YAML file
    Generate {
        /// Path to a workflow definition YAML file (manual entry)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Workflow name (overrides the definition file)
        #[arg(short, long)]
        name: Option<String>,
        /// Template key to instantiate as a job (repeatable)
        #[arg(short, long = "template")]
        templates: Vec<String>,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Manage workflow templates
    Templates {
        #[command(subcommand)]
        action: TemplateActions,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TemplateActions {
    /// List available templates
    List {
        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show details of a specific template
    Show {
        /// Template key
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "actforge=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            file,
            name,
            templates,
            output,
            stdout,
        } => cmd_generate(file.as_deref(), name, &templates, output, stdout)?,
        Commands::Templates { action } => match action {
            TemplateActions::List { json } => cmd_templates_list(json)?,
            TemplateActions::Show { key } => cmd_templates_show(&key)?,
        },
        Commands::Completions { shell } => cmd_completions(shell)?,
    }

    Ok(())
}

fn catalog_from_config(config: &Config) -> TemplateCatalog {
    match &config.templates.dir {
        Some(dir) => TemplateCatalog::with_custom_dir(dir).unwrap_or_else(|e| {
            tracing::warn!("Failed to load custom templates: {}", e);
            TemplateCatalog::new()
        }),
        None => TemplateCatalog::new(),
    }
}

fn cmd_generate(
    file: Option<&Path>,
    name: Option<String>,
    templates: &[String],
    output: Option<PathBuf>,
    stdout: bool,
) -> anyhow::Result<()> {
    let config = Config::load();
    let catalog = catalog_from_config(&config);

    let mut workflow = match file {
        Some(path) => workflow::load_definition(path)?,
        None => Workflow::new(),
    };
    if let Some(name) = name {
        workflow.name = name;
    }

    for key in templates {
        match catalog.get(key) {
            Some(template) => {
                workflow.add_job(template.instantiate());
            }
            None => tracing::warn!("Unknown template key, skipping: {}", key),
        }
    }

    warn_duplicate_ids(&workflow);

    let yaml = emitter::serialize(&workflow);

    if stdout {
        print!("{}", yaml);
        return Ok(());
    }

    let path = output.unwrap_or(config.output.file);
    std::fs::write(&path, &yaml)?;
    tracing::info!(
        "Wrote {} job(s) to {}",
        workflow.jobs.len(),
        path.display()
    );
    println!("Workflow written to {}", path.display());

    Ok(())
}

fn warn_duplicate_ids(workflow: &Workflow) {
    // Duplicate mapping keys are emitted as-is; the document will be
    // malformed for the consuming CI platform
    let mut seen = HashSet::new();
    for job in &workflow.jobs {
        if !job.id.is_empty() && !seen.insert(job.id.as_str()) {
            tracing::warn!("Duplicate job id `{}` in output", job.id);
        }
    }
}

fn cmd_templates_list(json: bool) -> anyhow::Result<()> {
    let config = Config::load();
    let catalog = catalog_from_config(&config);
    let templates = catalog.list();

    if json {
        let entries: Vec<_> = templates
            .iter()
            .map(|t| {
                serde_json::json!({
                    "key": t.key,
                    "display_name": t.display_name,
                    "runs_on": t.runs_on,
                    "steps": t.steps.len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:<15} {:<25} RUNS-ON", "KEY", "NAME");
    println!("{}", "-".repeat(55));

    for template in templates {
        println!(
            "{:<15} {:<25} {}",
            template.key, template.display_name, template.runs_on
        );
    }

    println!();
    println!("Use a template with: actforge generate --template <key>");

    Ok(())
}

fn cmd_templates_show(key: &str) -> anyhow::Result<()> {
    let config = Config::load();
    let catalog = catalog_from_config(&config);
    let template = catalog
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Template not found: {}", key))?;

    println!("Template: {}", template.key);
    println!("Name: {}", template.display_name);
    println!("Runs on: {}", template.runs_on);
    println!();

    println!("Steps:");
    for step in &template.steps {
        match &step.action {
            StepAction::Uses { uses } => println!("  {:<25} uses  {}", step.name, uses),
            StepAction::Run { run } => println!("  {:<25} run   {}", step.name, run),
        }
    }

    Ok(())
}

fn cmd_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
