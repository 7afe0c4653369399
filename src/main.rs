//! sdt-integrate CLI: facility records into a validated knowledge graph.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use sdt_integrate::config::{DEFAULT_CONFIG_FILE, PipelineConfig};
use sdt_integrate::conformance::InferenceMode;
use sdt_integrate::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "sdt-integrate",
    version,
    about = "Map facility records to RDF, validate with SHACL, report integration metrics"
)]
struct Cli {
    /// Pipeline configuration (TOML). Defaults to ./sdt.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pipeline name recorded in the run provenance.
    #[arg(long, global = true, env = "SDT_PIPELINE")]
    pipeline: Option<String>,

    /// Abort on the first malformed record instead of rejecting it.
    #[arg(long, global = true)]
    strict: bool,

    /// Entailment applied before validation (none or rdfs).
    #[arg(long, global = true)]
    inference: Option<InferenceMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a configuration file with every default spelled out.
    InitConfig {
        /// Where to write it.
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Map the input table into the Turtle data graph.
    Etl,

    /// Validate the data graph and write the violation report.
    Validate,

    /// Aggregate the integration summary from the files on disk.
    Summarize,

    /// Run etl, validate and summarize, then write the run manifest.
    Run,
}

impl Cli {
    /// Pipeline from the discovered config with command-line overrides applied.
    fn pipeline(&self) -> Result<Pipeline> {
        let mut config = PipelineConfig::discover(self.config.as_deref())?;
        if let Some(name) = &self.pipeline {
            config.pipeline_name = name.clone();
        }
        if self.strict {
            config.strict = true;
        }
        if let Some(mode) = self.inference {
            config.validation.inference = mode;
        }
        Ok(Pipeline::new(config))
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                miette::bail!(
                    help = "Pass --force to overwrite it.",
                    "{} already exists",
                    path.display()
                );
            }
            PipelineConfig::default().save(path)?;
            println!("Wrote default configuration to {}", path.display());
        }

        Commands::Etl => {
            let etl = cli.pipeline()?.etl()?;
            println!(
                "Mapped {} row(s) ({} rejected) into {} triples: {}",
                etl.rows_read,
                etl.rejected,
                etl.triples,
                etl.graph.display()
            );
            if !etl.coercion_warnings.is_empty() {
                println!(
                    "{} value(s) were not numeric and were kept as text",
                    etl.coercion_warnings.len()
                );
            }
        }

        Commands::Validate => match cli.pipeline()?.validate()? {
            Some(validation) => {
                print!("{}", validation.report_text);
                println!(
                    "Instance correctness: {:.2}% ({} subjects, {} violations)",
                    validation.instance_correctness(),
                    validation.subjects,
                    validation.violations.len()
                );
                println!("Report: {}", validation.report.display());
            }
            None => println!("Validation skipped: data graph or shape schema missing"),
        },

        Commands::Summarize => {
            let summary = cli.pipeline()?.summarize()?;
            print!("{}", summary.render());
        }

        Commands::Run => {
            let pipeline = cli.pipeline()?;
            let run = pipeline.run()?;
            print!("{}", run.summary.render());
            println!("Manifest: {}", pipeline.config().outputs.manifest.display());
        }
    }

    Ok(())
}
