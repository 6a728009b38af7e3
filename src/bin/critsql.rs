//! critsql: literal SQL and Firebird types from the command line
//!
//! # Usage
//!
//! ```bash
//! # Substitute bound parameters into a command
//! critsql render "SELECT * FROM T WHERE id = @id AND id2 = @id2" -b id=5 -b id2:int32=7
//!
//! # Firebird column types
//! critsql ddl Name:varchar(40) Price:decimal(15,2)
//!
//! # Type reference
//! critsql types
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use critsql::config::{Config, OutputFormat};
use critsql::firebird::{FbParameterCollection, Firebird, VendorTypeGenerator};
use critsql::parser::{parse_binding, parse_field};
use critsql::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, overriding the config.
const LOG_ENV: &str = "CRITSQL_LOG";

#[derive(Parser)]
#[command(name = "critsql")]
#[command(version)]
#[command(about = "Criteria-to-SQL toolkit: literal rendering and Firebird types", long_about = None)]
#[command(after_help = "EXAMPLES:
    critsql render 'SELECT * FROM T WHERE Age >= @Age_1' -b Age_1:int32=18
    critsql params -b Name_1:string=Ada -b Active_2:bool=true --format json
    critsql ddl Id:int64 Name:varchar(40) Price:decimal(15,2)")]
struct Cli {
    /// Config file (default: $CRITSQL_CONFIG, ./critsql.toml, user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute bound parameters into command text
    Render {
        /// Command text with @name placeholders
        command: String,

        /// Parameter binding: name[:type]=value (repeatable)
        #[arg(short, long = "bind")]
        bind: Vec<String>,
    },
    /// Show the Firebird parameter collection for a set of bindings
    Params {
        /// Parameter binding: name[:type]=value (repeatable)
        #[arg(short, long = "bind")]
        bind: Vec<String>,
    },
    /// Firebird column types for field specs
    Ddl {
        /// Field spec: Name:type[(size[,precision])]
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Show the type reference table
    Types,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::discover()?,
    };
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    init_logging(&config, cli.verbose);

    let firebird = Firebird::with_defaults(config.types);
    match cli.command {
        Commands::Render { command, bind } => render(&command, &bind, cli.verbose),
        Commands::Params { bind } => show_params(&firebird, &bind, config.output.format),
        Commands::Ddl { fields } => show_ddl(&firebird, &fields, config.output.format),
        Commands::Types => {
            show_types(&firebird);
            Ok(())
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log.filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_bindings(specs: &[String]) -> Result<ParameterMap> {
    let mut params = ParameterMap::new();
    for spec in specs {
        let binding = parse_binding(spec).with_context(|| format!("binding '{}'", spec))?;
        if params.insert(binding.name.clone(), binding.bound).is_some() {
            anyhow::bail!("parameter '{}' bound twice", binding.name);
        }
    }
    Ok(params)
}

fn render(command: &str, bind: &[String], verbose: bool) -> Result<()> {
    let params = parse_bindings(bind)?;

    if verbose {
        println!("{} {}", "Input:".dimmed(), command.yellow());
        for (name, bound) in &params {
            println!(
                "  @{} = {} {}",
                name,
                bound.value.to_string().yellow(),
                format!("({})", bound.type_tag).dimmed()
            );
        }
        println!();
    }

    println!("{}", LiteralRenderer::new().render(command, &params));
    Ok(())
}

fn show_params(firebird: &Firebird, bind: &[String], format: OutputFormat) -> Result<()> {
    let params = parse_bindings(bind)?;
    let collection = firebird.parameters(&params);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
        OutputFormat::Sql => print_collection(&collection),
    }
    Ok(())
}

fn print_collection(collection: &FbParameterCollection) {
    if collection.is_empty() {
        println!("{}", "(no parameters)".dimmed());
        return;
    }

    let width = collection.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for p in collection.iter() {
        println!(
            "{:width$}  {:16} {}",
            p.name.cyan(),
            p.type_name.white().bold(),
            p.value.to_string().yellow(),
            width = width
        );
    }
}

fn show_ddl(firebird: &Firebird, specs: &[String], format: OutputFormat) -> Result<()> {
    let mut failures = 0usize;
    let mut columns = Vec::new();

    for spec in specs {
        let field = match parse_field(spec) {
            Ok(field) => field,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), spec, e);
                failures += 1;
                continue;
            }
        };
        // One unsupported field does not stop the others.
        match firebird.ddl_type(&field) {
            Ok(ty) => columns.push((field.name, ty)),
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), field.name, e);
                failures += 1;
            }
        }
    }

    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = columns
                .into_iter()
                .map(|(name, ty)| (name, serde_json::Value::String(ty)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Sql => {
            let lines: Vec<String> = columns
                .iter()
                .map(|(name, ty)| format!("    {} {}", name, ty))
                .collect();
            println!("{}", lines.join(",\n"));
        }
    }

    if failures > 0 {
        anyhow::bail!("{} field(s) could not be mapped", failures);
    }
    Ok(())
}

fn show_types(firebird: &Firebird) {
    println!("{}", "critsql Type Reference".cyan().bold());
    println!();
    println!(
        "{:10} {:16} {:16} {}",
        "Tag".white().bold(),
        "Literal".white().bold(),
        "Parameter".white().bold(),
        "DDL".white().bold()
    );
    println!("{}", "─".repeat(64).dimmed());

    for tag in TypeTag::ALL {
        let literal = tag
            .literal_category()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "(quoted text)".to_string());
        let ddl = match firebird.ddl_type(&FieldDescriptor::new("_", tag)) {
            Ok(ty) => ty.normal(),
            Err(_) => "unsupported".red(),
        };
        println!(
            "{:10} {:16} {:16} {}",
            tag.as_str().cyan().bold(),
            literal.yellow(),
            firebird.parameter_type(tag, None, None).white(),
            ddl
        );
    }
}
