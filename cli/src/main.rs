use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use field_prompt_catalog::{Catalog, SessionConfig};
use field_prompt_core::{
    Autocomplete, Completion, FieldKind, FieldSchema, PromptError, aspect_autocomplete, resolve,
    validate,
};
use serde_json::Value;
use tracing::debug;

mod repl;
mod terminal;

use repl::Repl;
use terminal::RustylineTerminal;

const DEFAULT_CONFIG: &str = "field-prompt.yml";

#[derive(Debug, Parser)]
#[command(name = "field-prompt")]
#[command(about = "Schema-driven validation and interactive prompting of command arguments")]
struct Cli {
    /// Log at debug level (overridden by FIELD_PROMPT_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a JSON argument literal against a command's schema.
    Validate(ValidateArgs),
    /// Complete raw input against aspect names or a field's options.
    Complete(CompleteArgs),
    /// Resolve a command's arguments, prompting for anything missing or invalid.
    Prompt(PromptArgs),
    /// Interactive loop over every command of the loaded catalogs.
    Repl(ReplArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog file (YAML or JSON).
    #[arg(long)]
    catalog: PathBuf,
    /// Command whose schema applies.
    #[arg(long)]
    command: String,
    /// JSON argument literal.
    #[arg(long)]
    input: String,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Catalog file (YAML or JSON).
    #[arg(long)]
    catalog: PathBuf,
    /// Command owning the field; aspect names are completed when omitted.
    #[arg(long)]
    command: Option<String>,
    /// Object key of the field within the command's schema.
    #[arg(long, requires = "command")]
    field: Option<String>,
    /// Raw text to complete.
    #[arg(long, allow_hyphen_values = true)]
    input: String,
}

#[derive(Debug, Args)]
struct PromptArgs {
    /// Catalog file (YAML or JSON).
    #[arg(long)]
    catalog: PathBuf,
    /// Command whose arguments are resolved.
    #[arg(long)]
    command: String,
    /// Argument literal; prompts for every field when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    raw: Vec<String>,
}

#[derive(Debug, Args)]
struct ReplArgs {
    /// Session config YAML (default: ./field-prompt.yml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Additional catalog files, loaded after those of the config.
    #[arg(long)]
    catalog: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Complete(args) => run_complete(args),
        Command::Prompt(args) => run_prompt(args),
        Command::Repl(args) => run_repl(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("FIELD_PROMPT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog)?;
    let spec = catalog.require(&args.command).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&args.input)
        .map_err(|err| format!("could not parse input: {err}"))?;

    validate(&value, &spec.schema, catalog.aspects())
        .map_err(|err| format!("invalid {}: {err}", spec.schema.name))?;
    println!("valid");
    Ok(())
}

fn run_complete(args: CompleteArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog)?;
    let autocomplete = completion_source(&catalog, args.command.as_deref(), args.field.as_deref())?;

    match autocomplete.complete(&args.input) {
        Completion::Complete(completed) => println!("{completed}"),
        Completion::Ambiguous(candidates) => {
            for candidate in candidates {
                println!("{candidate}");
            }
        }
    }
    Ok(())
}

fn run_prompt(args: PromptArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog)?;
    let spec = catalog.require(&args.command).map_err(|e| e.to_string())?;
    let mut terminal = RustylineTerminal::new().map_err(|e| e.to_string())?;

    let raw = args.raw.join(" ");
    let value = resolve(&raw, &spec.schema, catalog.aspects(), &mut terminal)
        .map_err(|err| match err {
            PromptError::Cancelled => "cancelled".to_string(),
            other => other.to_string(),
        })?;

    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|err| format!("Failed to serialize arguments: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn run_repl(args: ReplArgs) -> Result<(), String> {
    let (config, base) = match &args.config {
        Some(path) => {
            let config = SessionConfig::load(path)
                .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
            (config, config_dir(path))
        }
        None => {
            let config = SessionConfig::load_or_default(DEFAULT_CONFIG)
                .map_err(|err| format!("Failed to load '{DEFAULT_CONFIG}': {err}"))?;
            (config, PathBuf::from("."))
        }
    };

    let catalog = args
        .catalog
        .iter()
        .fold(config.catalog_builder(&base), |builder, path| {
            builder.from_file(path)
        })
        .build()
        .map_err(|e| e.to_string())?;
    debug!(commands = catalog.len(), aspects = catalog.aspects().len(), "Starting REPL");

    let terminal = RustylineTerminal::new().map_err(|e| e.to_string())?;
    Repl::new(&catalog, terminal, config.prompt)
        .run()
        .map_err(|e| e.to_string())
}

fn load_catalog(path: &Path) -> Result<Catalog, String> {
    Catalog::from_file(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Picks what `complete` resolves against: aspect names, or the options of a
/// string / string-set field.
fn completion_source(
    catalog: &Catalog,
    command: Option<&str>,
    field: Option<&str>,
) -> Result<Autocomplete, String> {
    let Some(command) = command else {
        return Ok(aspect_autocomplete(catalog.aspects()));
    };
    let spec = catalog.require(command).map_err(|e| e.to_string())?;

    let schema = match field {
        Some(key) => object_field(&spec.schema, key)
            .ok_or_else(|| format!("command {command} has no field {key}"))?,
        None => &spec.schema,
    };

    let (options, delimiter) = match &schema.kind {
        FieldKind::String(o) => (&o.autocomplete, o.delimiter.as_deref()),
        FieldKind::StringSet(o) => (&o.autocomplete, o.delimiter.as_deref()),
        FieldKind::AspectMap(_) => return Ok(aspect_autocomplete(catalog.aspects())),
        other => {
            return Err(format!(
                "field {} is a {} field and has no completions",
                schema.name,
                other.type_name()
            ));
        }
    };
    Autocomplete::for_options(options, delimiter).map_err(|e| e.to_string())
}

fn object_field<'a>(schema: &'a FieldSchema, key: &str) -> Option<&'a FieldSchema> {
    match &schema.kind {
        FieldKind::Object(o) => o
            .fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.schema),
        _ => None,
    }
}
