//! custom-objects CLI - Compile custom object segment filters to SQL
//!
//! Usage:
//!   custom-objects compile <filter.json> [--catalog <catalog.toml>] [--dialect <dialect>]
//!   custom-objects paths [--depth <n>]
//!   custom-objects check [--catalog <catalog.toml>]
//!
//! Examples:
//!   custom-objects compile filter.json --catalog catalog.toml --dialect postgres
//!   echo '{"field":"cmf_3","object":"custom_object","operator":"eq","filter":5}' \
//!     | custom-objects compile - --catalog catalog.toml --contact 42
//!   custom-objects paths --depth 3

use clap::{Parser, Subcommand, ValueEnum};
use custom_objects::compile::{compile_filter_json, CompileOptions};
use custom_objects::config::Settings;
use custom_objects::metadata::{Catalog, FieldTypeRegistry};
use custom_objects::query::{enumerate, AliasScope, DepthLimit};
use custom_objects::sql::Dialect;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "custom-objects")]
#[command(about = "Compile custom object segment filters to relationship-path SQL")]
#[command(version)]
struct Cli {
    /// Config file (defaults to CUSTOM_OBJECTS_CONFIG, ./custom-objects.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one segment filter to SQL
    Compile {
        /// Filter record as JSON, or `-` for stdin
        filter: PathBuf,

        /// Catalog of custom objects (overrides [catalog] path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// SQL dialect to generate (overrides [sql] dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Relationship depth limit (overrides the configured limit)
        #[arg(long)]
        depth: Option<u32>,

        /// Reuse the alias seed in every fragment
        #[arg(long)]
        shared_aliases: bool,

        /// Restrict the query to one contact
        #[arg(long)]
        contact: Option<i64>,

        /// Alias seed for tables and parameters
        #[arg(long, default_value = "filter_0")]
        alias: String,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// List the relationship paths followed up to a depth
    Paths {
        /// Depth limit (defaults to the configured limit)
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Validate the configuration and catalog
    Check {
        /// Catalog of custom objects (overrides [catalog] path)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Mysql,
    Postgres,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL with comments and parameters
    Verbose,
    /// Output SQL and parameters as JSON
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            filter,
            catalog,
            dialect,
            depth,
            shared_aliases,
            contact,
            alias,
            output,
        } => {
            let mut options = match CompileOptions::from_settings(&settings) {
                Ok(o) => o.with_alias_seed(&alias),
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(d) = dialect {
                options = options.with_dialect(d.into());
            }
            if let Some(d) = depth {
                match parse_depth(d) {
                    Ok(limit) => options = options.with_depth(limit),
                    Err(code) => return code,
                }
            }
            if shared_aliases {
                options = options.with_alias_scope(AliasScope::Shared);
            }
            if let Some(id) = contact {
                options = options.for_contact(id);
            }
            cmd_compile(&settings, &filter, catalog, &options, output)
        }
        Commands::Paths { depth } => cmd_paths(&settings, depth),
        Commands::Check { catalog } => cmd_check(&settings, catalog),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, custom_objects::config::SettingsError> {
    match path {
        Some(p) => Settings::from_file(p),
        None => Settings::load(),
    }
}

fn parse_depth(depth: u32) -> Result<DepthLimit, ExitCode> {
    DepthLimit::new(depth).ok_or_else(|| {
        eprintln!("Depth must be between 1 and {}", DepthLimit::MAX);
        ExitCode::FAILURE
    })
}

fn load_catalog(settings: &Settings, catalog: Option<PathBuf>) -> Result<Catalog, ExitCode> {
    let path = match catalog {
        Some(p) => p,
        None => match settings.catalog.resolved_path() {
            Ok(Some(p)) => p,
            Ok(None) => {
                eprintln!("No catalog given: pass --catalog or set [catalog] path");
                return Err(ExitCode::FAILURE);
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return Err(ExitCode::FAILURE);
            }
        },
    };

    let registry = FieldTypeRegistry::with_prefix(&settings.custom_objects.table_prefix);
    Catalog::from_file(&path, registry).map_err(|e| {
        eprintln!("Error loading catalog '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn read_filter(filter: &Path) -> io::Result<String> {
    if filter == Path::new("-") {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        fs::read_to_string(filter)
    }
}

fn cmd_compile(
    settings: &Settings,
    filter: &Path,
    catalog: Option<PathBuf>,
    options: &CompileOptions,
    output: OutputFormat,
) -> ExitCode {
    let catalog = match load_catalog(settings, catalog) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let json = match read_filter(filter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading filter '{}': {}", filter.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match compile_filter_json(&json, &catalog, options) {
        Ok(compiled) => {
            match output {
                OutputFormat::Sql => {
                    println!("{}", compiled.sql);
                }
                OutputFormat::Verbose => {
                    println!("-- Dialect: {}", compiled.dialect);
                    println!("-- Fragments: {}", compiled.fragments);
                    if compiled.negated {
                        println!("-- Negated: splice with NOT IN");
                    }
                    for (name, value) in &compiled.params {
                        println!("-- :{} = {}", name, value);
                    }
                    println!();
                    println!("{}", compiled.sql);
                }
                OutputFormat::Json => {
                    let doc = serde_json::json!({
                        "sql": compiled.sql,
                        "params": compiled.params,
                        "fragments": compiled.fragments,
                        "negated": compiled.negated,
                    });
                    println!("{}", doc);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_paths(settings: &Settings, depth: Option<u32>) -> ExitCode {
    let limit = match depth {
        Some(d) => match parse_depth(d) {
            Ok(limit) => limit,
            Err(code) => return code,
        },
        None => match settings.custom_objects.depth_limit() {
            Ok(limit) => limit,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let paths = enumerate(limit);
    println!("Depth limit {}: {} paths", limit, paths.len());
    for (i, path) in paths.iter().enumerate() {
        println!("  {:>3}. {}", i, path);
    }
    ExitCode::SUCCESS
}

fn cmd_check(settings: &Settings, catalog: Option<PathBuf>) -> ExitCode {
    let catalog = match load_catalog(settings, catalog) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut ok = true;
    for field in catalog.fields() {
        if let Err(e) = catalog.registry().value_table(&field.type_key) {
            eprintln!("  field {} ({}): {}", field.id, field.alias, e);
            ok = false;
        }
    }
    if !ok {
        return ExitCode::FAILURE;
    }

    println!(
        "OK: {} objects, {} fields",
        catalog.objects().count(),
        catalog.fields().count()
    );
    ExitCode::SUCCESS
}
