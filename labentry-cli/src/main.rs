use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use labentry::{
    DEFAULT_PREFIX, DataEntryApp, FormSchema, UiOptions,
    schema::{document_schema, resolve_schema},
};

const LOG_ENV: &str = "LABENTRY_LOG";
const DEFAULT_LOG_FILTER: &str = "labentry=info";

#[derive(Debug, Parser)]
#[command(
    name = "labentry",
    version,
    about = "Validated laboratory data entry, appended to daily CSV files"
)]
struct Cli {
    /// Form schema document (.json, .yaml or .toml); defaults to the built-in laboratory form
    #[arg(short = 's', long = "schema", value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Directory receiving the daily record files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// File name prefix of the daily record files
    #[arg(long = "prefix", value_name = "PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Title shown at the top of the form
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Write logs to this file (filter with LABENTRY_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Quit on the first Ctrl+Q even with unsaved edits
    #[arg(long = "no-confirm-exit")]
    no_confirm_exit: bool,

    /// Hide the key binding panel
    #[arg(long = "no-help")]
    no_help: bool,

    /// Validate the schema, print a summary and exit
    #[arg(long = "check")]
    check: bool,

    /// Print the JSON Schema of form schema documents and exit
    #[arg(long = "print-schema")]
    print_schema: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.print_schema {
        let schema = document_schema().map_err(|err| eyre!("{err:#}"))?;
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let schema = resolve_schema(cli.schema.as_deref()).map_err(|err| eyre!("{err:#}"))?;
    if cli.check {
        print_summary(&schema);
        return Ok(());
    }

    let options = UiOptions::default()
        .with_output_dir(&cli.output_dir)
        .with_file_prefix(cli.prefix.clone())
        .with_confirm_exit(!cli.no_confirm_exit)
        .with_help(!cli.no_help);
    let mut app = DataEntryApp::new(schema).with_options(options);
    if let Some(title) = cli.title.as_ref() {
        app = app.with_title(title.clone());
    }

    let session = app.run().map_err(|err| eyre!("{err:#}"))?;
    info!(records = session.records_saved, "exiting");
    eprintln!(
        "{} records saved to {}",
        session.records_saved,
        cli.output_dir.display()
    );
    Ok(())
}

/// Logs go to `--log-file` when given. Without one, stderr is used only when
/// `LABENTRY_LOG` is set, since the form owns the terminal.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = (cli.log_file.is_none() && std::env::var_os(LOG_ENV).is_some())
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .wrap_err("failed to install the log subscriber")?;
    Ok(())
}

fn print_summary(schema: &FormSchema) {
    let title = schema.title.as_deref().unwrap_or("untitled form");
    println!(
        "{title}: {} fields in {} sections",
        schema.fields.len(),
        schema.sections.len()
    );
    for section in &schema.sections {
        println!("  {}: {}", section.title, section.fields.join(", "));
    }
    println!("columns: {}", schema.field_names().join(","));
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn defaults_write_to_the_working_directory() {
        let cli = Cli::parse_from(["labentry"]);
        assert_eq!(cli.output_dir.to_str(), Some("."));
        assert_eq!(cli.prefix, labentry::DEFAULT_PREFIX);
        assert!(!cli.no_confirm_exit);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "labentry",
            "--schema",
            "form.yaml",
            "-o",
            "/data",
            "--prefix",
            "greenhouse",
            "--no-confirm-exit",
        ]);
        assert_eq!(cli.schema.as_deref().and_then(|p| p.to_str()), Some("form.yaml"));
        assert_eq!(cli.output_dir.to_str(), Some("/data"));
        assert_eq!(cli.prefix, "greenhouse");
        assert!(cli.no_confirm_exit);
    }
}
