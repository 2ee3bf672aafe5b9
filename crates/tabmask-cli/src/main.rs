mod logging;
mod profile;
mod prompt;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use tabmask_io::{
    AcceptSuggested, CsvWriter, Delimiter, DestinationPrompt, FixedDestination, LoadError,
    OutputFormat, SaveError, SaveOutcome, Saver, load_path, record_save_outcome,
};
use tabmask_mask::{GeneratorRegistry, MaskError, MaskingEngine, OnColumnError};

use logging::{LoggingError, init_logging};
use profile::{MaskProfile, ProfileError, ProfileOverrides, profile_schema};
use prompt::StdinPrompt;

#[derive(Debug, Error)]
enum CliError {
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("masking error: {0}")]
    Mask(#[from] MaskError),
    #[error("save error: {0}")]
    Save(#[from] SaveError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "tabmask", version, about = "Mask tabular data with synthetic values")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mask a CSV or spreadsheet file using a column profile.
    Mask(MaskArgs),
    /// List the field types a column can be masked with.
    FieldTypes,
    /// Print the JSON Schema of the profile file.
    ProfileSchema,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ErrorPolicy {
    Abort,
    Skip,
}

impl From<ErrorPolicy> for OnColumnError {
    fn from(value: ErrorPolicy) -> Self {
        match value {
            ErrorPolicy::Abort => OnColumnError::Abort,
            ErrorPolicy::Skip => OnColumnError::Skip,
        }
    }
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// Source file (.csv/.tsv/.txt or .xlsx/.xls/.xlsm/.ods).
    input: PathBuf,
    /// Masking profile (TOML, or JSON when the extension is .json).
    #[arg(long)]
    profile: PathBuf,
    /// Field delimiter for delimited input and CSV output: , ; | or tab.
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: Delimiter,
    /// Generate a fresh value per row instead of per distinct value.
    #[arg(long, default_value_t = false)]
    no_keep_mapping: bool,
    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// What to do when a column cannot be masked.
    #[arg(long, value_enum)]
    on_error: Option<ErrorPolicy>,
    /// Output format.
    #[arg(long, default_value = "xlsx", value_parser = parse_format)]
    format: OutputFormat,
    /// Destination path; skips the interactive prompt.
    #[arg(long, conflicts_with = "yes")]
    out: Option<PathBuf>,
    /// Accept the suggested destination without prompting.
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,
    /// Also write JSON logs to this file.
    #[arg(long)]
    log_json: Option<PathBuf>,
}

fn parse_delimiter(value: &str) -> Result<Delimiter, String> {
    value.parse().map_err(|err: LoadError| err.to_string())
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value
        .parse()
        .map_err(|err: tabmask_io::OutputError| err.to_string())
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Mask(args) => run_mask(args),
        Command::FieldTypes => {
            for id in GeneratorRegistry::new().generator_ids() {
                println!("{id}");
            }
            Ok(())
        }
        Command::ProfileSchema => {
            println!("{}", serde_json::to_string_pretty(&profile_schema())?);
            Ok(())
        }
    }
}

fn run_mask(args: MaskArgs) -> Result<(), CliError> {
    init_logging(args.log_json.as_deref())?;
    let timer = Instant::now();

    if !args.input.is_file() {
        return Err(CliError::InvalidConfig(format!(
            "input '{}' is not a file",
            args.input.display()
        )));
    }

    let profile = MaskProfile::load(&args.profile)?;
    let options = profile.options(ProfileOverrides {
        no_keep_mapping: args.no_keep_mapping,
        seed: args.seed,
        on_error: args.on_error.map(OnColumnError::from),
    });
    tracing::info!(
        event = "run_started",
        input = %args.input.display(),
        profile = %args.profile.display(),
        rules = profile.columns.len()
    );

    let dataset = load_path(&args.input, args.delimiter)?;
    let engine = MaskingEngine::new(options);
    let mut output = engine.mask(&dataset, &profile.columns)?;

    let prompt: Box<dyn DestinationPrompt> = match (args.out, args.yes) {
        (Some(path), _) => Box::new(FixedDestination(path)),
        (None, true) => Box::new(AcceptSuggested),
        (None, false) => Box::new(StdinPrompt),
    };
    let mut saver = Saver::new(args.format, prompt);
    if args.format == OutputFormat::Csv {
        saver = saver.with_writer(CsvWriter::new(args.delimiter));
    }
    let result = saver.try_save(&output.dataset, &args.input);
    record_save_outcome(&result, &mut output.log);

    for entry in output.log.iter() {
        println!("{entry}");
    }

    let saved = saved_path(result);
    tracing::info!(
        event = "run_finished",
        run_id = %output.report.run_id,
        saved = matches!(saved, Ok(Some(_))),
        failed_columns = output.failures.len(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    saved.map(|_| ())
}

/// A canceled save is still a successful run; a failed write is not.
fn saved_path(result: Result<SaveOutcome, SaveError>) -> Result<Option<PathBuf>, CliError> {
    match result? {
        SaveOutcome::Saved(path) => Ok(Some(path)),
        SaveOutcome::Cancelled => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_success_and_write_failure_is_an_error() {
        assert!(matches!(saved_path(Ok(SaveOutcome::Cancelled)), Ok(None)));
        assert_eq!(
            saved_path(Ok(SaveOutcome::Saved(PathBuf::from("out.xlsx")))).expect("saved"),
            Some(PathBuf::from("out.xlsx"))
        );

        let failure = SaveError::TransientWriteFailure {
            path: PathBuf::from("out.xlsx"),
            attempts: 3,
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(matches!(
            saved_path(Err(failure)),
            Err(CliError::Save(SaveError::TransientWriteFailure { attempts: 3, .. }))
        ));
    }
}
