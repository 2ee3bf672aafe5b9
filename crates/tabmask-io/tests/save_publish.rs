use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use tempfile::TempDir;

use tabmask_core::{Column, Dataset, Value};
use tabmask_io::{
    AcceptSuggested, CancelPrompt, Delimiter, FixedDestination, OutputFormat, Publisher,
    RetryPolicy, SaveError, SaveOutcome, Saver, load_path, record_save_outcome,
};
use tabmask_mask::OperationLog;

fn sample() -> Dataset {
    Dataset::new(vec![
        Column::new(
            "Name",
            vec![Value::from("Ana Souza"), Value::Null, Value::from("Rui Lima")],
        ),
        Column::new(
            "Joined",
            vec![
                Value::Date(chrono::NaiveDate::from_ymd_opt(2021, 5, 4).expect("date")),
                Value::Date(chrono::NaiveDate::from_ymd_opt(2022, 1, 31).expect("date")),
                Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 12, 1).expect("date")),
            ],
        ),
        Column::new(
            "Score",
            vec![Value::Int(7), Value::Float(3.25), Value::Bool(true)],
        ),
    ])
    .expect("dataset")
}

fn no_delay() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
    }
}

fn entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").path())
        .collect::<Vec<_>>();
    paths.sort();
    paths
}

struct DeniedPublisher {
    calls: Rc<Cell<u32>>,
    kind: io::ErrorKind,
}

impl Publisher for DeniedPublisher {
    fn publish(&self, staged: &Path, _destination: &Path) -> io::Result<()> {
        assert!(staged.exists(), "staged file must exist while publishing");
        self.calls.set(self.calls.get() + 1);
        Err(io::Error::new(self.kind, "locked"))
    }
}

#[test]
fn saves_xlsx_next_to_source_by_default() {
    let workspace = TempDir::new().expect("tempdir");
    let staging = TempDir::new().expect("tempdir");
    let source = workspace.path().join("people.csv");
    let mut log = OperationLog::new();

    let mut saver = Saver::new(OutputFormat::Xlsx, AcceptSuggested)
        .with_retry(no_delay())
        .with_staging_dir(staging.path());
    let saved = saver
        .save(&sample(), &source, &mut log)
        .expect("saved");

    assert_eq!(saved, workspace.path().join("people_masked.xlsx"));
    assert_eq!(entries(workspace.path()), vec![saved.clone()]);
    assert!(entries(staging.path()).is_empty());

    let reloaded = load_path(&saved, Delimiter::Comma).expect("reload");
    assert_eq!(reloaded, sample());
    assert_eq!(log.len(), 1);
}

#[test]
fn saves_csv_with_chosen_delimiter() {
    let workspace = TempDir::new().expect("tempdir");
    let destination = workspace.path().join("nested").join("out.csv");
    let mut saver = Saver::new(OutputFormat::Csv, FixedDestination(destination.clone()))
        .with_writer(tabmask_io::CsvWriter::new(Delimiter::Pipe))
        .with_retry(no_delay());

    let outcome = saver
        .try_save(&sample(), Path::new("people.csv"))
        .expect("saved");
    assert_eq!(outcome, SaveOutcome::Saved(destination.clone()));

    let text = std::fs::read_to_string(&destination).expect("read");
    assert!(text.starts_with("Name|Joined|Score\n"));
    assert!(text.contains("Ana Souza|2021-05-04|7\n"));
    assert_eq!(
        entries(&workspace.path().join("nested")),
        vec![destination]
    );
}

#[test]
fn cancel_returns_none_and_removes_temp_file() {
    let staging = TempDir::new().expect("tempdir");
    let mut log = OperationLog::new();
    let mut saver = Saver::new(OutputFormat::Xlsx, CancelPrompt).with_staging_dir(staging.path());

    let saved = saver.save(&sample(), Path::new("people.csv"), &mut log);

    assert!(saved.is_none());
    assert!(entries(staging.path()).is_empty());
    assert_eq!(log.entries(), ["Save operation canceled.".to_string()]);
}

#[test]
fn permission_errors_are_retried_three_times() {
    let staging = TempDir::new().expect("tempdir");
    let calls = Rc::new(Cell::new(0));
    let mut log = OperationLog::new();
    let mut saver = Saver::new(OutputFormat::Csv, AcceptSuggested)
        .with_publisher(DeniedPublisher {
            calls: Rc::clone(&calls),
            kind: io::ErrorKind::PermissionDenied,
        })
        .with_retry(no_delay())
        .with_staging_dir(staging.path());

    let saved = saver.save(&sample(), Path::new("people.csv"), &mut log);

    assert!(saved.is_none());
    assert_eq!(calls.get(), 3);
    assert!(log.contains("Failed to save after multiple attempts."));
    assert!(entries(staging.path()).is_empty());
}

#[test]
fn other_errors_fail_without_retry() {
    let calls = Rc::new(Cell::new(0));
    let mut saver = Saver::new(OutputFormat::Csv, AcceptSuggested)
        .with_publisher(DeniedPublisher {
            calls: Rc::clone(&calls),
            kind: io::ErrorKind::StorageFull,
        })
        .with_retry(no_delay());

    let err = saver
        .try_save(&sample(), Path::new("people.csv"))
        .expect_err("write failure");

    assert_eq!(calls.get(), 1);
    assert!(matches!(err, SaveError::WriteFailure { .. }));
}

#[test]
fn failed_publish_leaves_no_partial_file() {
    let workspace = TempDir::new().expect("tempdir");
    let destination = workspace.path().join("taken");
    std::fs::create_dir(&destination).expect("mkdir");
    std::fs::write(destination.join("keep.txt"), "x").expect("write");

    let mut saver = Saver::new(OutputFormat::Csv, FixedDestination(destination.clone()))
        .with_retry(no_delay());
    let result = saver.try_save(&sample(), Path::new("people.csv"));

    assert!(result.is_err());
    assert_eq!(entries(workspace.path()), vec![destination]);
}

#[test]
fn existing_destination_is_replaced() {
    let workspace = TempDir::new().expect("tempdir");
    let destination = workspace.path().join("out.csv");
    std::fs::write(&destination, "stale").expect("write");

    let mut saver = Saver::new(OutputFormat::Csv, FixedDestination(destination.clone()))
        .with_retry(no_delay());
    saver
        .try_save(&sample(), Path::new("people.csv"))
        .expect("saved");

    let text = std::fs::read_to_string(&destination).expect("read");
    assert!(text.starts_with("Name,Joined,Score\n"));
}

#[test]
fn write_failure_is_logged_with_its_cause() {
    let mut log = OperationLog::new();
    let result = Err(SaveError::WriteFailure {
        path: PathBuf::from("out/people_masked.csv"),
        source: io::Error::new(io::ErrorKind::StorageFull, "disk full"),
    });

    record_save_outcome(&result, &mut log);

    assert_eq!(
        log.entries(),
        ["Failed to save masked data: failed to write 'out/people_masked.csv': disk full"
            .to_string()]
    );
}
