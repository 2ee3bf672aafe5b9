use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tabmask_io::DestinationPrompt;

/// Asks on stdin where to save; an empty answer accepts the suggestion and
/// `q`, `n` or end of input cancels.
pub struct StdinPrompt;

impl DestinationPrompt for StdinPrompt {
    fn choose_destination(&mut self, suggested: &Path) -> Option<PathBuf> {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        let _ = write!(
            stderr,
            "Save masked data to [{}] (q to cancel): ",
            suggested.display()
        );
        let _ = stderr.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => parse_answer(&line, suggested),
        }
    }
}

fn parse_answer(line: &str, suggested: &Path) -> Option<PathBuf> {
    match line.trim() {
        "" => Some(suggested.to_path_buf()),
        "q" | "Q" | "n" | "N" => None,
        other => Some(PathBuf::from(other)),
    }
}
