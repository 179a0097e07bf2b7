//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use biblio_core::{BookEntry, Shelf, ShelfState};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print the shelves (optionally a single one)
    pub fn print_shelves(&self, state: &ShelfState, only: Option<Shelf>) {
        match self.format {
            OutputFormat::Human => {
                if state.is_empty() {
                    println!("No books shelved.");
                    return;
                }
                for shelf in Shelf::ALL {
                    if only.is_some_and(|s| s != shelf) {
                        continue;
                    }
                    let entries = state.shelf(shelf);
                    if entries.is_empty() && only.is_none() {
                        continue;
                    }
                    println!("── {} ({}) ──", shelf, entries.len());
                    for entry in entries {
                        self.print_entry_line(entry);
                    }
                    println!();
                }
            }
            OutputFormat::Json => match only {
                Some(shelf) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(state.shelf(shelf)).unwrap()
                    );
                }
                None => {
                    println!("{}", serde_json::to_string_pretty(state).unwrap());
                }
            },
            OutputFormat::Quiet => {
                for shelf in Shelf::ALL {
                    if only.is_some_and(|s| s != shelf) {
                        continue;
                    }
                    for entry in state.shelf(shelf) {
                        println!("{}", entry.external_id);
                    }
                }
            }
        }
    }

    /// Print one entry as a list line
    fn print_entry_line(&self, entry: &BookEntry) {
        let authors = if entry.authors.is_empty() {
            String::new()
        } else {
            format!(" - {}", entry.authors.join(", "))
        };
        let progress = match entry.progress {
            Some(p) => format!(" [{}%]", p),
            None => String::new(),
        };
        let synced = if entry.remote_id.is_some() { "" } else { " (local only)" };
        println!(
            "{} | {}{}{}{}",
            entry.external_id,
            truncate(&entry.title, 40),
            authors,
            progress,
            synced
        );
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
