// src/ui/widgets/mod.rs

pub mod disclaimer_popup; // Third-party sharing notice shown at startup.
pub mod footer;           // Key hints for the current state.
pub mod input;            // The command line.
pub mod log_view;         // Tail of the log file.
pub mod results;          // Verdict, counters and links for the last command.
pub mod summary;          // Risk level and detection gauge.
