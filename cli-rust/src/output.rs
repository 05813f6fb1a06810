//! Terminal rendering for command outcomes.

use crate::commands::Outcome;
use wallet_sdk::error_message;

/// Print an outcome and return the process exit code.
///
/// The payload goes to stdout so it can be piped; status lines go to stderr.
pub(crate) fn render(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Message(text) => {
            println!("{text}");
            0
        }
        Outcome::Response {
            label,
            response,
            note,
        } => {
            println!("{}", response.display_text());
            if response.ok {
                match note {
                    Some(note) => eprintln!("{label}: {note}"),
                    None => eprintln!("{label}: ok ({})", response.status_code),
                }
                0
            } else {
                eprintln!(
                    "{label} failed ({}): {}",
                    response.status_code,
                    error_message(response)
                );
                1
            }
        }
    }
}
