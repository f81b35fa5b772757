//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::rewrite::RewriteSummary;

/// Prints a run summary in plain text.
pub fn print_plain(summary: &RewriteSummary) {
    for failure in &summary.failures {
        eprintln!("goenum error: {}: {}", failure.path.display(), failure.error);
    }
    if !summary.is_success() {
        eprintln!(
            "{} of {} file(s) failed; no files were written.",
            summary.failures.len(),
            summary.files_scanned
        );
        return;
    }

    if summary.enums_found == 0 {
        println!("No enums found in {} file(s).", summary.files_scanned);
        return;
    }
    let verb = if summary.written { "updated" } else { "to update" };
    println!(
        "ENUMS: {} in {} file(s), {} file(s) {}",
        summary.enums_found, summary.files_scanned, summary.files_changed, verb
    );
    for outcome in summary.changed() {
        println!("- {} ({})", outcome.path.display(), outcome.enums.join(", "));
    }
}

/// Prints a run summary as JSON on stdout.
///
/// Falls back to a minimal object if serialization fails.
pub fn print_json(summary: &RewriteSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{}",
                json!({
                    "files_scanned": summary.files_scanned,
                    "files_changed": summary.files_changed,
                    "failures": summary.failures.len(),
                })
            );
        }
    }
}
