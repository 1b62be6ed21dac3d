// crates/component-acceptance-providers/src/terraform.rs
// ============================================================================
// Module: Terraform Output Parsing
// Description: Parsers for apply/plan summaries and `output -json` documents.
// Purpose: Turn engine text into typed summaries and output sets.
// Dependencies: component-acceptance-core, serde_json
// ============================================================================

//! ## Overview
//! The engine reports resource counts in human-readable summary lines:
//! `Apply complete! Resources: 1 added, 0 changed, 0 destroyed.` and
//! `Plan: 1 to add, 0 to change, 0 to destroy.`. Newer releases may prefix an
//! import count, and terminals may inject ANSI colour codes; both are
//! tolerated. Output documents may be preceded by wrapper log lines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use component_acceptance_core::ApplySummary;
use component_acceptance_core::DriverError;
use component_acceptance_core::OutputSet;
use component_acceptance_core::PlanSummary;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Marker preceding apply counts.
const APPLY_MARKER: &str = "Apply complete! Resources:";
/// Marker preceding plan counts.
const PLAN_MARKER: &str = "Plan:";
/// Engine line printed when nothing needs to change.
const NO_CHANGES_MARKER: &str = "No changes.";

// ============================================================================
// SECTION: Summaries
// ============================================================================

/// Parses the apply summary from engine output.
///
/// # Errors
///
/// Returns [`DriverError::Output`] when neither a summary nor a no-changes
/// line is present.
pub fn parse_apply_summary(text: &str) -> Result<ApplySummary, DriverError> {
    let clean = strip_ansi(text);
    if let Some(counts) = find_counts(&clean, APPLY_MARKER) {
        return Ok(ApplySummary {
            added: count_for(&counts, "added"),
            changed: count_for(&counts, "changed"),
            destroyed: count_for(&counts, "destroyed"),
        });
    }
    if clean.contains(NO_CHANGES_MARKER) {
        return Ok(ApplySummary::default());
    }
    Err(DriverError::Output("apply summary not found in engine output".to_string()))
}

/// Parses the plan summary from engine output, if one was printed.
#[must_use]
pub fn parse_plan_summary(text: &str) -> Option<PlanSummary> {
    let clean = strip_ansi(text);
    let counts = find_counts(&clean, PLAN_MARKER)?;
    Some(PlanSummary {
        add: count_for(&counts, "add"),
        change: count_for(&counts, "change"),
        destroy: count_for(&counts, "destroy"),
    })
}

/// Finds the last line starting with `marker` and parses its counts.
fn find_counts(text: &str, marker: &str) -> Option<Vec<(u32, String)>> {
    text.lines()
        .rev()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(marker))
        .map(parse_counts)
}

/// Parses `N word, N [to] word.` into `(N, word)` pairs.
fn parse_counts(rest: &str) -> Vec<(u32, String)> {
    rest.trim_end_matches('.')
        .split(',')
        .filter_map(|part| {
            let mut words = part.split_whitespace();
            let count = words.next()?.parse::<u32>().ok()?;
            let label = words.next_back()?.trim_end_matches('.').to_string();
            Some((count, label))
        })
        .collect()
}

/// Returns the count recorded for `label`, or zero.
fn count_for(counts: &[(u32, String)], label: &str) -> u32 {
    counts.iter().find(|(_, name)| name == label).map_or(0, |(count, _)| *count)
}

/// Removes ANSI escape sequences: CSI (`ESC [ ... final`), OSC
/// (`ESC ] ... BEL`), character-set designators (`ESC ( B`), and other
/// two-character escapes.
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for next in chars.by_ref() {
                    if ('\u{40}' ..= '\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
            Some(']') => {
                while let Some(next) = chars.next() {
                    if next == '\u{7}' {
                        break;
                    }
                    if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some(' ' ..= '/') => {
                while chars.next_if(|next| (' ' ..= '/').contains(next)).is_some() {}
                chars.next();
            }
            Some(_) | None => {}
        }
    }
    out
}

// ============================================================================
// SECTION: Outputs
// ============================================================================

/// Parses an `output -json` document, skipping leading non-JSON lines and
/// ignoring anything after the first complete value.
///
/// # Errors
///
/// Returns [`DriverError::Output`] when no JSON object is found or the
/// document does not have the expected shape.
pub fn parse_output_json(stdout: &str) -> Result<OutputSet, DriverError> {
    let start = json_start(stdout)
        .ok_or_else(|| DriverError::Output("no JSON object in output".to_string()))?;
    let document = serde_json::Deserializer::from_str(&stdout[start ..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| DriverError::Output("no JSON object in output".to_string()))?
        .map_err(|err| DriverError::Output(format!("invalid output JSON: {err}")))?;
    OutputSet::from_terraform_json(&document).map_err(|err| DriverError::Output(err.to_string()))
}

/// Returns the byte offset of the first line that opens a JSON object.
fn json_start(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('{') {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

// ============================================================================
// SECTION: Variables
// ============================================================================

/// Renders a `-var` assignment: strings verbatim, other values as compact JSON.
#[must_use]
pub fn format_var(name: &str, value: &Value) -> String {
    match value {
        Value::String(text) => format!("{name}={text}"),
        other => format!("{name}={other}"),
    }
}
