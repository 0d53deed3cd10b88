//! Completed-task extraction from summary prose.
//!
//! Summaries are AI-generated free text, so extraction is deliberately
//! conservative: text is split into clauses, and only a clause with a
//! completion verb followed by a short phrase counts. Dashboard consumers
//! get this from the store response instead of re-implementing their own
//! string matching.

use std::sync::OnceLock;

use regex::Regex;

static TASK_PATTERN: OnceLock<Regex> = OnceLock::new();

fn task_pattern() -> &'static Regex {
    TASK_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:completed|finished|fixed|shipped|merged|resolved|wrapped up)\s+(?:the\s+|a\s+|an\s+)?(.{3,80})",
        )
        .expect("task pattern is valid")
    })
}

/// Extract completed-task phrases mentioned in a summary.
///
/// Returns each matched phrase once, in order of first appearance, trimmed
/// of trailing punctuation. An empty result means no confident match, not
/// an error.
pub fn extract_completed_tasks(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tasks = Vec::new();

    let clauses = text
        .split(['.', ',', ';', '!', '?', '\n'])
        .flat_map(|clause| clause.split(" and "));

    for clause in clauses {
        let Some(capture) = task_pattern().captures(clause) else {
            continue;
        };
        let phrase = capture[1].trim();
        if phrase.is_empty() {
            continue;
        }
        let key = phrase.to_lowercase();
        if seen.insert(key) {
            tasks.push(phrase.to_string());
        }
    }

    tasks
}
