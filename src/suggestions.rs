//! # Error Suggestions
//!
//! This module turns library errors into user-facing messages with hints.
//! Errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atlantis_yaml_generator::suggestions;
//!
//! orchestrator::run(&settings, &tree, source.as_ref()).map_err(suggestions::explain)?;
//! ```

use crate::error::Error;

/// Convert a library error into an `anyhow::Error` carrying hints.
///
/// `Configuration` errors already carry their own hint and pass through
/// unchanged.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::Filter { pattern, source } => invalid_regex(&pattern, &source),
        Error::ExternalService { url, message } => external_service(&url, &message),
        Error::DeadlineExceeded { stage } => deadline_exceeded(&stage),
        Error::Discovery { path, message } => discovery_failed(&path, &message),
        other => anyhow::Error::new(other),
    }
}

/// Generate an error for an invalid include/exclude pattern.
///
/// Includes hints about common regex mistakes.
pub fn invalid_regex(pattern: &str, error: &regex::Error) -> anyhow::Error {
    let hint = match error {
        regex::Error::Syntax(msg) if msg.contains("unclosed") => {
            "hint: Check for unclosed brackets, parentheses, or braces"
        }
        regex::Error::Syntax(msg) if msg.contains("repetition") => {
            "hint: Repetition operators (+, *, ?) must follow a pattern"
        }
        _ => "hint: Patterns are matched anywhere in the project name; use ^ and $ to anchor",
    };

    anyhow::anyhow!(
        "Invalid project filter: {pattern}\n\
         error: {error}\n\n\
         {hint}\n\
         hint: Test patterns at https://regex101.com (select Rust flavor)"
    )
}

/// Generate an error for a failed change-set fetch.
///
/// The hint depends on the HTTP status reported in `message`.
pub fn external_service(url: &str, message: &str) -> anyhow::Error {
    let hint = if message.contains("401") || message.contains("403") {
        "hint: Check that the token in --gh-token or GH_TOKEN can read the repository"
    } else if message.contains("404") {
        "hint: Check --base-repo-owner, --base-repo-name and --pull-num"
    } else if message.contains("timed out") {
        "hint: Raise --timeout or check connectivity to --github-api-url"
    } else {
        "hint: Pass --changed-files to supply the change-set without calling GitHub"
    };

    anyhow::anyhow!(
        "Failed to fetch pull request files from {url}\n\
         error: {message}\n\n\
         {hint}"
    )
}

/// Generate an error for a run that outlived its deadline.
pub fn deadline_exceeded(stage: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Deadline exceeded during {stage}\n\n\
         hint: Raise --timeout or unset TIMEOUT to run without a deadline"
    )
}

/// Generate an error for a failed directory walk or colliding projects.
pub fn discovery_failed(path: &str, message: &str) -> anyhow::Error {
    let hint = if message.contains("generated more than once") {
        "hint: Rename one of the directories or exclude one with --excluded-projects"
    } else {
        "hint: Check --terraform-base-dir and the permissions of the directories below it"
    };

    anyhow::anyhow!(
        "Discovery failed at {path}: {message}\n\n\
         {hint}"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 3).
pub fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 3 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
