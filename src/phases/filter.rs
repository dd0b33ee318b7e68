//! Stage 5: Project Filter
//!
//! Applies the include/exclude regular expressions to project names. A
//! pattern matches when it is found anywhere in the name. Both patterns are
//! compiled before any project is looked at, so an invalid pattern never
//! yields a partial list.

use log::info;
use regex::Regex;

use super::Project;
use crate::error::{Error, Result};

/// Compiled include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl ProjectFilter {
    /// Compile the patterns; an empty pattern is not applied.
    pub fn new(include: &str, exclude: &str) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn is_noop(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Whether a project with this name is kept.
    pub fn matches(&self, name: &str) -> bool {
        self.include.as_ref().is_none_or(|re| re.is_match(name))
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(name))
    }
}

fn compile(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|source| Error::Filter {
            pattern: pattern.to_string(),
            source,
        })
}

/// Executes the project filter, preserving input order.
pub fn execute(projects: Vec<Project>, include: &str, exclude: &str) -> Result<Vec<Project>> {
    let filter = ProjectFilter::new(include, exclude)?;
    if filter.is_noop() {
        return Ok(projects);
    }

    let total = projects.len();
    let kept: Vec<Project> = projects
        .into_iter()
        .filter(|project| filter.matches(&project.name))
        .collect();
    info!("Project filter kept {} of {} project(s)", kept.len(), total);
    Ok(kept)
}
