//! Stage 6: Assembly
//!
//! Combines the repo-wide settings with the filtered projects into the final
//! [`Config`]. The boolean settings are parsed strictly here; a bad value
//! aborts assembly rather than falling back to a default.

use super::{Autoplan, Config, Project, CONFIG_VERSION};
use crate::config::{parse_bool, GlobalSettings};
use crate::error::Result;

/// Executes assembly.
///
/// Every project gets autoplan enabled with the shared when-modified list.
pub fn execute(global: &GlobalSettings, projects: Vec<Project>) -> Result<Config> {
    let automerge = parse_bool("automerge", &global.automerge)?;
    let parallel_apply = parse_bool("parallel-apply", &global.parallel_apply)?;
    let parallel_plan = parse_bool("parallel-plan", &global.parallel_plan)?;

    let projects = projects
        .into_iter()
        .map(|project| Project {
            autoplan: Autoplan {
                enabled: true,
                when_modified: global.when_modified.clone(),
            },
            ..project
        })
        .collect();

    Ok(Config {
        version: CONFIG_VERSION,
        automerge,
        parallel_apply,
        parallel_plan,
        projects,
    })
}
