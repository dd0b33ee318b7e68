//! Stage 7: Write
//!
//! Renders the assembled [`Config`] as YAML and writes it to its target. The
//! document shape is the Atlantis repo config:
//!
//! ```yaml
//! version: 3
//! automerge: true
//! parallel_apply: true
//! parallel_plan: true
//! projects:
//! - name: app-prod
//!   workspace: prod
//!   workflow: terragrunt
//!   dir: app
//!   autoplan:
//!     enabled: true
//!     when_modified:
//!     - '**/*.tf'
//! ```

use std::fs;
use std::io::Write;

use log::info;

use super::Config;
use crate::config::OutputTarget;
use crate::error::Result;

/// Serialize the config to a YAML document.
pub fn render(config: &Config) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}

/// Executes the write stage.
pub fn execute(config: &Config, target: &OutputTarget) -> Result<()> {
    let document = render(config)?;
    match target {
        OutputTarget::File(path) => {
            fs::write(path, document.as_bytes())?;
            info!(
                "Wrote {} project(s) to {}",
                config.projects.len(),
                path.display()
            );
        }
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
