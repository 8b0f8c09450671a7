//! Competencies command for listing the registry.

use anyhow::{Context, Result};
use vtl_core::{CompetencyRegistry, TRASH_LABEL};

use crate::Config;

/// Renders registry entries as aligned `name  color` rows.
pub fn format_competencies(registry: &CompetencyRegistry) -> String {
    let width = registry
        .entries()
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec!["COMPETENCIES".to_string(), "────────────".to_string()];
    for (name, color) in registry.entries() {
        let pad = " ".repeat(width - name.chars().count());
        let marker = if name == TRASH_LABEL { "  (trash)" } else { "" };
        lines.push(format!("{name}{pad}  {color}{marker}"));
    }
    lines.join("\n")
}

/// Runs the competencies command.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let registry = config
        .registry()
        .context("invalid [competencies] configuration")?;

    if json {
        let output = serde_json::to_string_pretty(registry.entries())
            .context("failed to serialize competencies")?;
        println!("{output}");
    } else {
        println!("{}", format_competencies(&registry));
    }
    Ok(())
}
