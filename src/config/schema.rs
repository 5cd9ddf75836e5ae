use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ledger::IdentityPolicy;
use crate::scoring::{validate_events, EventConfig};
use crate::source::JsonFileSource;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    pub events: EventConfig,
    #[serde(default)]
    pub identity: IdentityPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: Option<String>,
    /// File or glob pattern, relative to the config file's directory
    pub path: String,
}

impl Config {
    /// Validate the whole configuration, collecting every error.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.sources.is_empty() {
            errors.push("sources: at least one source is required".to_string());
        }
        for (i, source) in self.sources.iter().enumerate() {
            if source.path.trim().is_empty() {
                errors.push(format!("sources[{}].path: must not be empty", i));
            } else if let Err(e) = glob::Pattern::new(&source.path) {
                errors.push(format!("sources[{}].path: invalid pattern '{}' - {}", i, source.path, e));
            }
        }

        if let Err(event_errors) = validate_events(&self.events) {
            errors.extend(event_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Expand every source pattern into concrete file sources.
    ///
    /// A named pattern matching several files names each one `name[i]`.
    /// A pattern matching nothing still yields one source for its literal path
    /// so that the miss surfaces as an unavailable source.
    pub fn resolve_sources(&self, base_dir: &Path) -> Result<Vec<JsonFileSource>> {
        let mut resolved = Vec::new();

        for source in &self.sources {
            let pattern = base_dir.join(&source.path);
            let pattern_str = pattern.to_string_lossy();
            let mut matches: Vec<PathBuf> = glob::glob(&pattern_str)
                .with_context(|| format!("Invalid source pattern '{}'", source.path))?
                .filter_map(|entry| entry.ok())
                .collect();
            matches.sort();

            if matches.is_empty() {
                matches.push(pattern.clone());
            }

            let many = matches.len() > 1;
            for (i, path) in matches.into_iter().enumerate() {
                let file_source = match (&source.name, many) {
                    (Some(name), false) => JsonFileSource::named(name.clone(), path),
                    (Some(name), true) => JsonFileSource::named(format!("{}[{}]", name, i), path),
                    (None, _) => JsonFileSource::new(path),
                };
                resolved.push(file_source);
            }
        }

        Ok(resolved)
    }
}
