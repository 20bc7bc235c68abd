//! Saved-hosts registry
//!
//! A name → {host, port, password} mapping persisted as an INI-shaped file
//! (`<PROG>.hosts`): one section per alias with keys `sHost`, `sPort`,
//! `sPass`. Nothing is cached; each invocation reads the file once and
//! writes at most once.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Target;
use crate::error::Result;
use crate::ini;

/// One saved host as exposed by listing paths. Deliberately carries no
/// password; connecting by name goes through [`HostRegistry::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedHost {
    pub name: String,
    pub host: String,
    pub port: String,
}

/// Outcome of [`HostRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The alias was new and has been inserted
    Added,
    /// The alias already maps to exactly this target; nothing was changed
    AlreadyExistsIdentical,
    /// The alias existed with a different target and has been overwritten
    AlreadyExistsConflict,
}

/// The saved-hosts registry backed by one INI file
#[derive(Debug)]
pub struct HostRegistry {
    path: PathBuf,
    doc: ini::Document,
}

impl HostRegistry {
    /// Load the registry; a missing file is an empty registry
    pub fn load(path: &Path) -> Result<Self> {
        let doc = if path.exists() {
            ini::Document::parse(&fs::read_to_string(path)?)?
        } else {
            ini::Document::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Look up a saved host by alias
    pub fn resolve(&self, name: &str) -> Option<Target> {
        let section = self.doc.section(name)?;
        Some(Target {
            host: section.get("sHost").unwrap_or_default().to_string(),
            port: section.get("sPort").unwrap_or_default().to_string(),
            password: section.get("sPass").unwrap_or_default().to_string(),
        })
    }

    /// Insert or update an alias
    pub fn add(&mut self, name: &str, target: &Target) -> AddOutcome {
        let outcome = match self.resolve(name) {
            None => AddOutcome::Added,
            Some(existing) if existing == *target => return AddOutcome::AlreadyExistsIdentical,
            Some(_) => AddOutcome::AlreadyExistsConflict,
        };

        let section = self.doc.section_mut(name);
        section.set("sHost", &target.host);
        section.set("sPort", &target.port);
        section.set("sPass", &target.password);
        outcome
    }

    /// Remove an alias; returns whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        self.doc.remove_section(name)
    }

    /// All saved hosts in file order, without their passwords
    pub fn list(&self) -> Vec<SavedHost> {
        self.doc
            .sections()
            .map(|s| SavedHost {
                name: s.name.clone(),
                host: s.get("sHost").unwrap_or_default().to_string(),
                port: s.get("sPort").unwrap_or_default().to_string(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Persist the registry. When empty and `auto_delete` is set, the file
    /// is removed instead of being left as an empty husk.
    pub fn save(&self, auto_delete: bool) -> Result<()> {
        if self.doc.is_empty() && auto_delete {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        fs::write(&self.path, self.doc.render())?;
        Ok(())
    }
}
