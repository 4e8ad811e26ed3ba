//! Facility registry: (category, name) → [`Facility`] lookup tables.
//!
//! Names are raw bytes compared exactly. One facility may be registered any
//! number of times under different categories or names. Backends that never
//! get a registration of their own are kept in the anonymous collection so
//! every backend is reachable from exactly one of the two places.

use crate::error::{ConfigError, Result};
use crate::model::{BackendId, Facility};
use crate::types::Category;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: HashMap<Category, HashMap<Vec<u8>, Facility>>,
    anonymous: Vec<BackendId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `facility` as `name` in `category`. Fails if the name is
    /// already taken in that category.
    pub fn register(&mut self, category: Category, name: &[u8], facility: Facility) -> Result<()> {
        let table = self.tables.entry(category).or_default();
        if table.contains_key(name) {
            return Err(ConfigError::DuplicateFacility {
                category,
                name: String::from_utf8_lossy(name).into_owned(),
            }
            .into());
        }
        table.try_reserve(1)?;
        table.insert(name.to_vec(), facility);
        tracing::debug!(
            %category,
            name = %String::from_utf8_lossy(name),
            ?facility,
            "registered facility"
        );
        Ok(())
    }

    pub fn lookup(&self, category: Category, name: impl AsRef<[u8]>) -> Option<Facility> {
        self.tables.get(&category)?.get(name.as_ref()).copied()
    }

    /// Keep an otherwise unregistered backend alive.
    pub fn add_anonymous(&mut self, backend: BackendId) {
        tracing::debug!(backend = backend.0, "backend kept anonymously");
        self.anonymous.push(backend);
    }

    pub fn anonymous(&self) -> &[BackendId] {
        &self.anonymous
    }

    /// Names registered in `category`, sorted bytewise.
    pub fn names(&self, category: Category) -> Vec<&[u8]> {
        let mut names: Vec<&[u8]> = self
            .tables
            .get(&category)
            .map(|table| table.keys().map(Vec::as_slice).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Total number of registrations across all categories.
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
