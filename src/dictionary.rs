//! The substitution dictionary and its builder.
//!
//! Sources are applied in a fixed order:
//!
//! 1. environment snapshot, every variable as text
//! 2. config file, top-level keys only, never replacing an existing key
//! 3. string names, each variable's value as text
//! 4. list names, each variable's value split on commas
//! 5. map names, each variable's value split on commas and then on the first `=`
//!
//! Steps 3 to 5 always overwrite whatever was there before.

use std::path::PathBuf;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::config::load_config;
use crate::constants::{LIST_SEPARATOR, MAP_ITEM_SEPARATOR};
use crate::error::{Error, Result};
use crate::value::Value;

/// The data sources selected for one invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DictionarySources {
    /// Import every process environment variable as text
    pub env: bool,
    /// Structured config file whose top-level keys become entries
    pub file: Option<PathBuf>,
    /// Variables imported as text
    pub strings: Vec<String>,
    /// Variables imported as comma-separated lists
    pub lists: Vec<String>,
    /// Variables imported as comma-separated `key=value` maps
    pub maps: Vec<String>,
}

impl DictionarySources {
    /// Returns true if no source is selected at all.
    pub fn is_empty(&self) -> bool {
        !self.env
            && self.file.is_none()
            && self.strings.is_empty()
            && self.lists.is_empty()
            && self.maps.is_empty()
    }
}

/// Splits a comma-separated name list. An absent or empty list selects nothing.
pub fn split_names(names: Option<&str>) -> Vec<String> {
    match names {
        Some(names) if !names.is_empty() => {
            names.split(LIST_SEPARATOR).map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}

fn lookup_var<'a>(vars: &'a IndexMap<String, String>, name: &str) -> &'a str {
    vars.get(name).map(String::as_str).unwrap_or_default()
}

/// Mapping from name to value used as the template context.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: IndexMap<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the dictionary from `sources` using the current process environment.
    pub fn build(sources: &DictionarySources) -> Result<Self> {
        let vars: IndexMap<String, String> = std::env::vars_os()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect();
        Self::build_from(sources, &vars)
    }

    /// Builds the dictionary from `sources`, reading variables from `vars`.
    ///
    /// A variable missing from `vars` reads as the empty string.
    ///
    /// # Errors
    /// * `Error::ConfigDecodeError` or `Error::IoError` if the config file cannot be loaded
    /// * `Error::MalformedMapEntry` if a map item has no `=`
    pub fn build_from(
        sources: &DictionarySources,
        vars: &IndexMap<String, String>,
    ) -> Result<Self> {
        let mut dictionary = Dictionary::new();

        if sources.env {
            debug!("Importing {} environment variables", vars.len());
            for (name, value) in vars.iter().filter(|(name, _)| !name.is_empty()) {
                dictionary.insert(name, Value::from(value.as_str()));
            }
        }

        if let Some(file) = &sources.file {
            for (key, value) in load_config(file)? {
                if !dictionary.insert_if_absent(&key, value) {
                    debug!("Keeping existing value for '{}' over the config file", key);
                }
            }
        }

        for name in &sources.strings {
            dictionary.insert(name, Value::from(lookup_var(vars, name)));
        }

        for name in &sources.lists {
            let items = lookup_var(vars, name).split(LIST_SEPARATOR);
            dictionary.insert(name, Value::text_list(items));
        }

        for name in &sources.maps {
            let mut pairs = Vec::new();
            for item in lookup_var(vars, name).split(LIST_SEPARATOR) {
                let (key, value) = item.split_once(MAP_ITEM_SEPARATOR).ok_or_else(|| {
                    Error::MalformedMapEntry { name: name.clone(), item: item.to_string() }
                })?;
                pairs.push((key, value));
            }
            dictionary.insert(name, Value::text_map(pairs));
        }

        debug!("Dictionary built with {} entries", dictionary.len());
        Ok(dictionary)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Sets `name`, replacing any previous value.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Sets `name` only if it is not present yet. Returns whether the value was written.
    pub fn insert_if_absent<S: Into<String>>(&mut self, name: S, value: Value) -> bool {
        match self.entries.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}
