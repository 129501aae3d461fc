//! Registry of named alphabet profiles and the rule tables built from them.
//!
//! The `Standard` and `Extended` profiles are embedded in the binary. More profiles can
//! be registered at runtime, either directly or from a directory of `.profile` files.
//! Tables are built once per profile and shared behind an `Arc`.

use crate::alphabet::Alphabet;
use crate::builder::build;
use crate::loader::ProfileLoader;
use crate::table::TransitionTable;
use crate::types::TuringMachineError;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

// Default embedded profiles
const PROFILE_TEXTS: [&str; 2] = [
    include_str!("../profiles/standard.profile"),
    include_str!("../profiles/extended.profile"),
];

/// Name of the profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "Standard";

lazy_static::lazy_static! {
    pub static ref PROFILES: RwLock<Vec<Alphabet>> = RwLock::new(Vec::new());
    static ref TABLES: RwLock<HashMap<String, Arc<TransitionTable>>> = RwLock::new(HashMap::new());
}

pub struct ProfileManager;

impl ProfileManager {
    /// Populates the registry with the embedded profiles if it is still empty.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut profiles = PROFILES.write().map_err(|_| lock_error("write"))?;
        if !profiles.is_empty() {
            return Ok(());
        }

        for text in PROFILE_TEXTS {
            match crate::parser::parse(text) {
                Ok(alphabet) => profiles.push(alphabet),
                Err(e) => tracing::error!(error = %e, "failed to parse embedded profile"),
            }
        }

        tracing::debug!(count = profiles.len(), "loaded embedded profiles");
        Ok(())
    }

    /// Get the number of available profiles
    pub fn get_profile_count() -> usize {
        let _ = Self::load();

        PROFILES.read().map(|profiles| profiles.len()).unwrap_or(0)
    }

    /// Get a profile by its index
    pub fn get_profile_by_index(index: usize) -> Result<Alphabet, TuringMachineError> {
        let _ = Self::load();

        PROFILES
            .read()
            .map_err(|_| lock_error("read"))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Profile index {} out of range", index))
            })
    }

    /// Get a profile by its name. Names are compared case-insensitively.
    pub fn get_profile_by_name(name: &str) -> Result<Alphabet, TuringMachineError> {
        let _ = Self::load();

        PROFILES
            .read()
            .map_err(|_| lock_error("read"))?
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| TuringMachineError::UnknownProfile(name.to_string()))
    }

    /// List all profile names
    pub fn list_profile_names() -> Vec<String> {
        let _ = Self::load();

        PROFILES
            .read()
            .map(|profiles| profiles.iter().map(|profile| profile.name.clone()).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a profile by its index
    pub fn get_profile_info(index: usize) -> Result<ProfileInfo, TuringMachineError> {
        let profile = Self::get_profile_by_index(index)?;
        let table = Self::table(&profile.name)?;

        Ok(ProfileInfo {
            index,
            name: profile.name.clone(),
            blank: profile.blank,
            symbol_count: profile.input_symbols().count(),
            rule_count: table.len(),
        })
    }

    /// Adds a profile to the registry, replacing any profile with the same name.
    ///
    /// The alphabet is validated first; a replaced profile's cached table is dropped.
    pub fn register(alphabet: Alphabet) -> Result<(), TuringMachineError> {
        alphabet.validate()?;
        Self::load()?;

        let key = cache_key(&alphabet.name);
        {
            let mut profiles = PROFILES.write().map_err(|_| lock_error("write"))?;
            match profiles
                .iter_mut()
                .find(|profile| profile.name.eq_ignore_ascii_case(&alphabet.name))
            {
                Some(existing) => *existing = alphabet,
                None => profiles.push(alphabet),
            }
        }

        TABLES.write().map_err(|_| lock_error("write"))?.remove(&key);
        tracing::debug!(profile = %key, "registered profile");
        Ok(())
    }

    /// Registers every valid profile found in `directory`.
    ///
    /// Returns the number of profiles registered. Files that fail to load are logged
    /// and skipped.
    pub fn load_directory(directory: &Path) -> Result<usize, TuringMachineError> {
        let mut registered = 0;

        for result in ProfileLoader::load_profiles(directory) {
            match result {
                Ok((path, alphabet)) => {
                    tracing::info!(path = %path.display(), profile = %alphabet.name, "registering profile");
                    Self::register(alphabet)?;
                    registered += 1;
                }
                Err(e) => tracing::warn!(error = %e, "skipping profile"),
            }
        }

        Ok(registered)
    }

    /// Returns the rule table for the named profile, building and caching it on first use.
    ///
    /// A cached table is only served while it was built from the profile currently
    /// registered under `name`, so a concurrent `register` never leaves a stale table
    /// behind.
    pub fn table(name: &str) -> Result<Arc<TransitionTable>, TuringMachineError> {
        let key = cache_key(name);

        if let Some(table) = TABLES.read().map_err(|_| lock_error("read"))?.get(&key) {
            if Self::is_current(table)? {
                return Ok(Arc::clone(table));
            }
        }

        let alphabet = Self::get_profile_by_name(name)?;
        let table = Arc::new(build(&alphabet)?);

        let mut tables = TABLES.write().map_err(|_| lock_error("write"))?;
        if let Some(existing) = tables.get(&key) {
            if Self::is_current(existing)? {
                return Ok(Arc::clone(existing));
            }
        }

        if Self::is_current(&table)? {
            tables.insert(key, Arc::clone(&table));
        } else {
            tracing::debug!(profile = %alphabet.name, "profile replaced while building, not caching");
        }

        Ok(table)
    }

    /// Checks if `table` was built from the profile registered under its name.
    fn is_current(table: &TransitionTable) -> Result<bool, TuringMachineError> {
        let alphabet = table.alphabet();

        Ok(PROFILES
            .read()
            .map_err(|_| lock_error("read"))?
            .iter()
            .any(|profile| profile.name.eq_ignore_ascii_case(&alphabet.name) && profile == alphabet))
    }

    /// Returns the rule table of the default profile.
    pub fn default_table() -> Result<Arc<TransitionTable>, TuringMachineError> {
        Self::table(DEFAULT_PROFILE)
    }
}

fn cache_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn lock_error(kind: &str) -> TuringMachineError {
    TuringMachineError::FileError(format!("Failed to acquire {kind} lock"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub index: usize,
    pub name: String,
    pub blank: char,
    pub symbol_count: usize,
    pub rule_count: usize,
}
