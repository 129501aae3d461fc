//! This module provides the `ProfileLoader` struct, responsible for loading alphabet
//! profiles from files, strings, and directories.

use crate::alphabet::Alphabet;
use crate::parser::parse;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of alphabet profiles.
pub const PROFILE_EXTENSION: &str = "profile";

/// `ProfileLoader` is a utility struct for loading alphabet profiles.
/// It provides methods to load a profile from a file or from string content,
/// and to discover and load all `.profile` files within a directory.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Loads a single alphabet profile from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Alphabet)` if the file is read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * Any parse or validation error reported by [`parse`].
    pub fn load_profile(path: &Path) -> Result<Alphabet, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loading profile");
        parse(&content)
    }

    /// Loads a single alphabet profile from the provided string content.
    pub fn load_profile_from_string(content: &str) -> Result<Alphabet, TuringMachineError> {
        parse(content)
    }

    /// Loads all profile files (`.profile` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields
    /// either its path and alphabet, or the error that prevented loading it. The results
    /// are sorted by path so that repeated loads register profiles in the same order.
    pub fn load_profiles(directory: &Path) -> Vec<Result<(PathBuf, Alphabet), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file()
                        && path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION)
                    {
                        paths.push(path);
                    }
                }
                Err(e) => results.push(Err(TuringMachineError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.sort();

        results.extend(paths.into_iter().map(|path| {
            Self::load_profile(&path)
                .map(|alphabet| (path.clone(), alphabet))
                .map_err(|e| {
                    TuringMachineError::FileError(format!(
                        "Failed to load profile from {}: {}",
                        path.display(),
                        e
                    ))
                })
        }));

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const TINY: &str =
        "name: Tiny\nblank: _\nlowercase: a..c\nuppercase: A..C\ndigits: 0, 1\nspecials: !\n";

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_profile() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "tiny.profile", TINY);

        let alphabet = ProfileLoader::load_profile(&path).unwrap();
        assert_eq!(alphabet.name, "Tiny");
        assert_eq!(alphabet.lowercase, vec!['a', 'b', 'c']);
        assert_eq!(alphabet.digits, vec!['0', '1']);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProfileLoader::load_profile(&dir.path().join("nope.profile"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_profile() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "invalid.profile", "This is not a valid profile");

        let result = ProfileLoader::load_profile(&path);
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_load_from_string() {
        let alphabet = ProfileLoader::load_profile_from_string(TINY).unwrap();
        assert_eq!(alphabet.uppercase, vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_load_profiles_from_directory() {
        let dir = tempdir().unwrap();

        write_file(dir.path(), "b_valid.profile", TINY);
        write_file(dir.path(), "a_invalid.profile", "This is not a valid profile");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        fs::create_dir(dir.path().join("nested.profile")).unwrap();

        let results = ProfileLoader::load_profiles(dir.path());
        assert_eq!(results.len(), 2);

        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
        let (path, alphabet) = results[1].as_ref().unwrap();
        assert!(path.ends_with("b_valid.profile"));
        assert_eq!(alphabet.name, "Tiny");
    }

    #[test]
    fn test_load_profiles_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProfileLoader::load_profiles(&dir.path().join("missing"));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
