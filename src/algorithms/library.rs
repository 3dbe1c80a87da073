// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Lookup of the simulation libraries backing dynamic automatons.

use std::env::consts::DLL_SUFFIX;
use std::path::{Path, PathBuf};

/// Tells whether the library of a dynamic automaton is available.
pub trait LibraryLocator {
    /// Returns true if the library with the given name, without extension,
    /// can be loaded by the simulation engine.
    fn exists(&self, library: &str) -> bool;
}

/// A [`LibraryLocator`] that searches the file system.
///
/// Libraries are searched in the library directory of the simulation engine
/// first, and then in the `lib` directory of this tool's installation.
#[derive(Clone, Debug)]
pub struct FsLibraryLocator {
    engine_library_dir: PathBuf,
    install_dir: PathBuf,
}

impl FsLibraryLocator {
    pub fn new(engine_library_dir: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine_library_dir: engine_library_dir.into(),
            install_dir: install_dir.into(),
        }
    }

    /// Returns the path of the library with the given name, if it is found.
    pub fn find(&self, library: &str) -> Option<PathBuf> {
        let file_name = format!("{library}{DLL_SUFFIX}");
        [
            self.engine_library_dir.join(&file_name),
            self.install_dir.join("lib").join(&file_name),
        ]
        .into_iter()
        .find(|path| Self::is_present(path))
    }

    fn is_present(path: &Path) -> bool {
        match path.try_exists() {
            Ok(exists) => exists,
            Err(err) => {
                tracing::warn!("Can't check if {} exists: {}", path.display(), err);
                false
            }
        }
    }
}

impl LibraryLocator for FsLibraryLocator {
    fn exists(&self, library: &str) -> bool {
        self.find(library).is_some()
    }
}
