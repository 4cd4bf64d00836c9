// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-disk storage layout.

use std::path::{Path, PathBuf};

/// Default base directory for all persistent storage.
pub const DATA_ROOT: &str = "./data";

/// File name of the embedded database under the data root.
pub const DATABASE_FILE: &str = "exchange.redb";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the redb database file.
    pub fn database(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    /// Directory containing uploaded document bytes.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Path to a single blob.
    pub fn blob(&self, key: &str) -> PathBuf {
        self.uploads_dir().join(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_data() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new(DATA_ROOT));
    }

    #[test]
    fn layout_is_rooted() {
        let paths = StoragePaths::new("/tmp/exchange");
        assert_eq!(paths.database(), PathBuf::from("/tmp/exchange/exchange.redb"));
        assert_eq!(paths.uploads_dir(), PathBuf::from("/tmp/exchange/uploads"));
        assert_eq!(
            paths.blob("abc_q3.xlsx"),
            PathBuf::from("/tmp/exchange/uploads/abc_q3.xlsx")
        );
    }
}
