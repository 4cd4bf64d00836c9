// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File metadata repository.
//!
//! Metadata records are immutable once written; the bytes live in the
//! blob store under `{id}_{filename}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{BlobStore, KvStore, StorageResult, Table};

/// Metadata of an uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredFile {
    /// Unique file identifier (UUID)
    pub id: String,
    /// Original filename as uploaded
    pub filename: String,
    /// Email of the ops user who uploaded the file
    pub uploader: String,
    /// When the upload completed
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    /// Key of this file's bytes in the blob store.
    pub fn blob_key(&self) -> String {
        BlobStore::key_for(&self.id, &self.filename)
    }
}

/// Repository for file metadata.
pub struct FileRepository<'a> {
    store: &'a dyn KvStore,
}

impl<'a> FileRepository<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn get(&self, file_id: &str) -> StorageResult<Option<StoredFile>> {
        match self.store.get(Table::Files, file_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Record a new file. Returns `false` if the id is already taken.
    pub fn create(&self, file: &StoredFile) -> StorageResult<bool> {
        let json = serde_json::to_vec(file)?;
        self.store.insert_new(Table::Files, &file.id, &json)
    }

    /// All files, oldest upload first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredFile>> {
        let mut files = self
            .store
            .list(Table::Files)?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice::<StoredFile>(&bytes))
            .collect::<Result<Vec<_>, _>>()?;
        files.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then(a.id.cmp(&b.id)));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn sample_file(id: &str, filename: &str, uploaded_at: DateTime<Utc>) -> StoredFile {
        StoredFile {
            id: id.to_string(),
            filename: filename.to_string(),
            uploader: "ops@example.com".to_string(),
            uploaded_at,
        }
    }

    #[test]
    fn create_get_and_reject_duplicate_id() {
        let store = MemoryStore::new();
        let repo = FileRepository::new(&store);
        let file = sample_file("f1", "q3.xlsx", Utc::now());

        assert!(repo.create(&file).unwrap());
        assert!(!repo.create(&file).unwrap());
        assert_eq!(repo.get("f1").unwrap(), Some(file));
        assert_eq!(repo.get("missing").unwrap(), None);
    }

    #[test]
    fn list_all_orders_by_upload_time() {
        let store = MemoryStore::new();
        let repo = FileRepository::new(&store);
        let now = Utc::now();

        // Key order ("a" < "z") is the opposite of upload order here
        repo.create(&sample_file("z", "first.docx", now - Duration::minutes(5)))
            .unwrap();
        repo.create(&sample_file("a", "second.pptx", now)).unwrap();

        let names: Vec<String> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|f| f.filename)
            .collect();
        assert_eq!(names, vec!["first.docx", "second.pptx"]);
    }

    #[test]
    fn blob_key_uses_id_and_filename() {
        let file = sample_file("abc", "q3.xlsx", Utc::now());
        assert_eq!(file.blob_key(), "abc_q3.xlsx");
    }
}
