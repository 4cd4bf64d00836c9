// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File catalog: upload registration and metadata lookup.
//!
//! Only office documents are accepted. Bytes go to the blob store first and
//! the metadata record is written last, so a listed file always has content.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::AsyncRead;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::storage::{BlobStore, FileRepository, KvStore, StoredFile};

/// Extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["docx", "pptx", "xlsx"];

/// Longest accepted filename in bytes. The blob key adds a 36-byte id,
/// a separator and a `.part` suffix, and must stay under the usual
/// 255-byte filesystem name limit.
pub const MAX_FILENAME_BYTES: usize = 200;

#[derive(Clone)]
pub struct FileCatalog {
    store: Arc<dyn KvStore>,
    blobs: BlobStore,
}

impl FileCatalog {
    pub fn new(store: Arc<dyn KvStore>, blobs: BlobStore) -> Self {
        Self { store, blobs }
    }

    fn files(&self) -> FileRepository<'_> {
        FileRepository::new(self.store.as_ref())
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Validate, store, and record an uploaded document.
    pub async fn register_upload<R>(
        &self,
        filename: &str,
        uploader: &str,
        reader: &mut R,
    ) -> ServiceResult<StoredFile>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let filename = sanitize_filename(filename)?;
        check_extension(&filename)?;

        let file = StoredFile {
            id: Uuid::new_v4().to_string(),
            filename,
            uploader: uploader.to_string(),
            uploaded_at: Utc::now(),
        };

        let blob_key = file.blob_key();
        let size = self.blobs.write(&blob_key, reader).await?;

        if !self.files().create(&file)? {
            // v4 collision; leave nothing orphaned
            let _ = self.blobs.delete(&blob_key).await;
            return Err(ServiceError::Internal(format!(
                "File id collision: {}",
                file.id
            )));
        }

        tracing::info!(
            file_id = %file.id,
            filename = %file.filename,
            uploader = %file.uploader,
            size,
            "File uploaded"
        );
        Ok(file)
    }

    pub fn get(&self, file_id: &str) -> ServiceResult<StoredFile> {
        self.files()
            .get(file_id)?
            .ok_or_else(|| ServiceError::NotFound("File not found".to_string()))
    }

    /// Every cataloged file, oldest upload first.
    pub fn list_all(&self) -> ServiceResult<Vec<StoredFile>> {
        Ok(self.files().list_all()?)
    }
}

/// Reduce a client-supplied filename to its final path component.
fn sanitize_filename(raw: &str) -> ServiceResult<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return Err(ServiceError::InvalidInput("Missing filename".to_string()));
    }
    if last.len() > MAX_FILENAME_BYTES {
        return Err(ServiceError::InvalidInput(format!(
            "Filename longer than {MAX_FILENAME_BYTES} bytes"
        )));
    }
    Ok(last.to_string())
}

fn check_extension(filename: &str) -> ServiceResult<()> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ServiceError::UnsupportedType(filename.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoragePaths};
    use tokio::io::AsyncReadExt;

    async fn catalog() -> (FileCatalog, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(StoragePaths::new(dir.path()));
        blobs.initialize().await.unwrap();
        (FileCatalog::new(Arc::new(MemoryStore::new()), blobs), dir)
    }

    #[tokio::test]
    async fn upload_records_metadata_and_bytes() {
        let (catalog, _dir) = catalog().await;
        let file = catalog
            .register_upload("q3.xlsx", "ops@example.com", &mut b"numbers".as_slice())
            .await
            .unwrap();

        assert_eq!(file.filename, "q3.xlsx");
        assert_eq!(file.uploader, "ops@example.com");
        assert!(Uuid::parse_str(&file.id).is_ok());
        assert_eq!(catalog.get(&file.id).unwrap(), file);

        let mut blob = catalog.blobs().open(&file.blob_key()).await.unwrap().unwrap();
        let mut bytes = Vec::new();
        blob.file.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(bytes, b"numbers");
    }

    #[tokio::test]
    async fn disallowed_extensions_are_rejected() {
        let (catalog, _dir) = catalog().await;
        for name in ["notes.txt", "script.exe", "archive.docx.zip", "noext", "xlsx"] {
            let err = catalog
                .register_upload(name, "ops@example.com", &mut b"x".as_slice())
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::UnsupportedType(_)), "{name}");
        }
        assert!(catalog.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn extension_match_ignores_case() {
        let (catalog, _dir) = catalog().await;
        let file = catalog
            .register_upload("Deck.PPTX", "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap();
        assert_eq!(file.filename, "Deck.PPTX");
    }

    #[tokio::test]
    async fn path_components_are_stripped() {
        let (catalog, _dir) = catalog().await;
        let file = catalog
            .register_upload("../../etc/report.docx", "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap();
        assert_eq!(file.filename, "report.docx");

        let file = catalog
            .register_upload("C:\\Users\\me\\plan.xlsx", "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap();
        assert_eq!(file.filename, "plan.xlsx");
    }

    #[tokio::test]
    async fn empty_filename_is_invalid_input() {
        let (catalog, _dir) = catalog().await;
        let err = catalog
            .register_upload("dir/", "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn overlong_filename_is_invalid_input() {
        let (catalog, dir) = catalog().await;
        let name = format!("{}.docx", "a".repeat(230));
        let err = catalog
            .register_upload(&name, "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(catalog.list_all().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);

        let longest = format!("{}.docx", "b".repeat(MAX_FILENAME_BYTES - 5));
        let file = catalog
            .register_upload(&longest, "ops@example.com", &mut b"x".as_slice())
            .await
            .unwrap();
        assert_eq!(file.filename, longest);
    }

    #[tokio::test]
    async fn unknown_file_is_not_found() {
        let (catalog, _dir) = catalog().await;
        assert!(matches!(
            catalog.get("missing").unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }
}
