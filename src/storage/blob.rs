// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Disk-backed blob store for uploaded document bytes.
//!
//! Blobs are addressed by an opaque key (`{file_id}_{filename}`) that must be
//! a single path component. Writes stream through a bounded buffer into a
//! `.part` file that is renamed into place once complete.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};

use super::StoragePaths;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    #[error("blob I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An opened blob ready for streaming.
#[derive(Debug)]
pub struct BlobReader {
    pub file: File,
    pub len: u64,
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    paths: StoragePaths,
}

impl BlobStore {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Blob key for a cataloged file.
    pub fn key_for(file_id: &str, filename: &str) -> String {
        format!("{file_id}_{filename}")
    }

    /// Create the uploads directory. Safe to call multiple times.
    pub async fn initialize(&self) -> Result<(), BlobError> {
        fs::create_dir_all(self.paths.uploads_dir()).await?;
        Ok(())
    }

    /// Whether the uploads directory exists.
    pub async fn is_available(&self) -> bool {
        fs::metadata(self.paths.uploads_dir())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// Stream `reader` into the blob at `key`. Returns the number of bytes written.
    pub async fn write<R>(&self, key: &str, reader: &mut R) -> Result<u64, BlobError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let path = self.path_for(key)?;
        let temp_path = path.with_file_name(format!("{key}.part"));

        match copy_into(&temp_path, reader).await {
            Ok(written) => {
                fs::rename(&temp_path, &path).await?;
                Ok(written)
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                Err(e.into())
            }
        }
    }

    /// Open the blob at `key`, or `None` if it does not exist.
    pub async fn open(&self, key: &str) -> Result<Option<BlobReader>, BlobError> {
        let path = self.path_for(key)?;
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();
        Ok(Some(BlobReader { file, len }))
    }

    /// Remove the blob at `key`. Returns `true` if it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, BlobError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        let single_component = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !single_component {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.paths.blob(key))
    }
}

async fn copy_into<R>(path: &Path, reader: &mut R) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let written = tokio::io::copy(reader, &mut writer).await?;
    writer.flush().await?;
    writer.into_inner().sync_all().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn temp_blobs() -> (BlobStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(StoragePaths::new(dir.path()));
        blobs.initialize().await.unwrap();
        (blobs, dir)
    }

    #[tokio::test]
    async fn write_then_open_roundtrips_bytes() {
        let (blobs, _dir) = temp_blobs().await;
        let content = vec![7u8; 100_000];

        let written = blobs
            .write("id_report.docx", &mut content.as_slice())
            .await
            .unwrap();
        assert_eq!(written, content.len() as u64);

        let mut blob = blobs.open("id_report.docx").await.unwrap().unwrap();
        assert_eq!(blob.len, content.len() as u64);

        let mut read_back = Vec::new();
        blob.file.read_to_end(&mut read_back).await.unwrap();
        assert_eq!(read_back, content);
    }

    #[tokio::test]
    async fn missing_blob_is_none() {
        let (blobs, _dir) = temp_blobs().await;
        assert!(blobs.open("nope_a.xlsx").await.unwrap().is_none());
        assert!(!blobs.delete("nope_a.xlsx").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (blobs, _dir) = temp_blobs().await;
        for key in ["", "..", "../etc_passwd", "a/b.docx", "a\\b.docx"] {
            let err = blobs.write(key, &mut b"x".as_slice()).await.unwrap_err();
            assert!(matches!(err, BlobError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn no_partial_file_left_behind() {
        let (blobs, dir) = temp_blobs().await;
        blobs.write("id_deck.pptx", &mut b"slides".as_slice()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("uploads"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["id_deck.pptx".to_string()]);
    }

    #[test]
    fn key_for_joins_id_and_name() {
        assert_eq!(BlobStore::key_for("abc", "q3.xlsx"), "abc_q3.xlsx");
    }
}
