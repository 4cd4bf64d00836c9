// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Download link broker.
//!
//! ## Grant Lifecycle
//!
//! ```text
//! request_link ──► Issued ──► redeem ──► (still Issued)
//! ```
//!
//! A grant binds a token to the client that asked for it and the file it
//! unlocks. Redemption never consumes the grant: the same client may use
//! the link any number of times, nobody else may use it at all.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{authorize, AuthenticatedUser, Operation};
use crate::catalog::FileCatalog;
use crate::codec::ReversibleCodec;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::blob::BlobReader;
use crate::storage::{GrantRepository, KvStore, StoredGrant};

pub const DOWNLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// A redeemed link, ready to stream.
#[derive(Debug)]
pub struct DownloadHandle {
    pub file_id: String,
    pub filename: String,
    pub content_type: &'static str,
    pub blob: BlobReader,
}

/// One row of the download history.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct HistoryEntry {
    pub file_id: String,
    pub filename: String,
    /// Time the history was generated
    pub downloaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DownloadBroker {
    store: Arc<dyn KvStore>,
    codec: Arc<dyn ReversibleCodec>,
    catalog: FileCatalog,
}

impl DownloadBroker {
    pub fn new(
        store: Arc<dyn KvStore>,
        codec: Arc<dyn ReversibleCodec>,
        catalog: FileCatalog,
    ) -> Self {
        Self {
            store,
            codec,
            catalog,
        }
    }

    fn grants(&self) -> GrantRepository<'_> {
        GrantRepository::new(self.store.as_ref())
    }

    /// Mint a download token for `file_id` bound to `user`.
    ///
    /// The caller is expected to have passed the policy check for
    /// [`Operation::RequestDownloadLink`]; it is re-checked here.
    pub fn request_link(&self, file_id: &str, user: &AuthenticatedUser) -> ServiceResult<String> {
        authorize(Operation::RequestDownloadLink, user)?;
        let file = self.catalog.get(file_id)?;

        let token = self
            .codec
            .encode(&file.id)
            .map_err(|e| ServiceError::Internal(format!("Failed to encode download token: {e}")))?;

        let grant = StoredGrant {
            granting_user: user.email.clone(),
            file_id: file.id.clone(),
            issued_at: Utc::now(),
        };
        if !self.grants().create(&token, &grant)? {
            return Err(ServiceError::Internal(
                "Download token already bound".to_string(),
            ));
        }

        tracing::info!(file_id = %file.id, email = %user.email, "Download link issued");
        Ok(token)
    }

    /// Validate a download token for `user` and open the file.
    pub async fn redeem(&self, token: &str, user: &AuthenticatedUser) -> ServiceResult<DownloadHandle> {
        let file_id = self.codec.decode(token)?;

        let grant = self.grants().get(token)?.ok_or(ServiceError::InvalidToken)?;
        if grant.file_id != file_id {
            tracing::warn!(
                token_file_id = %file_id,
                grant_file_id = %grant.file_id,
                "Download grant does not match token"
            );
            return Err(ServiceError::InvalidToken);
        }

        authorize(
            Operation::RedeemDownloadLink {
                granting_user: &grant.granting_user,
            },
            user,
        )?;

        let file = self.catalog.get(&grant.file_id)?;
        let blob = self
            .catalog
            .blobs()
            .open(&file.blob_key())
            .await?
            .ok_or_else(|| {
                tracing::warn!(file_id = %file.id, "File metadata present but blob missing");
                ServiceError::NotFound("File not found".to_string())
            })?;

        tracing::info!(file_id = %file.id, email = %user.email, size = blob.len, "Download link redeemed");
        Ok(DownloadHandle {
            file_id: file.id,
            filename: file.filename,
            content_type: DOWNLOAD_CONTENT_TYPE,
            blob,
        })
    }

    /// One entry per cataloged file, all stamped with the current time.
    ///
    /// Downloads are not recorded, so this is not an event log.
    pub fn history(&self) -> ServiceResult<Vec<HistoryEntry>> {
        let now = Utc::now();
        Ok(self
            .catalog
            .list_all()?
            .into_iter()
            .map(|file| HistoryEntry {
                file_id: file.id,
                filename: file.filename,
                downloaded_at: now,
            })
            .collect())
    }
}
