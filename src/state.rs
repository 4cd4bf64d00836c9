// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{BcryptHasher, CredentialStore, SessionTokens};
use crate::broker::DownloadBroker;
use crate::catalog::FileCatalog;
use crate::codec::{AesGcmCodec, CodecError, ReversibleCodec};
use crate::config::AppConfig;
use crate::storage::{BlobStore, KvStore};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub credentials: CredentialStore,
    pub sessions: Arc<SessionTokens>,
    /// Codec for email verification tokens
    pub codec: Arc<dyn ReversibleCodec>,
    pub catalog: FileCatalog,
    pub broker: DownloadBroker,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire up every component over `store` and `blobs`.
    pub fn new(
        store: Arc<dyn KvStore>,
        blobs: BlobStore,
        config: &AppConfig,
    ) -> Result<Self, CodecError> {
        let codec: Arc<dyn ReversibleCodec> = Arc::new(AesGcmCodec::new(config.link_key.as_bytes())?);
        let credentials = CredentialStore::new(
            store.clone(),
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        );
        let sessions = Arc::new(SessionTokens::new(
            config.jwt_secret.as_bytes(),
            config.jwt_algorithm,
            config.token_ttl_minutes,
        ));
        let catalog = FileCatalog::new(store.clone(), blobs);
        let broker = DownloadBroker::new(store.clone(), codec.clone(), catalog.clone());

        Ok(Self {
            store,
            credentials,
            sessions,
            codec,
            catalog,
            broker,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
