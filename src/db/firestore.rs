// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations on user documents.
//!
//! Every user owns exactly one document in the `users` collection. Mutations
//! are read-modify-write of that whole document, serialized per user with an
//! async lock so concurrent requests against the same user cannot overwrite
//! each other's changes. Against Firestore the cycle also runs in a
//! transaction whose read is part of the transaction, so a conflicting
//! writer on another instance fails the commit rather than being overwritten.
//!
//! Besides Firestore (or its emulator) the wrapper can run against a
//! process-local map, used for local development and tests.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use firestore::errors::FirestoreError;
use firestore::FirestoreConsistencySelector;
use tokio::sync::Mutex;

use crate::db::collections;
use crate::error::AppError;
use crate::models::UserDocument;

/// Firestore rejects document IDs longer than this (bytes).
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Per-user locks guarding read-modify-write cycles.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

#[derive(Clone)]
enum Store {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<DashMap<String, UserDocument>>),
    /// Every operation fails; exercises database error paths in tests.
    Offline,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    store: Store,
    user_locks: UserLocks,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self::with_store(Store::Firestore(client)))
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self::with_store(Store::Firestore(client)))
    }

    /// Create a store backed by a process-local map.
    pub fn new_in_memory() -> Self {
        Self::with_store(Store::Memory(Arc::new(DashMap::new())))
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self::with_store(Store::Offline)
    }

    fn with_store(store: Store) -> Self {
        Self {
            store,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    // ─── Raw Document Access ─────────────────────────────────────

    async fn read_document(&self, user_id: &str) -> Result<Option<UserDocument>, AppError> {
        match &self.store {
            Store::Firestore(client) => read_user(client, user_id).await,
            Store::Memory(map) => Ok(map.get(user_id).map(|doc| doc.value().clone())),
            Store::Offline => Err(offline()),
        }
    }

    fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the user's lock entry once nobody holds or waits on it.
    fn release_lock(&self, user_id: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.user_locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    // ─── User Document Operations ────────────────────────────────

    /// Get a user's document.
    pub async fn get_user_document(&self, user_id: &str) -> Result<Option<UserDocument>, AppError> {
        validate_document_id(user_id)?;
        self.read_document(user_id).await
    }

    /// Create a user's document. Fails with `Conflict` if it already exists.
    pub async fn create_user_document(&self, doc: &UserDocument) -> Result<(), AppError> {
        let user_id = doc.user.id.as_str();
        validate_document_id(user_id)?;

        match &self.store {
            Store::Firestore(client) => {
                // Insert fails server-side when the document exists.
                let _: UserDocument = client
                    .fluent()
                    .insert()
                    .into(collections::USERS)
                    .document_id(user_id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(|e| match e {
                        FirestoreError::DataConflictError(_) => user_exists(user_id),
                        other => firestore_error("Failed to create user", other),
                    })?;
            }
            Store::Memory(map) => match map.entry(user_id.to_string()) {
                Entry::Occupied(_) => return Err(user_exists(user_id)),
                Entry::Vacant(slot) => {
                    slot.insert(doc.clone());
                }
            },
            Store::Offline => return Err(offline()),
        }

        tracing::info!(user_id, "User document created");
        Ok(())
    }

    /// Apply `mutate` to a user's document and write the result back.
    ///
    /// The document is written only when `mutate` succeeds. Calls for the same
    /// user are serialized, so each one sees the previous one's writes.
    pub async fn update_user_document<T, F>(&self, user_id: &str, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut UserDocument) -> Result<T, AppError>,
    {
        validate_document_id(user_id)?;

        let lock = self.lock_for(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.update_locked(user_id, mutate).await
        };
        self.release_lock(user_id, lock);

        result
    }

    async fn update_locked<T, F>(&self, user_id: &str, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut UserDocument) -> Result<T, AppError>,
    {
        match &self.store {
            Store::Firestore(client) => update_in_transaction(client, user_id, mutate).await,
            Store::Memory(map) => {
                let mut doc = map
                    .get(user_id)
                    .map(|doc| doc.value().clone())
                    .ok_or_else(|| AppError::user_not_found(user_id))?;
                let output = mutate(&mut doc)?;
                map.insert(user_id.to_string(), doc);
                Ok(output)
            }
            Store::Offline => Err(offline()),
        }
    }

    /// Delete a user's document. Returns whether it existed.
    pub async fn delete_user_document(&self, user_id: &str) -> Result<bool, AppError> {
        validate_document_id(user_id)?;

        let lock = self.lock_for(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.delete_locked(user_id).await
        };
        self.release_lock(user_id, lock);

        let existed = result?;
        tracing::info!(user_id, existed, "User document deleted");
        Ok(existed)
    }

    async fn delete_locked(&self, user_id: &str) -> Result<bool, AppError> {
        match &self.store {
            Store::Firestore(client) => {
                let existed = read_user(client, user_id).await?.is_some();
                client
                    .fluent()
                    .delete()
                    .from(collections::USERS)
                    .document_id(user_id)
                    .execute()
                    .await
                    .map_err(|e| firestore_error("Failed to delete user", e))?;
                Ok(existed)
            }
            Store::Memory(map) => Ok(map.remove(user_id).is_some()),
            Store::Offline => Err(offline()),
        }
    }
}

async fn read_user(
    client: &firestore::FirestoreDb,
    user_id: &str,
) -> Result<Option<UserDocument>, AppError> {
    client
        .fluent()
        .select()
        .by_id_in(collections::USERS)
        .obj()
        .one(user_id)
        .await
        .map_err(|e| firestore_error("Failed to read user", e))
}

/// Read-modify-write of one user document inside a Firestore transaction.
///
/// The read is bound to the transaction, so a concurrent writer on another
/// instance makes the commit fail instead of being overwritten.
async fn update_in_transaction<T, F>(
    client: &firestore::FirestoreDb,
    user_id: &str,
    mutate: F,
) -> Result<T, AppError>
where
    F: FnOnce(&mut UserDocument) -> Result<T, AppError>,
{
    let mut transaction = client
        .begin_transaction()
        .await
        .map_err(|e| firestore_error("Failed to begin transaction", e))?;

    let in_transaction = client.clone_with_consistency_selector(
        FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
    );
    let current = match read_user(&in_transaction, user_id).await {
        Ok(current) => current,
        Err(e) => {
            let _ = transaction.rollback().await;
            return Err(e);
        }
    };

    let Some(mut doc) = current else {
        let _ = transaction.rollback().await;
        return Err(AppError::user_not_found(user_id));
    };

    let output = match mutate(&mut doc) {
        Ok(output) => output,
        Err(e) => {
            // Nothing to write
            let _ = transaction.rollback().await;
            return Err(e);
        }
    };

    client
        .fluent()
        .update()
        .in_col(collections::USERS)
        .document_id(user_id)
        .object(&doc)
        .add_to_transaction(&mut transaction)
        .map_err(|e| firestore_error("Failed to add user to transaction", e))?;

    transaction
        .commit()
        .await
        .map_err(|e| firestore_error("Transaction commit failed", e))?;

    Ok(output)
}

/// A document that cannot be (de)serialized is our bug, not a storage outage.
fn firestore_error(context: &str, err: FirestoreError) -> AppError {
    match err {
        FirestoreError::SerializeError(_) | FirestoreError::DeserializeError(_) => {
            AppError::Internal(anyhow::anyhow!("{}: {}", context, err))
        }
        other => AppError::Database(format!("{}: {}", context, other)),
    }
}

fn user_exists(user_id: &str) -> AppError {
    AppError::Conflict(format!("User {} already exists", user_id))
}

fn offline() -> AppError {
    AppError::Database("Database not connected (offline mode)".to_string())
}

/// Reject IDs Firestore cannot use as a document ID.
pub fn validate_document_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_DOCUMENT_ID_BYTES
        && !id.contains('/')
        && id != "."
        && id != ".."
        && !(id.starts_with("__") && id.ends_with("__"));

    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid user ID {:?}", id)))
    }
}
