use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::signup::{
    code::CodeGenerator,
    dto::{DecodeError, SignupRequest},
    password::{CredentialHasher, HashingError},
    repo::{NewUser, StoreError, UserStore},
};

#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Turns a signup body into a stored, unverified user.
///
/// Steps run in order: decode, hash, generate a verification code, insert.
/// Any failure ends the request; nothing is retried.
pub struct SignupService {
    hasher: Arc<dyn CredentialHasher>,
    store: Arc<dyn UserStore>,
    codes: CodeGenerator,
}

impl SignupService {
    pub fn new(
        hasher: Arc<dyn CredentialHasher>,
        store: Arc<dyn UserStore>,
        codes: CodeGenerator,
    ) -> Self {
        Self {
            hasher,
            store,
            codes,
        }
    }

    pub async fn signup(&self, body: &[u8]) -> Result<(), SignupError> {
        let payload = SignupRequest::decode(body).map_err(|e| {
            warn!(error = %e, "signup payload rejected");
            e
        })?;
        let SignupRequest {
            username,
            email,
            password,
        } = payload;

        // argon2 is CPU bound, keep it off the async workers
        let hasher = Arc::clone(&self.hasher);
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(HashingError::from)
            .and_then(|r| r)
            .map_err(|e| {
                error!(error = %e, "hash_password failed");
                e
            })?;

        let user = NewUser {
            username,
            email,
            password_hash,
            verification_code: self.codes.generate(),
        };

        if let Err(e) = self.store.insert(&user).await {
            match &e {
                StoreError::Conflict(_) => {
                    error!(error = %e, username = %user.username, "create user conflicted")
                }
                StoreError::Database(_) => error!(error = %e, "create user failed"),
            }
            return Err(e.into());
        }

        info!(username = %user.username, "user registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::{
        code::is_valid_code,
        password::Argon2Hasher,
        test_support::{FailingHasher, FakeHasher, RecordingStore},
    };

    fn service(hasher: Arc<dyn CredentialHasher>, store: Arc<dyn UserStore>) -> SignupService {
        SignupService::new(hasher, store, CodeGenerator::from_seed(1))
    }

    #[tokio::test]
    async fn stores_hashed_password_and_valid_code() {
        let hasher = Arc::new(Argon2Hasher::new().unwrap());
        let store = Arc::new(RecordingStore::default());
        let svc = service(hasher.clone(), store.clone());

        svc.signup(br#"{"username":"alice","email":"alice@example.com","password":"Secr3t!"}"#)
            .await
            .expect("signup should succeed");

        let inserted = store.inserted();
        assert_eq!(inserted.len(), 1);
        let user = &inserted[0];
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "Secr3t!");
        assert!(hasher.verify("Secr3t!", &user.password_hash).unwrap());
        assert!(is_valid_code(&user.verification_code));
    }

    #[tokio::test]
    async fn empty_object_signs_up_with_empty_fields() {
        let hasher = Arc::new(Argon2Hasher::new().unwrap());
        let store = Arc::new(RecordingStore::default());
        let svc = service(hasher.clone(), store.clone());

        svc.signup(b"{}").await.expect("empty payload is accepted");

        let inserted = store.inserted();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].username, "");
        assert_eq!(inserted[0].email, "");
        assert!(hasher.verify("", &inserted[0].password_hash).unwrap());
    }

    #[tokio::test]
    async fn invalid_json_never_reaches_hasher_or_store() {
        let hasher = Arc::new(FakeHasher::default());
        let store = Arc::new(RecordingStore::default());
        let svc = service(hasher.clone(), store.clone());

        let err = svc.signup(b"{\"username\":").await.unwrap_err();

        assert!(matches!(err, SignupError::Decode(_)));
        assert_eq!(hasher.calls(), 0);
        assert_eq!(store.attempts(), 0);
    }

    #[tokio::test]
    async fn hashing_failure_skips_store() {
        let store = Arc::new(RecordingStore::default());
        let svc = service(Arc::new(FailingHasher), store.clone());

        let err = svc.signup(br#"{"password":"x"}"#).await.unwrap_err();

        assert!(matches!(err, SignupError::Hashing(_)));
        assert_eq!(store.attempts(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_not_retried() {
        let hasher = Arc::new(FakeHasher::default());
        let store = Arc::new(RecordingStore::failing());
        let svc = service(hasher.clone(), store.clone());

        let err = svc.signup(br#"{"username":"bob","password":"pw"}"#).await.unwrap_err();

        assert!(matches!(err, SignupError::Store(StoreError::Database(_))));
        assert_eq!(hasher.calls(), 1);
        assert_eq!(store.attempts(), 1);
        assert!(store.inserted().is_empty());
    }

    #[tokio::test]
    async fn each_signup_gets_its_own_code() {
        let store = Arc::new(RecordingStore::default());
        let svc = service(Arc::new(FakeHasher::default()), store.clone());

        svc.signup(br#"{"username":"a"}"#).await.unwrap();
        svc.signup(br#"{"username":"b"}"#).await.unwrap();

        let inserted = store.inserted();
        assert_eq!(inserted.len(), 2);
        assert_ne!(inserted[0].verification_code, inserted[1].verification_code);
    }
}
