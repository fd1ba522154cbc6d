//! Stub collaborators for exercising the signup flow without Postgres.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use crate::signup::{
    code::CodeGenerator,
    password::{CredentialHasher, HashingError},
    repo::{NewUser, StoreError, UserStore},
    services::SignupService,
};

/// Counts calls and "hashes" by prefixing, so tests stay fast.
#[derive(Default)]
pub struct FakeHasher {
    calls: AtomicUsize,
}

impl FakeHasher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialHasher for FakeHasher {
    fn hash(&self, plain: &str) -> Result<String, HashingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("fake${}", plain.len()))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, HashingError> {
        Ok(hash == format!("fake${}", plain.len()))
    }
}

pub struct FailingHasher;

impl CredentialHasher for FailingHasher {
    fn hash(&self, _plain: &str) -> Result<String, HashingError> {
        Err(HashingError::Hash(argon2::password_hash::Error::Password))
    }

    fn verify(&self, _plain: &str, _hash: &str) -> Result<bool, HashingError> {
        Err(HashingError::Hash(argon2::password_hash::Error::Password))
    }
}

/// Records every insert; optionally fails all of them.
#[derive(Default)]
pub struct RecordingStore {
    fail: bool,
    attempts: AtomicUsize,
    inserted: Mutex<Vec<NewUser>>,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn inserted(&self) -> Vec<NewUser> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for RecordingStore {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inserted.lock().unwrap().push(user.clone());
        Ok(())
    }
}

pub fn signup_service(
    hasher: Arc<dyn CredentialHasher>,
    store: Arc<dyn UserStore>,
) -> Arc<SignupService> {
    Arc::new(SignupService::new(hasher, store, CodeGenerator::from_seed(1)))
}
