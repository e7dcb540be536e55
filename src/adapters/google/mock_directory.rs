//! Mock directory provisioner for tests and local runs.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{DirectoryError, DirectoryProvisioner, ProvisionAccountRequest};

/// Records provisioning requests; optionally fails every call.
#[derive(Default, Clone)]
pub struct MockDirectoryProvisioner {
    requests: Arc<Mutex<Vec<ProvisionAccountRequest>>>,
    failure: Arc<Mutex<Option<DirectoryError>>>,
}

impl MockDirectoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail all subsequent calls with `error`, or succeed again with `None`.
    pub fn set_failure(&self, error: Option<DirectoryError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    pub fn requests(&self) -> Vec<ProvisionAccountRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl DirectoryProvisioner for MockDirectoryProvisioner {
    async fn create_account(&self, request: ProvisionAccountRequest) -> Result<(), DirectoryError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
