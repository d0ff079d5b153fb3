//! In-memory collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::proposal::{
    ConversionState, ProposalConversionStatus, ProposalStore, ProposalStoreError,
};
use crate::render::{RenderError, RenderRequest, Renderer};
use crate::storage::{ObjectStore, PresignedUrl, StorageError};

/// Object store backed by a `HashMap`.
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    presigns: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<String>>,
    presign_supported: bool,
    fail_reads: bool,
    vanish_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            presigns: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            presign_supported: true,
            fail_reads: false,
            vanish_reads: false,
        }
    }

    pub fn without_presign(mut self) -> Self {
        self.presign_supported = false;
        self
    }

    /// Downloads break mid-transfer.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Objects pass the existence check but are gone by download time.
    pub fn vanishing_reads(mut self) -> Self {
        self.vanish_reads = true;
        self
    }

    pub fn put(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn presigns(&self) -> Vec<(String, String)> {
        self.presigns.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl ObjectStore for MemoryStore {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<PresignedUrl, StorageError> {
        if !self.presign_supported {
            return Err(StorageError::PresignNotSupported);
        }
        self.presigns
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string()));

        Ok(PresignedUrl {
            url: format!("https://storage.test/{key}?signature=abc"),
            method: "PUT".to_string(),
            expires_at: Utc::now() + chrono::Duration::from_std(ttl).unwrap(),
            headers: HashMap::from([("Content-Type".to_string(), content_type.to_string())]),
        })
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.contains(key))
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::operation("connection reset during download"));
        }
        if self.vanish_reads {
            return Err(StorageError::not_found(key));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.deletes.lock().unwrap().push(key.to_string());
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// What the fake renderer answers with.
pub enum FakeResponse {
    Pdf(Vec<u8>),
    Reject(u16, Value),
    Unreachable,
}

/// Renderer that replays a canned response and records every call.
pub struct FakeRenderer {
    response: FakeResponse,
    delay: Option<Duration>,
    calls: Mutex<Vec<RenderRequest>>,
}

impl FakeRenderer {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn pdf() -> Self {
        Self::new(FakeResponse::Pdf(b"%PDF-1.7 fake".to_vec()))
    }

    /// Answer only after `delay` has passed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RenderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for FakeRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Bytes, RenderError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            FakeResponse::Pdf(bytes) => Ok(Bytes::from(bytes.clone())),
            FakeResponse::Reject(status, body) => Err(RenderError::Rejected {
                status: *status,
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("rejected")
                    .to_string(),
                details: Some(body.clone()),
            }),
            FakeResponse::Unreachable => Err(RenderError::transport("connection refused")),
        }
    }
}

/// Proposal store backed by a `HashMap`.
pub struct MemoryProposals {
    records: Mutex<HashMap<Uuid, Option<ProposalConversionStatus>>>,
    writes: Mutex<usize>,
    fail_writes: bool,
}

impl MemoryProposals {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
            fail_writes: false,
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn with_proposal(self, id: Uuid) -> Self {
        self.records.lock().unwrap().insert(id, None);
        self
    }

    pub fn status(&self, id: Uuid) -> Option<ProposalConversionStatus> {
        self.records.lock().unwrap().get(&id).cloned().flatten()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl ProposalStore for MemoryProposals {
    async fn exists(&self, proposal_id: Uuid) -> Result<bool, ProposalStoreError> {
        Ok(self.records.lock().unwrap().contains_key(&proposal_id))
    }

    async fn merge_conversion_status(
        &self,
        proposal_id: Uuid,
        status: ConversionState,
        error: Option<String>,
    ) -> Result<(), ProposalStoreError> {
        *self.writes.lock().unwrap() += 1;
        if self.fail_writes {
            return Err(ProposalStoreError::repository("connection closed"));
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .get_mut(&proposal_id)
            .ok_or(ProposalStoreError::NotFound(proposal_id))?;
        *slot = Some(ProposalConversionStatus {
            status,
            last_attempt_at: Utc::now(),
            error,
        });
        Ok(())
    }

    async fn conversion_status(
        &self,
        proposal_id: Uuid,
    ) -> Result<Option<ProposalConversionStatus>, ProposalStoreError> {
        self.records
            .lock()
            .unwrap()
            .get(&proposal_id)
            .cloned()
            .ok_or(ProposalStoreError::NotFound(proposal_id))
    }
}
