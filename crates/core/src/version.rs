//! Optimistic concurrency primitives for stored documents.
//!
//! Every document carries a monotonically increasing version assigned by the
//! store (an etag, effectively). Writes state an expectation against the
//! current version; a failed expectation surfaces as a `Conflict` so two
//! principals mutating the same record (e.g. two developers reviewing the
//! same company) cannot silently overwrite each other.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Version expectation for a document write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (blind write; use sparingly).
    Any,
    /// Require the document to be at an exact version.
    ///
    /// `Exact(0)` means "must not exist yet": fresh documents are stored at
    /// version 1, so 0 is only observable for absent documents.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// A document together with its store-assigned version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub record: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(record: T, version: u64) -> Self {
        Self { record, version }
    }

    /// Expectation that pins a subsequent write to this exact revision.
    pub fn expected(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.version)
    }

    pub fn into_record(self) -> T {
        self.record
    }
}
