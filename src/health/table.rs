//! Per-service host health table.
//!
//! # Responsibilities
//! - Store one status code per host
//! - Preserve insertion order (it is the rotation order)
//! - Produce the healthy candidate list for selection
//!
//! Hosts are kept in a `Vec` and scanned linearly. Services carry a handful
//! of hosts, so ordering matters more than lookup cost here.

use crate::health::state::{validate_status, HealthError, HostHealth, HEALTHY_STATUS};

#[derive(Debug, Clone, PartialEq, Eq)]
struct HostEntry {
    host: String,
    status: u16,
}

/// Insertion-ordered map of host identifier to reported status code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostHealthTable {
    entries: Vec<HostEntry>,
}

impl HostHealthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table where every host starts healthy.
    /// Repeated identifiers collapse onto their first position.
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for host in hosts {
            table.add_host(host);
        }
        table
    }

    /// Insert or overwrite the status for `host`.
    ///
    /// New hosts are appended; existing hosts keep their position.
    pub fn set_health(&mut self, host: impl Into<String>, status: i64) -> Result<(), HealthError> {
        let status = validate_status(status)?;
        self.upsert(host.into(), status);
        Ok(())
    }

    /// Add a host as healthy. Re-adding an existing host resets it to healthy.
    pub fn add_host(&mut self, host: impl Into<String>) {
        self.upsert(host.into(), HEALTHY_STATUS);
    }

    /// Remove a host from the table.
    pub fn remove_host(&mut self, host: &str) -> Result<(), HealthError> {
        match self.position(host) {
            Some(index) => {
                self.entries.remove(index);
                Ok(())
            }
            None => Err(HealthError::UnknownHost(host.to_string())),
        }
    }

    /// Remove every host.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, host: &str) -> bool {
        self.position(host).is_some()
    }

    /// Stored status code for `host`, if known.
    pub fn status(&self, host: &str) -> Option<u16> {
        self.position(host).map(|index| self.entries[index].status)
    }

    /// True iff the stored status is exactly 200.
    pub fn is_healthy(&self, host: &str) -> bool {
        self.status(host) == Some(HEALTHY_STATUS)
    }

    /// Every host with its health, in insertion order.
    pub fn snapshot(&self) -> Vec<(String, HostHealth)> {
        self.entries
            .iter()
            .map(|e| (e.host.clone(), HostHealth::from_status(e.status)))
            .collect()
    }

    /// Healthy hosts in insertion order.
    pub fn healthy_hosts(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == HEALTHY_STATUS)
            .map(|e| e.host.as_str())
            .collect()
    }

    /// All host identifiers in insertion order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.host.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, host: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.host == host)
    }

    fn upsert(&mut self, host: String, status: u16) {
        match self.position(&host) {
            Some(index) => self.entries[index].status = status,
            None => self.entries.push(HostEntry { host, status }),
        }
    }
}
