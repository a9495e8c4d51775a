//! Host selection and the read-only query facade.

use super::record::MetricRecord;
use super::shared::SharedDataset;

/// Number of hosts preselected when a dataset is first loaded.
pub const DEFAULT_SELECTION: usize = 5;

/// An ordered, duplicate-free set of selected host names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSelection {
    hosts: Vec<String>,
}

impl HostSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the first `n` hosts of `available`.
    pub fn first_n(available: &[String], n: usize) -> Self {
        Self {
            hosts: available.iter().take(n).cloned().collect(),
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    /// Add or remove a host. Returns `true` if the host is now selected.
    pub fn toggle(&mut self, host: &str) -> bool {
        if let Some(pos) = self.hosts.iter().position(|h| h == host) {
            self.hosts.remove(pos);
            false
        } else {
            self.hosts.push(host.to_string());
            true
        }
    }

    pub fn select_all(&mut self, available: &[String]) {
        self.hosts = available.to_vec();
    }

    pub fn clear(&mut self) {
        self.hosts.clear();
    }

    /// Drop selected hosts that are no longer in `available`.
    pub fn retain_known(&mut self, available: &[String]) {
        self.hosts.retain(|h| available.contains(h));
    }
}

impl SharedDataset {
    /// Records for the hosts in `selection`.
    ///
    /// Read-only; calling it repeatedly with different selections never
    /// changes the dataset.
    pub fn for_hosts(&self, selection: &HostSelection) -> Vec<MetricRecord> {
        self.filter(selection.hosts())
    }
}
