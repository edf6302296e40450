//! The ordered, duplicate-free list of sources to poll.
//!
//! A source's position in the registry is the join key used by the worker
//! pool, the result index and the run output file.  Positions never change
//! once assigned: the registry only grows.

use serde::Serialize;

use crate::error::RegistryError;

/// Display names and addresses in two parallel sequences.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceRegistry {
    #[serde(rename = "links")]
    addresses: Vec<String>,
    #[serde(rename = "names")]
    names: Vec<String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source and return its position.
    ///
    /// Addresses are compared exactly (case-sensitive).
    pub fn add(
        &mut self,
        display_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<usize, RegistryError> {
        let address = address.into();
        if address.is_empty() {
            return Err(RegistryError::EmptyAddress);
        }
        if self.addresses.contains(&address) {
            return Err(RegistryError::DuplicateAddress(address));
        }

        self.addresses.push(address);
        self.names.push(display_name.into());
        Ok(self.addresses.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn address(&self, position: usize) -> Option<&str> {
        self.addresses.get(position).map(String::as_str)
    }

    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// `(position, display_name, address)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.names
            .iter()
            .zip(&self.addresses)
            .enumerate()
            .map(|(i, (name, address))| (i, name.as_str(), address.as_str()))
    }
}
