//! Site details carried by each job.

use super::JobDomainError;
use serde::{Deserialize, Serialize};

/// Where the work happens and how to get in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDetails {
    site_name: String,
    address: Option<String>,
    area: Option<String>,
    gate_code: Option<String>,
    contact: Option<String>,
    map_link: Option<String>,
}

impl SiteDetails {
    /// Creates site details with the required site name.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptySiteName`] when the trimmed name is
    /// empty.
    pub fn new(site_name: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = site_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JobDomainError::EmptySiteName);
        }
        Ok(Self {
            site_name: trimmed.to_owned(),
            address: None,
            area: None,
            gate_code: None,
            contact: None,
            map_link: None,
        })
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = non_blank(address);
        self
    }

    /// Sets the area description (for example square metres or zones).
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = non_blank(area);
        self
    }

    /// Sets the gate code.
    #[must_use]
    pub fn with_gate_code(mut self, gate_code: impl Into<String>) -> Self {
        self.gate_code = non_blank(gate_code);
        self
    }

    /// Sets the on-site contact.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = non_blank(contact);
        self
    }

    /// Sets the map link.
    #[must_use]
    pub fn with_map_link(mut self, map_link: impl Into<String>) -> Self {
        self.map_link = non_blank(map_link);
        self
    }

    /// Returns the site name.
    #[must_use]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Returns the street address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the area description, if any.
    #[must_use]
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    /// Returns the gate code, if any.
    #[must_use]
    pub fn gate_code(&self) -> Option<&str> {
        self.gate_code.as_deref()
    }

    /// Returns the on-site contact, if any.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    /// Returns the map link, if any.
    #[must_use]
    pub fn map_link(&self) -> Option<&str> {
        self.map_link.as_deref()
    }
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let raw = value.into();
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
