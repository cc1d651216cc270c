//! Limits for XML document processing
//!
//! This module defines limits to prevent resource exhaustion when
//! parsing untrusted CDA fragments (deeply nested narrative tables,
//! oversized encapsulated data and the like).

use crate::error::{Error, Result};

/// Parse limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum document size in bytes
    pub max_size: usize,

    /// Maximum number of attributes per element
    pub max_attributes: usize,

    /// Maximum number of namespace declarations per element
    pub max_namespaces: usize,

    /// Maximum length of a single text node in bytes
    pub max_text_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_size: 100 * 1024 * 1024, // 100 MB
            max_attributes: 256,
            max_namespaces: 64,
            max_text_len: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            max_size: 10 * 1024 * 1024, // 10 MB
            max_attributes: 64,
            max_namespaces: 16,
            max_text_len: 1024 * 1024, // 1 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_depth: 4096,
            max_size: 1024 * 1024 * 1024, // 1 GB
            max_attributes: 4096,
            max_namespaces: 1024,
            max_text_len: 256 * 1024 * 1024, // 256 MB
        }
    }

    /// Check if element nesting depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "element depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if document size is within limits
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        if count > self.max_attributes {
            Err(Error::LimitExceeded(format!(
                "attribute count {} exceeds maximum {}",
                count, self.max_attributes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of namespace declarations is within limits
    pub fn check_namespaces(&self, count: usize) -> Result<()> {
        if count > self.max_namespaces {
            Err(Error::LimitExceeded(format!(
                "namespace count {} exceeds maximum {}",
                count, self.max_namespaces
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a text node length is within limits
    pub fn check_text_len(&self, len: usize) -> Result<()> {
        if len > self.max_text_len {
            Err(Error::LimitExceeded(format!(
                "text node length {} bytes exceeds maximum {} bytes",
                len, self.max_text_len
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth, 256);
        assert!(limits.check_depth(100).is_ok());
        assert!(limits.check_depth(1000).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_depth < Limits::default().max_depth);
        assert!(limits.check_depth(100).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_depth > Limits::default().max_depth);
        assert!(limits.check_depth(1000).is_ok());
    }

    #[test]
    fn test_check_size() {
        let limits = Limits::default();
        assert!(limits.check_size(1024).is_ok());
        assert!(limits.check_size(200 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_check_text_len() {
        let limits = Limits::strict();
        assert!(limits.check_text_len(1024).is_ok());
        assert!(limits.check_text_len(2 * 1024 * 1024).is_err());
    }
}
