//! Occurrence bounds for bound fields
//!
//! Cardinality constraints (minOccurs, maxOccurs) carried by the field
//! metadata tables.

/// Occurrence bounds for a field (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    ///
    /// When a maximum is given it must not be below the minimum.
    pub fn new(min: u32, max: Option<u32>) -> Self {
        debug_assert!(max.map_or(true, |m| min <= m));
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Prohibited (0, 0)
    pub fn prohibited() -> Self {
        Self { min: 0, max: Some(0) }
    }

    /// Check if this field can be absent (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if this field has maxOccurs == 1
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }

    /// Check if occurrence count is under the minimum
    pub fn is_missing(&self, count: u32) -> bool {
        count < self.min
    }

    /// Check if occurrence count exceeds the maximum
    pub fn is_exceeded(&self, count: u32) -> bool {
        match self.max {
            Some(max) => count > max,
            None => false,
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}
