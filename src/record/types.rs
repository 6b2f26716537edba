//! Record trait and the map-backed implementation.

use crate::dimension::DimScalar;
use std::collections::HashMap;

/// A routable unit of business data.
///
/// The engine probes records by field name for every dimension the
/// registry declares; a record that cannot produce a required field
/// surfaces a missing-field error rather than silently not matching.
///
/// # Implementing
///
/// ```
/// use u_dispatch::dimension::DimScalar;
/// use u_dispatch::record::Record;
///
/// struct ModelPoint {
///     policy_id: String,
///     ceding_company: String,
///     uw_year: i64,
/// }
///
/// impl Record for ModelPoint {
///     fn field(&self, name: &str) -> Option<DimScalar> {
///         match name {
///             "ceding_company" => Some(DimScalar::Str(self.ceding_company.clone())),
///             "uw_year" => Some(DimScalar::Int(self.uw_year)),
///             _ => None,
///         }
///     }
///
///     fn id(&self) -> String {
///         self.policy_id.clone()
///     }
/// }
/// ```
pub trait Record {
    /// Looks up the value backing `name`, or `None` if the record does
    /// not expose such a field.
    fn field(&self, name: &str) -> Option<DimScalar>;

    /// Identity of this record, used only in error reporting.
    fn id(&self) -> String;
}

/// A record backed by a field-name → value map.
///
/// # Examples
///
/// ```
/// use u_dispatch::dimension::DimScalar;
/// use u_dispatch::record::{MapRecord, Record};
///
/// let record = MapRecord::new("mp-001")
///     .with_field("ceding_company", "axa")
///     .with_field("risk_class", "death")
///     .with_field("uw_year", 2023);
///
/// assert_eq!(record.field("uw_year"), Some(DimScalar::Int(2023)));
/// assert_eq!(record.field("product"), None);
/// assert_eq!(record.id(), "mp-001");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRecord {
    id: String,
    fields: HashMap<String, DimScalar>,
}

impl MapRecord {
    /// Creates an empty record with the given identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds (or replaces) a field value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<DimScalar>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for MapRecord {
    fn field(&self, name: &str) -> Option<DimScalar> {
        self.fields.get(name).cloned()
    }

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let record = MapRecord::new("mp-1")
            .with_field("ceding_company", "axa")
            .with_field("uw_year", 2023);

        assert_eq!(
            record.field("ceding_company"),
            Some(DimScalar::Str("axa".into()))
        );
        assert_eq!(record.field("uw_year"), Some(DimScalar::Int(2023)));
        assert_eq!(record.field("absent"), None);
    }

    #[test]
    fn test_with_field_replaces() {
        let record = MapRecord::new("mp-1")
            .with_field("uw_year", 2022)
            .with_field("uw_year", 2023);

        assert_eq!(record.field("uw_year"), Some(DimScalar::Int(2023)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_identity() {
        let record = MapRecord::new("mp-42");
        assert_eq!(record.id(), "mp-42");
        assert!(record.is_empty());
    }
}
