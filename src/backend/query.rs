//! Query keys: which table to read and with which filters.

use crate::models::SatelliteKind;
use std::fmt;

/// Table holding the primary company rows.
pub const COMPANIES_TABLE: &str = "companies";

/// One logical backend read. Also the cache key for its result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// All companies, newest first.
    Companies,
    /// A single company by id.
    Company(String),
    /// The satellite row of one variant for one company.
    Satellite(SatelliteKind, String),
    /// Every row of a satellite table, across all companies.
    Collection(SatelliteKind),
}

impl QueryKey {
    pub fn table(&self) -> &'static str {
        match self {
            QueryKey::Companies | QueryKey::Company(_) => COMPANIES_TABLE,
            QueryKey::Satellite(kind, _) | QueryKey::Collection(kind) => kind.table(),
        }
    }

    /// PostgREST query parameters for this read.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", "*".to_string())];

        match self {
            QueryKey::Companies => params.push(("order", "created_at.desc".to_string())),
            QueryKey::Company(id) => params.push(("id", format!("eq.{}", id))),
            QueryKey::Satellite(_, company_id) => {
                params.push(("company_id", format!("eq.{}", company_id)))
            }
            QueryKey::Collection(_) => {}
        }

        params
    }

    /// Whether the read expects at most one row.
    pub fn is_single(&self) -> bool {
        matches!(self, QueryKey::Company(_) | QueryKey::Satellite(..))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Companies => write!(f, "[\"companies\"]"),
            QueryKey::Company(id) => write!(f, "[\"company\", \"{}\"]", id),
            QueryKey::Satellite(kind, id) => write!(f, "[\"{}\", \"{}\"]", kind.table(), id),
            QueryKey::Collection(kind) => write!(f, "[\"all_{}\"]", kind.table()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companies_params_order_newest_first() {
        let params = QueryKey::Companies.params();
        assert!(params.contains(&("select", "*".to_string())));
        assert!(params.contains(&("order", "created_at.desc".to_string())));
    }

    #[test]
    fn test_satellite_key() {
        let key = QueryKey::Satellite(SatelliteKind::Culture, "c1".to_string());

        assert_eq!(key.table(), "company_culture");
        assert!(key.params().contains(&("company_id", "eq.c1".to_string())));
        assert!(key.is_single());
        assert_eq!(key.to_string(), "[\"company_culture\", \"c1\"]");
    }

    #[test]
    fn test_collection_key_has_no_filter() {
        let key = QueryKey::Collection(SatelliteKind::Technologies);

        assert_eq!(key.table(), "company_technologies");
        assert_eq!(key.params().len(), 1);
        assert!(!key.is_single());
    }

    #[test]
    fn test_keys_differ_by_company() {
        let a = QueryKey::Satellite(SatelliteKind::People, "a".to_string());
        let b = QueryKey::Satellite(SatelliteKind::People, "b".to_string());
        assert_ne!(a, b);
    }
}
