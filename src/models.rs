//! Data models for the company dashboard.
//!
//! This module contains the records read from the backend (companies and
//! their nine satellite detail tables) plus the small shared types the
//! engines hand to the report layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder rendered for any absent field or absent satellite record.
pub const NOT_AVAILABLE: &str = "Not available";

/// Returns the value when it is present and non-empty.
///
/// Both engines treat `None` and `Some("")` the same way.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A company row (the primary entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Stable identifier; the only join key for satellite records.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub employee_size: Option<String>,
    #[serde(default)]
    pub headquarters_address: Option<String>,
    #[serde(default)]
    pub operating_countries: Option<Vec<String>>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub business_model: Option<String>,
    #[serde(default)]
    pub revenue_streams: Option<Vec<String>>,
    #[serde(default)]
    pub target_markets: Option<Vec<String>>,
    #[serde(default)]
    pub competitive_advantages: Option<Vec<String>>,
    #[serde(default)]
    pub strategic_priorities: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologiesRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default)]
    pub development_practices: Option<Vec<String>>,
    #[serde(default)]
    pub infrastructure: Option<Vec<String>>,
    #[serde(default)]
    pub innovation_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub team_size: Option<i64>,
    #[serde(default)]
    pub hiring_managers: Option<Vec<String>>,
    #[serde(default)]
    pub notable_alumni: Option<Vec<String>>,
    /// Free-form nested JSON, rendered pretty-printed.
    #[serde(default)]
    pub leadership_team: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub work_environment: Option<String>,
    #[serde(default)]
    pub core_values: Option<Vec<String>>,
    #[serde(default)]
    pub diversity_initiatives: Option<Vec<String>>,
    /// Out of 5.
    #[serde(default)]
    pub work_life_balance_rating: Option<f64>,
    /// Percentage.
    #[serde(default)]
    pub employee_engagement_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentGrowthRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub career_paths: Option<Vec<String>>,
    #[serde(default)]
    pub training_programs: Option<Vec<String>>,
    #[serde(default)]
    pub mentorship_available: Option<bool>,
    #[serde(default)]
    pub internal_mobility_rate: Option<f64>,
    #[serde(default)]
    pub average_tenure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub salary_range_min: Option<i64>,
    #[serde(default)]
    pub salary_range_max: Option<i64>,
    #[serde(default)]
    pub bonus_structure: Option<String>,
    #[serde(default)]
    pub equity_offered: Option<bool>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub office_locations: Option<Vec<String>>,
    #[serde(default)]
    pub remote_work_policy: Option<String>,
    #[serde(default)]
    pub work_hours: Option<String>,
    #[serde(default)]
    pub travel_requirements: Option<String>,
    #[serde(default)]
    pub relocation_support: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialsRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub revenue_range: Option<String>,
    #[serde(default)]
    pub funding_stage: Option<String>,
    #[serde(default)]
    pub total_funding: Option<String>,
    #[serde(default)]
    pub profitability_status: Option<String>,
    #[serde(default)]
    pub growth_rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandReputationRecord {
    pub id: String,
    pub company_id: String,
    pub created_at: DateTime<Utc>,
    /// Out of 5.
    #[serde(default)]
    pub glassdoor_rating: Option<f64>,
    #[serde(default)]
    pub linkedin_followers: Option<i64>,
    /// Percentage.
    #[serde(default)]
    pub employer_brand_score: Option<f64>,
    #[serde(default)]
    pub awards: Option<Vec<String>>,
    #[serde(default)]
    pub media_mentions: Option<Vec<String>>,
}

/// The nine satellite detail tables, each one-to-one-or-none with a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteKind {
    Business,
    Technologies,
    People,
    Culture,
    TalentGrowth,
    Compensation,
    Logistics,
    Financials,
    BrandReputation,
}

impl SatelliteKind {
    /// Every variant, in tab order.
    pub const ALL: [SatelliteKind; 9] = [
        SatelliteKind::Business,
        SatelliteKind::Technologies,
        SatelliteKind::People,
        SatelliteKind::Culture,
        SatelliteKind::TalentGrowth,
        SatelliteKind::Compensation,
        SatelliteKind::Logistics,
        SatelliteKind::Financials,
        SatelliteKind::BrandReputation,
    ];

    /// Backend table holding this variant.
    pub fn table(&self) -> &'static str {
        match self {
            SatelliteKind::Business => "company_business",
            SatelliteKind::Technologies => "company_technologies",
            SatelliteKind::People => "company_people",
            SatelliteKind::Culture => "company_culture",
            SatelliteKind::TalentGrowth => "company_talent_growth",
            SatelliteKind::Compensation => "company_compensation",
            SatelliteKind::Logistics => "company_logistics",
            SatelliteKind::Financials => "company_financials",
            SatelliteKind::BrandReputation => "company_brand_reputation",
        }
    }

    /// Position in [`SatelliteKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SatelliteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SatelliteKind::Business => write!(f, "Business"),
            SatelliteKind::Technologies => write!(f, "Technology"),
            SatelliteKind::People => write!(f, "People"),
            SatelliteKind::Culture => write!(f, "Culture"),
            SatelliteKind::TalentGrowth => write!(f, "Talent & Growth"),
            SatelliteKind::Compensation => write!(f, "Compensation"),
            SatelliteKind::Logistics => write!(f, "Logistics"),
            SatelliteKind::Financials => write!(f, "Financials"),
            SatelliteKind::BrandReputation => write!(f, "Brand & Reputation"),
        }
    }
}

/// A satellite row of any variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum SatelliteRecord {
    Business(BusinessRecord),
    Technologies(TechnologiesRecord),
    People(PeopleRecord),
    Culture(CultureRecord),
    TalentGrowth(TalentGrowthRecord),
    Compensation(CompensationRecord),
    Logistics(LogisticsRecord),
    Financials(FinancialsRecord),
    BrandReputation(BrandReputationRecord),
}

impl SatelliteRecord {
    /// Decode a raw backend row as the given variant.
    pub fn decode(kind: SatelliteKind, row: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            SatelliteKind::Business => SatelliteRecord::Business(serde_json::from_value(row)?),
            SatelliteKind::Technologies => {
                SatelliteRecord::Technologies(serde_json::from_value(row)?)
            }
            SatelliteKind::People => SatelliteRecord::People(serde_json::from_value(row)?),
            SatelliteKind::Culture => SatelliteRecord::Culture(serde_json::from_value(row)?),
            SatelliteKind::TalentGrowth => {
                SatelliteRecord::TalentGrowth(serde_json::from_value(row)?)
            }
            SatelliteKind::Compensation => {
                SatelliteRecord::Compensation(serde_json::from_value(row)?)
            }
            SatelliteKind::Logistics => SatelliteRecord::Logistics(serde_json::from_value(row)?),
            SatelliteKind::Financials => SatelliteRecord::Financials(serde_json::from_value(row)?),
            SatelliteKind::BrandReputation => {
                SatelliteRecord::BrandReputation(serde_json::from_value(row)?)
            }
        })
    }

    pub fn kind(&self) -> SatelliteKind {
        match self {
            SatelliteRecord::Business(_) => SatelliteKind::Business,
            SatelliteRecord::Technologies(_) => SatelliteKind::Technologies,
            SatelliteRecord::People(_) => SatelliteKind::People,
            SatelliteRecord::Culture(_) => SatelliteKind::Culture,
            SatelliteRecord::TalentGrowth(_) => SatelliteKind::TalentGrowth,
            SatelliteRecord::Compensation(_) => SatelliteKind::Compensation,
            SatelliteRecord::Logistics(_) => SatelliteKind::Logistics,
            SatelliteRecord::Financials(_) => SatelliteKind::Financials,
            SatelliteRecord::BrandReputation(_) => SatelliteKind::BrandReputation,
        }
    }

    /// The owning company's id.
    pub fn company_id(&self) -> &str {
        match self {
            SatelliteRecord::Business(r) => &r.company_id,
            SatelliteRecord::Technologies(r) => &r.company_id,
            SatelliteRecord::People(r) => &r.company_id,
            SatelliteRecord::Culture(r) => &r.company_id,
            SatelliteRecord::TalentGrowth(r) => &r.company_id,
            SatelliteRecord::Compensation(r) => &r.company_id,
            SatelliteRecord::Logistics(r) => &r.company_id,
            SatelliteRecord::Financials(r) => &r.company_id,
            SatelliteRecord::BrandReputation(r) => &r.company_id,
        }
    }
}

/// State of one backend query as seen by a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum QueryState<T> {
    /// Not resolved yet.
    Loading,
    /// Resolved successfully.
    Ready(T),
    /// The fetch failed; holds the error message.
    Failed(String),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Loading
    }
}

impl<T> QueryState<T> {
    /// The resolved value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryState::Failed(_))
    }

    /// Convert a fetch outcome into a state.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }
}

/// A `(label, count)` pair, ready for charts and lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders shared by the unit tests.

    use super::*;
    use chrono::TimeZone;

    pub fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    pub fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            logo_url: None,
            company_type: None,
            category: None,
            employee_size: None,
            headquarters_address: None,
            operating_countries: None,
            website_url: None,
            description: None,
            founded_year: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    pub fn typed(id: &str, name: &str, company_type: Option<&str>, category: Option<&str>) -> Company {
        Company {
            company_type: company_type.map(String::from),
            category: category.map(String::from),
            ..company(id, name)
        }
    }

    pub fn technologies(company_id: &str, stack: &[&str]) -> TechnologiesRecord {
        TechnologiesRecord {
            id: format!("tech-{}", company_id),
            company_id: company_id.to_string(),
            created_at: timestamp(),
            tech_stack: Some(stack.iter().map(|s| s.to_string()).collect()),
            development_practices: None,
            infrastructure: None,
            innovation_areas: None,
        }
    }

    pub fn culture(
        company_id: &str,
        environment: Option<&str>,
        rating: Option<f64>,
    ) -> CultureRecord {
        CultureRecord {
            id: format!("culture-{}", company_id),
            company_id: company_id.to_string(),
            created_at: timestamp(),
            work_environment: environment.map(String::from),
            core_values: None,
            diversity_initiatives: None,
            work_life_balance_rating: rating,
            employee_engagement_score: None,
        }
    }

    pub fn logistics(company_id: &str, policy: Option<&str>) -> LogisticsRecord {
        LogisticsRecord {
            id: format!("logistics-{}", company_id),
            company_id: company_id.to_string(),
            created_at: timestamp(),
            office_locations: None,
            remote_work_policy: policy.map(String::from),
            work_hours: None,
            travel_requirements: None,
            relocation_support: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_company_deserializes_backend_row() {
        let row = json!({
            "id": "c1",
            "name": "Acme Corp",
            "logo_url": null,
            "company_type": "Startup",
            "category": "Fintech",
            "employee_size": "11-50",
            "headquarters_address": null,
            "operating_countries": ["India", "Singapore"],
            "website_url": "https://acme.example",
            "description": null,
            "founded_year": 2019,
            "created_at": "2024-01-15T10:30:00.123456+00:00",
            "updated_at": "2024-01-15T10:30:00+00:00"
        });

        let company: Company = serde_json::from_value(row).unwrap();
        assert_eq!(company.name, "Acme Corp");
        assert_eq!(company.company_type.as_deref(), Some("Startup"));
        assert_eq!(company.founded_year, Some(2019));
        assert_eq!(company.operating_countries.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_optional_columns_default_to_none() {
        let row = json!({
            "id": "c1",
            "name": "Acme Corp",
            "created_at": "2024-01-15T10:30:00Z",
            "updated_at": "2024-01-15T10:30:00Z"
        });

        let company: Company = serde_json::from_value(row).unwrap();
        assert!(company.category.is_none());
        assert!(company.operating_countries.is_none());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("Startup".to_string())), Some("Startup"));
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
    }

    #[test]
    fn test_satellite_kind_tables_are_distinct() {
        let mut tables: Vec<_> = SatelliteKind::ALL.iter().map(|k| k.table()).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), 9);
        assert_eq!(SatelliteKind::Culture.table(), "company_culture");
    }

    #[test]
    fn test_satellite_kind_index_matches_all() {
        for (i, kind) in SatelliteKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_satellite_record_decode() {
        let row = json!({
            "id": "s1",
            "company_id": "c1",
            "created_at": "2024-01-15T10:30:00Z",
            "work_environment": "Hybrid",
            "work_life_balance_rating": 4.5
        });

        let record = SatelliteRecord::decode(SatelliteKind::Culture, row).unwrap();
        assert_eq!(record.kind(), SatelliteKind::Culture);
        assert_eq!(record.company_id(), "c1");
        match record {
            SatelliteRecord::Culture(c) => {
                assert_eq!(c.work_life_balance_rating, Some(4.5));
                assert!(c.core_values.is_none());
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_satellite_record_decode_wrong_shape() {
        let row = json!({ "id": "s1" });
        assert!(SatelliteRecord::decode(SatelliteKind::Business, row).is_err());
    }

    #[test]
    fn test_query_state() {
        let loading: QueryState<u8> = QueryState::default();
        assert!(loading.is_loading());
        assert_eq!(loading.ready(), None);

        let ready: QueryState<u8> = QueryState::from_result::<String>(Ok(3));
        assert_eq!(ready.ready(), Some(&3));

        let failed: QueryState<u8> = QueryState::from_result(Err("boom"));
        assert!(failed.is_failed());
    }
}
