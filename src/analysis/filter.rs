//! Free-text search, categorical filters and facet options for the company list.

use crate::analysis::aggregator::tally_present;
use crate::models::{non_empty, Company, LabelCount};
use serde::Serialize;

/// Predicate state for the company list.
///
/// `None` for a facet means "All". That is not the same as selecting an
/// empty string, which only matches companies whose field is exactly `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyFilter {
    /// Free-text query; empty means no search. Whitespace is not trimmed.
    pub query: String,
    pub selected_type: Option<String>,
    pub selected_category: Option<String>,
}

impl CompanyFilter {
    pub fn new(
        query: impl Into<String>,
        selected_type: Option<String>,
        selected_category: Option<String>,
    ) -> Self {
        Self {
            query: query.into(),
            selected_type,
            selected_category,
        }
    }

    /// Whether a company passes every active predicate.
    pub fn matches(&self, company: &Company) -> bool {
        if !self.query.is_empty() && !Self::matches_query(company, &self.query.to_lowercase()) {
            return false;
        }

        if let Some(ref wanted) = self.selected_type {
            if company.company_type.as_ref() != Some(wanted) {
                return false;
            }
        }

        if let Some(ref wanted) = self.selected_category {
            if company.category.as_ref() != Some(wanted) {
                return false;
            }
        }

        true
    }

    /// Case-insensitive substring match against name, type or category.
    fn matches_query(company: &Company, needle: &str) -> bool {
        let contains = |field: Option<&str>| {
            field
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false)
        };

        contains(Some(&company.name))
            || contains(company.company_type.as_deref())
            || contains(company.category.as_deref())
    }

    /// The matching companies, in input order.
    pub fn apply<'a>(&self, companies: &'a [Company]) -> Vec<&'a Company> {
        companies.iter().filter(|c| self.matches(c)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.selected_type.is_some() || self.selected_category.is_some()
    }
}

/// Selectable options for the type and category filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub types: Vec<LabelCount>,
    pub categories: Vec<LabelCount>,
}

impl FacetOptions {
    /// Options in first-seen order. Absent or empty values never become an option.
    pub fn from_companies(companies: &[Company]) -> Self {
        Self {
            types: tally_present(companies, |c| non_empty(&c.company_type)),
            categories: tally_present(companies, |c| non_empty(&c.category)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.categories.is_empty()
    }
}

/// Everything the company list needs to render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterView {
    pub filter: CompanyFilter,
    pub facets: FacetOptions,
    pub companies: Vec<Company>,
    pub total: usize,
}

impl FilterView {
    /// Build from the listing; `None` (not loaded yet) renders as empty.
    pub fn build(companies: Option<&[Company]>, filter: CompanyFilter) -> Self {
        let companies = companies.unwrap_or_default();

        Self {
            facets: FacetOptions::from_companies(companies),
            companies: filter.apply(companies).into_iter().cloned().collect(),
            total: companies.len(),
            filter,
        }
    }

    /// Number of companies after filtering.
    pub fn shown(&self) -> usize {
        self.companies.len()
    }
}
