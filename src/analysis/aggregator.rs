//! Grouped counts, tag frequencies and averages over company data.
//!
//! Every function here is total: empty or not-yet-loaded input yields
//! empty sequences and zero-valued summaries, never an error.

use crate::models::{
    non_empty, Company, CultureRecord, LabelCount, LogisticsRecord, TechnologiesRecord,
};
use serde::Serialize;
use std::collections::HashMap;

/// Group label for companies without a type or category.
pub const UNSPECIFIED: &str = "Unspecified";

/// Group label for logistics rows without a remote work policy.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Number of entries kept by [`top_tags`].
pub const TOP_TAGS: usize = 10;

/// Output ordering for [`group_and_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Order in which each label was first seen.
    Discovery,
    /// Highest count first; ties keep discovery order.
    CountDescending,
}

/// Count labels in first-seen order.
fn tally<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for label in labels {
        match index.get(label) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(label, counts.len());
                counts.push(LabelCount::new(label, 1));
            }
        }
    }

    counts
}

/// Sort by count, highest first. `sort_by_key` is stable so ties keep input order.
fn sort_by_count(counts: &mut [LabelCount]) {
    counts.sort_by_key(|c| std::cmp::Reverse(c.count));
}

/// Group records by a categorical field, substituting `sentinel` when the field is absent.
///
/// The counts partition the input: they always sum to `records.len()`.
pub fn group_and_count<T, F>(
    records: &[T],
    key: F,
    sentinel: &str,
    order: GroupOrder,
) -> Vec<LabelCount>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut counts = tally(records.iter().map(|r| key(r).unwrap_or(sentinel)));

    if order == GroupOrder::CountDescending {
        sort_by_count(&mut counts);
    }

    counts
}

/// Count the distinct values of a field in first-seen order, skipping absent values.
pub fn tally_present<T, F>(records: &[T], key: F) -> Vec<LabelCount>
where
    F: Fn(&T) -> Option<&str>,
{
    tally(records.iter().filter_map(|r| key(r)))
}

/// The [`TOP_TAGS`] most frequent values across an array field.
///
/// Every occurrence counts, including a tag repeated within one record.
pub fn top_tags<T, F>(records: &[T], tags: F) -> Vec<LabelCount>
where
    F: Fn(&T) -> Option<&[String]>,
{
    let mut counts = tally(
        records
            .iter()
            .filter_map(|r| tags(r))
            .flat_map(|values| values.iter().map(String::as_str)),
    );

    sort_by_count(&mut counts);
    counts.truncate(TOP_TAGS);
    counts
}

/// Arithmetic mean over the records where the field is present; 0 when there are none.
pub fn average_present<T, F>(records: &[T], value: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    let (sum, n) = records
        .iter()
        .filter_map(|r| value(r))
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Whole-number percentage of `count` in `total`; 0 when `total` is 0.
pub fn share_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    /// Companies by type, in discovery order.
    pub by_type: Vec<LabelCount>,
    /// Companies by category, in discovery order.
    pub by_category: Vec<LabelCount>,
    /// Leading rows of the newest-first listing.
    pub recent: Vec<Company>,
}

impl DashboardStats {
    /// Build from the company listing; `None` (not loaded yet) renders as empty.
    pub fn from_companies(companies: Option<&[Company]>, recent_limit: usize) -> Self {
        let companies = companies.unwrap_or_default();

        Self {
            total: companies.len(),
            by_type: group_and_count(
                companies,
                |c| non_empty(&c.company_type),
                UNSPECIFIED,
                GroupOrder::Discovery,
            ),
            by_category: group_and_count(
                companies,
                |c| non_empty(&c.category),
                UNSPECIFIED,
                GroupOrder::Discovery,
            ),
            recent: companies.iter().take(recent_limit).cloned().collect(),
        }
    }
}

/// Culture summary across all companies.
#[derive(Debug, Clone, Serialize)]
pub struct CultureIndicators {
    pub average_work_life_balance: f64,
    /// Absent environments are skipped, not grouped under a sentinel.
    pub work_environments: Vec<LabelCount>,
}

impl CultureIndicators {
    /// Average formatted to one decimal place.
    pub fn formatted_average(&self) -> String {
        format!("{:.1}", self.average_work_life_balance)
    }
}

/// Cross-company analytics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsView {
    /// Companies by type, highest count first.
    pub company_distribution: Vec<LabelCount>,
    pub tech_stack_frequency: Vec<LabelCount>,
    /// Logistics rows by remote work policy, in discovery order.
    pub remote_policy: Vec<LabelCount>,
    /// `None` when no culture rows exist.
    pub culture: Option<CultureIndicators>,
}

impl AnalyticsView {
    /// Build each section independently; any collection may still be unavailable.
    pub fn build(
        companies: Option<&[Company]>,
        technologies: Option<&[TechnologiesRecord]>,
        logistics: Option<&[LogisticsRecord]>,
        cultures: Option<&[CultureRecord]>,
    ) -> Self {
        let companies = companies.unwrap_or_default();
        let technologies = technologies.unwrap_or_default();
        let logistics = logistics.unwrap_or_default();

        let culture = match cultures {
            Some(rows) if !rows.is_empty() => Some(CultureIndicators {
                average_work_life_balance: average_present(rows, |c| c.work_life_balance_rating),
                work_environments: tally_present(rows, |c| non_empty(&c.work_environment)),
            }),
            _ => None,
        };

        Self {
            company_distribution: group_and_count(
                companies,
                |c| non_empty(&c.company_type),
                UNSPECIFIED,
                GroupOrder::CountDescending,
            ),
            tech_stack_frequency: top_tags(technologies, |t| t.tech_stack.as_deref()),
            remote_policy: group_and_count(
                logistics,
                |l| non_empty(&l.remote_work_policy),
                NOT_SPECIFIED,
                GroupOrder::Discovery,
            ),
            culture,
        }
    }
}
