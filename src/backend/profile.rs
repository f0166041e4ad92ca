//! Company detail loading: one fan-out query per satellite variant.
//!
//! All nine reads are issued at once and applied to the [`ProfileView`] as
//! each one resolves. Responses are keyed by company id; a response for any
//! other company than the one being displayed is dropped.

use crate::backend::cache::QueryCache;
use crate::backend::client::FetchError;
use crate::models::{Company, QueryState, SatelliteKind, SatelliteRecord};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of one satellite read.
#[derive(Debug)]
pub struct SatelliteResponse {
    pub company_id: String,
    pub kind: SatelliteKind,
    pub result: Result<Option<SatelliteRecord>, FetchError>,
}

/// One satellite variant and where its read stands.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteSlot {
    pub kind: SatelliteKind,
    /// `Ready(None)` means the company has no row of this variant.
    pub state: QueryState<Option<SatelliteRecord>>,
}

impl SatelliteSlot {
    pub fn record(&self) -> Option<&SatelliteRecord> {
        self.state.ready().and_then(Option::as_ref)
    }
}

/// Detail tabs. Compensation and financials each combine two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Business,
    Technology,
    People,
    Culture,
    Talent,
    Compensation,
    Financials,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 7] = [
        ProfileTab::Business,
        ProfileTab::Technology,
        ProfileTab::People,
        ProfileTab::Culture,
        ProfileTab::Talent,
        ProfileTab::Compensation,
        ProfileTab::Financials,
    ];

    pub fn kinds(&self) -> &'static [SatelliteKind] {
        match self {
            ProfileTab::Business => &[SatelliteKind::Business],
            ProfileTab::Technology => &[SatelliteKind::Technologies],
            ProfileTab::People => &[SatelliteKind::People],
            ProfileTab::Culture => &[SatelliteKind::Culture],
            ProfileTab::Talent => &[SatelliteKind::TalentGrowth],
            ProfileTab::Compensation => &[SatelliteKind::Compensation, SatelliteKind::Logistics],
            ProfileTab::Financials => &[SatelliteKind::Financials, SatelliteKind::BrandReputation],
        }
    }
}

impl fmt::Display for ProfileTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileTab::Business => write!(f, "Business"),
            ProfileTab::Technology => write!(f, "Technology"),
            ProfileTab::People => write!(f, "People"),
            ProfileTab::Culture => write!(f, "Culture"),
            ProfileTab::Talent => write!(f, "Talent & Growth"),
            ProfileTab::Compensation => write!(f, "Compensation & Logistics"),
            ProfileTab::Financials => write!(f, "Financials & Brand"),
        }
    }
}

/// What a tab should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabState {
    Loading,
    /// Every record in the tab is absent.
    Empty,
    Populated,
    Failed(String),
}

/// Detail view state for one company.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    company_id: String,
    pub company: QueryState<Option<Company>>,
    slots: Vec<SatelliteSlot>,
}

impl ProfileView {
    /// A view with every read still pending.
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            company: QueryState::Loading,
            slots: SatelliteKind::ALL
                .iter()
                .map(|&kind| SatelliteSlot {
                    kind,
                    state: QueryState::Loading,
                })
                .collect(),
        }
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn slot(&self, kind: SatelliteKind) -> &SatelliteSlot {
        &self.slots[kind.index()]
    }

    pub fn slots(&self) -> &[SatelliteSlot] {
        &self.slots
    }

    /// Apply a response if it belongs to this company. Returns whether it was applied.
    pub fn apply(&mut self, response: SatelliteResponse) -> bool {
        if response.company_id != self.company_id {
            debug!(
                "Dropping stale {} response for {} (showing {})",
                response.kind, response.company_id, self.company_id
            );
            return false;
        }

        let state = match response.result {
            Ok(Some(ref record))
                if record.company_id() != self.company_id || record.kind() != response.kind =>
            {
                QueryState::Failed(format!(
                    "{} query returned a {} row owned by {}",
                    response.kind,
                    record.kind(),
                    record.company_id()
                ))
            }
            result => QueryState::from_result(result),
        };
        if let QueryState::Failed(ref message) = state {
            warn!("{} fetch failed: {}", response.kind, message);
        }

        self.slots[response.kind.index()].state = state;
        true
    }

    pub fn tab_state(&self, tab: ProfileTab) -> TabState {
        let slots: Vec<&SatelliteSlot> = tab.kinds().iter().map(|&k| self.slot(k)).collect();

        if slots.iter().any(|s| s.record().is_some()) {
            return TabState::Populated;
        }

        if let Some(message) = slots.iter().find_map(|s| match &s.state {
            QueryState::Failed(message) => Some(message.clone()),
            _ => None,
        }) {
            return TabState::Failed(message);
        }

        if slots.iter().any(|s| s.state.is_loading()) {
            TabState::Loading
        } else {
            TabState::Empty
        }
    }

    /// Whether every satellite read has resolved.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|s| !s.state.is_loading())
    }
}

/// Fetch all nine satellites for the view's company, applying each as it arrives.
///
/// `on_ready` runs after every applied response so callers can render that
/// variant without waiting for the rest.
pub async fn load_profile<F>(cache: &QueryCache, view: &mut ProfileView, mut on_ready: F)
where
    F: FnMut(&ProfileView, SatelliteKind),
{
    let company_id = view.company_id().to_string();

    let mut pending: FuturesUnordered<_> = SatelliteKind::ALL
        .iter()
        .map(|&kind| {
            let company_id = company_id.clone();
            async move {
                let result = cache.get_satellite(kind, &company_id).await;
                SatelliteResponse {
                    company_id,
                    kind,
                    result,
                }
            }
        })
        .collect();

    while let Some(response) = pending.next().await {
        let kind = response.kind;
        if view.apply(response) {
            on_ready(&*view, kind);
        }
    }
}
