//! Markdown report generation.
//!
//! Turns the view-models produced by the engines into Markdown, one
//! section per panel. Absent values render as "Not available"; a panel
//! with nothing to show renders its empty state instead.

use crate::analysis::aggregator::share_percent;
use crate::analysis::{DashboardStats, FilterView};
use crate::backend::{ProfileTab, ProfileView, TabState};
use crate::config::ReportConfig;
use crate::models::{non_empty, Company, LabelCount, QueryState, SatelliteRecord, NOT_AVAILABLE};
use crate::report::{AnalyticsReport, AnalyticsSection, Report, ReportMetadata, ViewReport};
use anyhow::Result;
use serde_json::Value;

const NO_DATA: &str = "No data available";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# orgscope Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    match &report.view {
        ViewReport::Dashboard(stats) => output.push_str(&generate_dashboard(stats, config)),
        ViewReport::Analytics(analytics) => {
            output.push_str(&generate_analytics(analytics, config))
        }
        ViewReport::Companies(view) => output.push_str(&generate_company_list(view, config)),
        ViewReport::Company(view) => output.push_str(&generate_company_profile(view, config)),
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Backend:** {}\n", metadata.backend_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Duration:** {:.1}s\n", metadata.duration_seconds));
    section.push('\n');

    section
}

/// Escape a value for use inside a table cell.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// `Label | Count` table, optionally with each row's share of `total`.
fn count_table(heading: &str, counts: &[LabelCount], total: Option<usize>) -> String {
    let mut table = String::new();

    match total {
        Some(_) => {
            table.push_str(&format!("| {} | Count | Share |\n", heading));
            table.push_str("|:---|:---:|:---:|\n");
        }
        None => {
            table.push_str(&format!("| {} | Count |\n", heading));
            table.push_str("|:---|:---:|\n");
        }
    }

    for entry in counts {
        match total {
            Some(total) => table.push_str(&format!(
                "| {} | {} | {}% |\n",
                cell(&entry.label),
                entry.count,
                share_percent(entry.count, total)
            )),
            None => table.push_str(&format!("| {} | {} |\n", cell(&entry.label), entry.count)),
        }
    }
    table.push('\n');

    table
}

/// Heading plus either `body` or the empty state. Empty when empty sections are omitted.
fn panel(title: &str, body: Option<String>, empty: &str, config: &ReportConfig) -> String {
    match body {
        Some(body) => format!("### {}\n\n{}", title, body),
        None if config.include_empty_sections => {
            format!("### {}\n\n*{}.* {}\n\n", title, NO_DATA, empty)
        }
        None => String::new(),
    }
}

fn generate_dashboard(stats: &DashboardStats, config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## Dashboard\n\n");
    section.push_str("| Total Companies | Company Types | Categories | Recently Added |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        stats.total,
        stats.by_type.len(),
        stats.by_category.len(),
        stats.recent.len()
    ));

    section.push_str(&panel(
        "Companies by Type",
        (!stats.by_type.is_empty()).then(|| count_table("Type", &stats.by_type, None)),
        "Companies will appear here once added.",
        config,
    ));

    section.push_str(&panel(
        "Companies by Category",
        (!stats.by_category.is_empty()).then(|| count_table("Category", &stats.by_category, None)),
        "Categories will appear here once companies are added.",
        config,
    ));

    let recent = (!stats.recent.is_empty()).then(|| {
        let mut list = String::new();
        for company in &stats.recent {
            list.push_str(&format!(
                "- **{}** ({}) added {}\n",
                company.name,
                non_empty(&company.company_type).unwrap_or("-"),
                company.created_at.format("%Y-%m-%d")
            ));
        }
        list.push('\n');
        list
    });

    section.push_str(&match recent {
        Some(list) => format!("### Recently Added Companies\n\n{}", list),
        None => "### Recently Added Companies\n\n*No companies yet.* Companies will appear here once added to the system.\n\n".to_string(),
    });

    section
}

fn section_error(message: &str) -> String {
    format!("> ⚠️ Failed to load: {}\n\n", message)
}

fn generate_analytics(report: &AnalyticsReport, config: &ReportConfig) -> String {
    let analytics = &report.analytics;
    let mut section = String::new();

    section.push_str("## Analytics\n\n");

    let total: usize = analytics.company_distribution.iter().map(|c| c.count).sum();
    section.push_str(&panel(
        "Company Distribution",
        (!analytics.company_distribution.is_empty()).then(|| {
            count_table(
                "Type",
                &analytics.company_distribution,
                config.show_percentages.then_some(total),
            )
        }),
        "Add companies to see distribution.",
        config,
    ));

    match report.error_for(AnalyticsSection::TechStack) {
        Some(message) => section.push_str(&format!(
            "### {}\n\n{}",
            AnalyticsSection::TechStack,
            section_error(message)
        )),
        None => section.push_str(&panel(
            &AnalyticsSection::TechStack.to_string(),
            (!analytics.tech_stack_frequency.is_empty())
                .then(|| count_table("Technology", &analytics.tech_stack_frequency, None)),
            "Add technology data to see frequency.",
            config,
        )),
    }

    match report.error_for(AnalyticsSection::RemotePolicy) {
        Some(message) => section.push_str(&format!(
            "### {}\n\n{}",
            AnalyticsSection::RemotePolicy,
            section_error(message)
        )),
        None => section.push_str(&panel(
            &AnalyticsSection::RemotePolicy.to_string(),
            (!analytics.remote_policy.is_empty())
                .then(|| count_table("Policy", &analytics.remote_policy, None)),
            "Add logistics data to see policies.",
            config,
        )),
    }

    match report.error_for(AnalyticsSection::Culture) {
        Some(message) => section.push_str(&format!(
            "### {}\n\n{}",
            AnalyticsSection::Culture,
            section_error(message)
        )),
        None => {
            let body = analytics.culture.as_ref().map(|culture| {
                let mut body = format!(
                    "**Average Work-Life Balance:** {}/5\n\n",
                    culture.formatted_average()
                );
                if !culture.work_environments.is_empty() {
                    body.push_str(&count_table("Work Environment", &culture.work_environments, None));
                }
                body
            });
            section.push_str(&panel(
                &AnalyticsSection::Culture.to_string(),
                body,
                "Add culture data to see indicators.",
                config,
            ));
        }
    }

    section
}

fn generate_company_list(view: &FilterView, config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## Companies\n\n");

    let filter = &view.filter;
    section.push_str("### Filters\n\n");
    section.push_str(&format!(
        "- **Search:** {}\n",
        if filter.query.is_empty() {
            "-".to_string()
        } else {
            format!("\"{}\"", filter.query)
        }
    ));
    section.push_str(&format!(
        "- **Type:** {}\n",
        filter.selected_type.as_deref().unwrap_or("All")
    ));
    section.push_str(&format!(
        "- **Category:** {}\n\n",
        filter.selected_category.as_deref().unwrap_or("All")
    ));

    if view.facets.is_empty() {
        section.push_str(&panel(
            "Filter Options",
            None,
            "Options appear once companies have a type or category.",
            config,
        ));
    } else {
        section.push_str(&panel(
            "Type Options",
            (!view.facets.types.is_empty())
                .then(|| count_table("Type", &view.facets.types, None)),
            "No types recorded yet.",
            config,
        ));
        section.push_str(&panel(
            "Category Options",
            (!view.facets.categories.is_empty())
                .then(|| count_table("Category", &view.facets.categories, None)),
            "No categories recorded yet.",
            config,
        ));
    }

    section.push_str("### Results\n\n");

    if view.companies.is_empty() {
        let hint = if filter.is_active() {
            "Try adjusting your filters or search terms."
        } else {
            "Companies will appear here once added to the system."
        };
        section.push_str(&format!("*No companies found.* {}\n\n", hint));
        return section;
    }

    section.push_str(&format!(
        "Showing {} of {} companies\n\n",
        view.shown(),
        view.total
    ));
    section.push_str("| Name | Type | Category | Employees | Headquarters |\n");
    section.push_str("|:---|:---|:---|:---|:---|\n");
    for company in &view.companies {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&company.name),
            cell(non_empty(&company.company_type).unwrap_or("-")),
            cell(non_empty(&company.category).unwrap_or("-")),
            cell(non_empty(&company.employee_size).unwrap_or("-")),
            cell(non_empty(&company.headquarters_address).unwrap_or("-")),
        ));
    }
    section.push('\n');

    section
}

/// `- **Label:** value`, falling back to the placeholder.
fn field(out: &mut String, label: &str, value: Option<String>) {
    out.push_str(&format!(
        "- **{}:** {}\n",
        label,
        value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));
}

fn text(value: &Option<String>) -> Option<String> {
    non_empty(value).map(String::from)
}

fn items(value: &Option<Vec<String>>) -> Option<String> {
    value
        .as_ref()
        .filter(|items| !items.is_empty())
        .map(|items| items.join(", "))
}

fn yes_no(value: Option<bool>) -> Option<String> {
    value.map(|v| if v { "Yes" } else { "No" }.to_string())
}

fn out_of_five(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{}/5", v))
}

fn percent(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{}%", v))
}

/// Group digits in threes: `1234567` becomes `1,234,567`.
fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::new();

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn salary_range(min: Option<i64>, max: Option<i64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("${} - ${}", thousands(min), thousands(max))),
        _ => None,
    }
}

fn leadership(out: &mut String, value: &Option<Value>) {
    match value {
        Some(team) if !team.is_null() => {
            let pretty = serde_json::to_string_pretty(team).unwrap_or_else(|_| team.to_string());
            out.push_str("- **Leadership Team:**\n\n```json\n");
            out.push_str(&pretty);
            out.push_str("\n```\n\n");
        }
        _ => field(out, "Leadership Team", None),
    }
}

fn generate_overview(company: &Company) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", company.name));

    let badges: Vec<String> = [&company.company_type, &company.category]
        .into_iter()
        .filter_map(non_empty)
        .map(|b| format!("`{}`", b))
        .collect();
    if !badges.is_empty() {
        section.push_str(&badges.join(" "));
        section.push_str("\n\n");
    }

    section.push_str("### Overview\n\n");
    field(&mut section, "Company Type", text(&company.company_type));
    field(&mut section, "Category", text(&company.category));
    field(&mut section, "Employee Size", text(&company.employee_size));
    field(
        &mut section,
        "Founded",
        company.founded_year.map(|y| y.to_string()),
    );
    field(&mut section, "Headquarters", text(&company.headquarters_address));
    field(
        &mut section,
        "Operating Countries",
        items(&company.operating_countries),
    );
    field(&mut section, "Website", text(&company.website_url));
    field(&mut section, "Description", text(&company.description));
    section.push('\n');

    section
}

fn render_record(out: &mut String, record: &SatelliteRecord) {
    match record {
        SatelliteRecord::Business(r) => {
            field(out, "Business Model", text(&r.business_model));
            field(out, "Revenue Streams", items(&r.revenue_streams));
            field(out, "Target Markets", items(&r.target_markets));
            field(out, "Competitive Advantages", items(&r.competitive_advantages));
            field(out, "Strategic Priorities", items(&r.strategic_priorities));
        }
        SatelliteRecord::Technologies(r) => {
            field(out, "Tech Stack", items(&r.tech_stack));
            field(out, "Development Practices", items(&r.development_practices));
            field(out, "Infrastructure", items(&r.infrastructure));
            field(out, "Innovation Areas", items(&r.innovation_areas));
        }
        SatelliteRecord::People(r) => {
            field(out, "Team Size", r.team_size.map(|n| n.to_string()));
            field(out, "Hiring Managers", items(&r.hiring_managers));
            field(out, "Notable Alumni", items(&r.notable_alumni));
            leadership(out, &r.leadership_team);
        }
        SatelliteRecord::Culture(r) => {
            field(out, "Work Environment", text(&r.work_environment));
            field(out, "Core Values", items(&r.core_values));
            field(out, "Diversity Initiatives", items(&r.diversity_initiatives));
            field(
                out,
                "Work-Life Balance Rating",
                out_of_five(r.work_life_balance_rating),
            );
            field(
                out,
                "Employee Engagement Score",
                percent(r.employee_engagement_score),
            );
        }
        SatelliteRecord::TalentGrowth(r) => {
            field(out, "Career Paths", items(&r.career_paths));
            field(out, "Training Programs", items(&r.training_programs));
            field(out, "Mentorship Available", yes_no(r.mentorship_available));
            field(out, "Internal Mobility Rate", percent(r.internal_mobility_rate));
            field(out, "Average Tenure", text(&r.average_tenure));
        }
        SatelliteRecord::Compensation(r) => {
            field(
                out,
                "Salary Range",
                salary_range(r.salary_range_min, r.salary_range_max),
            );
            field(out, "Bonus Structure", text(&r.bonus_structure));
            field(out, "Equity Offered", yes_no(r.equity_offered));
            field(out, "Benefits", items(&r.benefits));
        }
        SatelliteRecord::Logistics(r) => {
            field(out, "Office Locations", items(&r.office_locations));
            field(out, "Remote Work Policy", text(&r.remote_work_policy));
            field(out, "Work Hours", text(&r.work_hours));
            field(out, "Travel Requirements", text(&r.travel_requirements));
            field(out, "Relocation Support", yes_no(r.relocation_support));
        }
        SatelliteRecord::Financials(r) => {
            field(out, "Revenue Range", text(&r.revenue_range));
            field(out, "Funding Stage", text(&r.funding_stage));
            field(out, "Total Funding", text(&r.total_funding));
            field(out, "Profitability Status", text(&r.profitability_status));
            field(out, "Growth Rate", text(&r.growth_rate));
        }
        SatelliteRecord::BrandReputation(r) => {
            field(out, "Glassdoor Rating", out_of_five(r.glassdoor_rating));
            field(
                out,
                "LinkedIn Followers",
                r.linkedin_followers.map(thousands),
            );
            field(out, "Employer Brand Score", percent(r.employer_brand_score));
            field(out, "Awards", items(&r.awards));
            field(out, "Media Mentions", items(&r.media_mentions));
        }
    }
}

fn generate_tab(view: &ProfileView, tab: ProfileTab, config: &ReportConfig) -> String {
    let mut section = String::new();

    match view.tab_state(tab) {
        TabState::Populated => {
            section.push_str(&format!("### {}\n\n", tab));
            for &kind in tab.kinds() {
                let slot = view.slot(kind);
                match (&slot.state, slot.record()) {
                    (_, Some(record)) => render_record(&mut section, record),
                    (QueryState::Failed(message), None) => {
                        section.push_str(&format!("- **{}:** ⚠️ {}\n", kind, message))
                    }
                    _ => {}
                }
            }
            section.push('\n');
        }
        TabState::Failed(message) => {
            section.push_str(&format!("### {}\n\n", tab));
            section.push_str(&section_error(&message));
        }
        TabState::Loading => {
            section.push_str(&format!("### {}\n\n*Loading...*\n\n", tab));
        }
        TabState::Empty => {
            section.push_str(&panel(
                &tab.to_string(),
                None,
                "Information for this section has not been added yet.",
                config,
            ));
        }
    }

    section
}

fn generate_company_profile(view: &ProfileView, config: &ReportConfig) -> String {
    let company = match &view.company {
        QueryState::Ready(Some(company)) => company,
        QueryState::Failed(message) => {
            return format!("## Company\n\n{}", section_error(message));
        }
        _ => {
            return format!(
                "## Company not found\n\nThe requested company (`{}`) could not be found.\n\n",
                view.company_id()
            );
        }
    };

    let mut section = generate_overview(company);

    for tab in ProfileTab::ALL {
        section.push_str(&generate_tab(view, tab, config));
    }

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by orgscope*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyticsView, CompanyFilter};
    use crate::backend::client::FetchError;
    use crate::backend::profile::SatelliteResponse;
    use crate::models::fixtures::{culture, logistics, technologies, timestamp, typed};
    use crate::models::{CompensationRecord, SatelliteKind};
    use crate::report::SectionError;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: timestamp(),
            backend_url: "http://localhost:54321".to_string(),
            duration_seconds: 1.25,
        }
    }

    fn report(view: ViewReport) -> Report {
        Report {
            metadata: metadata(),
            view,
        }
    }

    fn sample_companies() -> Vec<Company> {
        vec![
            typed("1", "Acme", Some("Startup"), Some("Fintech")),
            typed("2", "Globex", Some("Enterprise"), None),
            typed("3", "Initech", Some("Startup"), Some("SaaS")),
        ]
    }

    fn ready(view: &mut ProfileView, kind: SatelliteKind, record: Option<SatelliteRecord>) {
        view.apply(SatelliteResponse {
            company_id: view.company_id().to_string(),
            kind,
            result: Ok(record),
        });
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(950), "950");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-45000), "-45,000");
    }

    #[test]
    fn test_value_formats() {
        assert_eq!(out_of_five(Some(4.5)).as_deref(), Some("4.5/5"));
        assert_eq!(out_of_five(Some(4.0)).as_deref(), Some("4/5"));
        assert_eq!(percent(Some(82.0)).as_deref(), Some("82%"));
        assert_eq!(yes_no(Some(false)).as_deref(), Some("No"));
        assert_eq!(
            salary_range(Some(90000), Some(140000)).as_deref(),
            Some("$90,000 - $140,000")
        );
        assert_eq!(salary_range(Some(90000), None), None);
    }

    #[test]
    fn test_dashboard_report() {
        let companies = sample_companies();
        let stats = DashboardStats::from_companies(Some(companies.as_slice()), 5);
        let markdown = generate_markdown_report(
            &report(ViewReport::Dashboard(stats)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("# orgscope Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| 3 | 2 | 3 | 3 |"));
        assert!(markdown.contains("| Startup | 2 |"));
        assert!(markdown.contains("| Unspecified | 1 |"));
        assert!(markdown.contains("- **Acme** (Startup) added 2024-01-15"));
    }

    #[test]
    fn test_empty_dashboard_shows_empty_states() {
        let stats = DashboardStats::from_companies(None, 5);
        let markdown = generate_markdown_report(
            &report(ViewReport::Dashboard(stats)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("| 0 | 0 | 0 | 0 |"));
        assert!(markdown.contains(NO_DATA));
        assert!(markdown.contains("*No companies yet.*"));
    }

    #[test]
    fn test_empty_sections_can_be_omitted() {
        let config = ReportConfig {
            include_empty_sections: false,
            ..ReportConfig::default()
        };
        let stats = DashboardStats::from_companies(None, 5);
        let markdown = generate_markdown_report(&report(ViewReport::Dashboard(stats)), &config);

        assert!(!markdown.contains("### Companies by Type"));
    }

    #[test]
    fn test_analytics_report_with_percentages_and_failure() {
        let companies = sample_companies();
        let techs = vec![technologies("1", &["Rust", "Go"]), technologies("2", &["Rust"])];
        let cultures = vec![
            culture("1", Some("Hybrid"), Some(4.0)),
            culture("2", None, Some(4.4)),
        ];
        let analytics = AnalyticsView::build(
            Some(companies.as_slice()),
            Some(techs.as_slice()),
            None,
            Some(cultures.as_slice()),
        );
        let analytics_report = AnalyticsReport {
            analytics,
            errors: vec![SectionError {
                section: AnalyticsSection::RemotePolicy,
                message: "Cannot connect to backend".to_string(),
            }],
        };

        let markdown = generate_markdown_report(
            &report(ViewReport::Analytics(analytics_report)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("| Startup | 2 | 67% |"));
        assert!(markdown.contains("| Enterprise | 1 | 33% |"));
        assert!(markdown.contains("| Rust | 2 |"));
        assert!(markdown.contains("Failed to load: Cannot connect to backend"));
        assert!(markdown.contains("**Average Work-Life Balance:** 4.2/5"));
        assert!(markdown.contains("| Hybrid | 1 |"));
    }

    #[test]
    fn test_analytics_without_percentages() {
        let companies = sample_companies();
        let analytics = AnalyticsView::build(Some(companies.as_slice()), None, None, None);
        let config = ReportConfig {
            show_percentages: false,
            ..ReportConfig::default()
        };

        let markdown = generate_markdown_report(
            &report(ViewReport::Analytics(AnalyticsReport {
                analytics,
                errors: Vec::new(),
            })),
            &config,
        );

        assert!(markdown.contains("| Startup | 2 |\n"));
        assert!(!markdown.contains("Share"));
        assert!(markdown.contains("Add culture data to see indicators."));
    }

    #[test]
    fn test_company_list_report() {
        let companies = sample_companies();
        let filter = CompanyFilter::new("", Some("Startup".to_string()), None);
        let view = FilterView::build(Some(companies.as_slice()), filter);

        let markdown = generate_markdown_report(
            &report(ViewReport::Companies(view)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("Showing 2 of 3 companies"));
        assert!(markdown.contains("- **Type:** Startup"));
        assert!(markdown.contains("- **Category:** All"));
        assert!(markdown.contains("| Acme | Startup | Fintech |"));
        assert!(!markdown.contains("| Globex |"));
    }

    #[test]
    fn test_company_list_no_matches() {
        let companies = sample_companies();
        let view = FilterView::build(
            Some(companies.as_slice()),
            CompanyFilter::new("zzz", None, None),
        );

        let markdown = generate_markdown_report(
            &report(ViewReport::Companies(view)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("*No companies found.* Try adjusting your filters"));
        assert!(!markdown.contains("Showing"));
    }

    #[test]
    fn test_company_profile_report() {
        let mut view = ProfileView::new("1");
        view.company = QueryState::Ready(Some(typed("1", "Acme", Some("Startup"), None)));

        for kind in SatelliteKind::ALL {
            let record = match kind {
                SatelliteKind::Culture => Some(SatelliteRecord::Culture(culture(
                    "1",
                    Some("Remote-first"),
                    Some(4.5),
                ))),
                SatelliteKind::Compensation => {
                    Some(SatelliteRecord::Compensation(CompensationRecord {
                        id: "comp-1".to_string(),
                        company_id: "1".to_string(),
                        created_at: timestamp(),
                        salary_range_min: Some(90000),
                        salary_range_max: Some(140000),
                        bonus_structure: None,
                        equity_offered: Some(true),
                        benefits: None,
                    }))
                }
                SatelliteKind::Logistics => {
                    Some(SatelliteRecord::Logistics(logistics("1", Some("Hybrid"))))
                }
                _ => None,
            };
            ready(&mut view, kind, record);
        }

        let markdown = generate_markdown_report(
            &report(ViewReport::Company(view)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("## Acme"));
        assert!(markdown.contains("- **Company Type:** Startup"));
        assert!(markdown.contains("- **Category:** Not available"));
        assert!(markdown.contains("- **Work-Life Balance Rating:** 4.5/5"));
        assert!(markdown.contains("- **Salary Range:** $90,000 - $140,000"));
        assert!(markdown.contains("- **Equity Offered:** Yes"));
        assert!(markdown.contains("- **Remote Work Policy:** Hybrid"));
        assert!(markdown.contains("### Business\n\n*No data available.*"));
    }

    #[test]
    fn test_company_profile_failed_tab() {
        let mut view = ProfileView::new("1");
        view.company = QueryState::Ready(Some(typed("1", "Acme", None, None)));
        view.apply(SatelliteResponse {
            company_id: "1".to_string(),
            kind: SatelliteKind::People,
            result: Err(FetchError::Connect("http://localhost".to_string())),
        });

        let markdown = generate_markdown_report(
            &report(ViewReport::Company(view)),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("### People\n\n> ⚠️ Failed to load: Cannot connect"));
    }

    #[test]
    fn test_generate_json_report() {
        let companies = sample_companies();
        let stats = DashboardStats::from_companies(Some(companies.as_slice()), 5);
        let json = generate_json_report(&report(ViewReport::Dashboard(stats))).unwrap();

        assert!(json.contains("\"backend_url\""));
        assert!(json.contains("\"kind\": \"dashboard\""));
        assert!(json.contains("\"by_type\""));
    }
}
