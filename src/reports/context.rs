//! The flat set of values a year-in-review page is rendered from.

use crate::misc::Tally;
use crate::pipeline::CommitType;
use crate::pipeline::calendar::{self, MONTHS, WEEKDAYS};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const TOP_K: usize = 3;
const CREATED_DAYS_GRANULARITY: i64 = 100;

#[derive(Debug, Deserialize)]
struct AccountView {
    avatar: String,
    name: String,
    username: String,
    followers_num: u64,
    following_num: u64,
    created_time: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
struct RepoView {
    name: String,
    commits_num: u64,
}

/// The projected full-year aggregate.
#[derive(Debug, Deserialize)]
struct FullReportView {
    account_info: AccountView,
    stargazers_num: u64,
    commits_daily_num: BTreeMap<i32, Vec<u64>>,
    commits_monthly_num: Vec<u64>,
    commits_weekdaily_num: Vec<u64>,
    commits_hourly_num: Vec<u64>,
    commits_num: u64,
    commits_types_num: Tally,
    issues_num: u64,
    prs_num: u64,
    repos_num: u64,
    repos_details: Vec<RepoView>,
}

/// The projected new-repositories aggregate.
#[derive(Debug, Deserialize)]
struct NewReposView {
    languages_num: Tally,
}

/// A named count in a top-K list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked {
    pub name: String,
    pub num: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    pub avatar: String,
    pub year: i32,
    pub username: String,
    pub name: String,

    /// Account age in days, rounded up to a multiple of 100
    pub created_time: i64,

    pub followers_num: u64,
    pub following_num: u64,
    pub stars_num: u64,
    pub commits_per_day: Vec<u64>,
    pub commits_days_num: u64,
    pub longest_commit_streak: usize,
    pub longest_commit_break: usize,
    pub max_commits_per_day: u64,
    pub commits_per_month: Vec<u64>,
    pub most_active_month: String,
    pub commits_per_weekday: Vec<u64>,
    pub most_active_weekday: String,
    pub commits_per_hour: Vec<u64>,
    pub most_active_hour: String,
    pub commits_num: u64,
    pub issues_num: u64,
    pub prs_num: u64,
    pub repos_num: u64,
    pub top_3_most_committed_repos: Vec<Ranked>,

    /// Distinct languages across repositories created in the year
    pub languages_num: usize,

    pub top_3_languages_used_in_new_repos: Vec<Ranked>,
    pub conventional_commits_num: u64,
    pub top_3_conventional_commit_types: Vec<Ranked>,
}

impl ReportContext {
    /// Derives the context from the projected full-year and new-repositories aggregates.
    ///
    /// `now` anchors the account age computation.
    pub fn build(year: i32, full: &Value, new_repos: &Value, now: DateTime<Utc>) -> Result<Self> {
        let full = FullReportView::deserialize(full).context("reading the full-year aggregate")?;
        let new_repos = NewReposView::deserialize(new_repos).context("reading the new-repositories aggregate")?;

        let commits_per_day = full
            .commits_daily_num
            .get(&year)
            .cloned()
            .unwrap_or_else(|| vec![0; calendar::days_in_year(year)]);

        let conventional: Vec<Ranked> = full
            .commits_types_num
            .iter()
            .filter(|(kind, _)| *kind != CommitType::Others.to_string())
            .map(|(name, num)| Ranked { name: name.to_string(), num })
            .collect();

        let repos = full
            .repos_details
            .into_iter()
            .map(|repo| Ranked {
                name: repo.name,
                num: repo.commits_num,
            })
            .collect();

        // already ranked by the count stage
        let languages: Vec<Ranked> = new_repos
            .languages_num
            .iter()
            .map(|(name, num)| Ranked { name: name.to_string(), num })
            .collect();

        Ok(Self {
            avatar: full.account_info.avatar,
            year,
            username: full.account_info.username,
            name: full.account_info.name,
            created_time: account_age_days(full.account_info.created_time, now),
            followers_num: full.account_info.followers_num,
            following_num: full.account_info.following_num,
            stars_num: full.stargazers_num,
            commits_days_num: commits_per_day.iter().filter(|&&count| count > 0).count() as u64,
            longest_commit_streak: calendar::longest_streak(&commits_per_day),
            longest_commit_break: calendar::longest_break(&commits_per_day),
            max_commits_per_day: commits_per_day.iter().copied().max().unwrap_or(0),
            commits_per_day,
            most_active_month: bucket_name(&MONTHS, &full.commits_monthly_num),
            commits_per_month: full.commits_monthly_num,
            most_active_weekday: bucket_name(&WEEKDAYS, &full.commits_weekdaily_num),
            commits_per_weekday: full.commits_weekdaily_num,
            most_active_hour: format!("{}:00", calendar::busiest(&full.commits_hourly_num)),
            commits_per_hour: full.commits_hourly_num,
            commits_num: full.commits_num,
            issues_num: full.issues_num,
            prs_num: full.prs_num,
            repos_num: full.repos_num,
            top_3_most_committed_repos: top_k(repos),
            languages_num: languages.len(),
            top_3_languages_used_in_new_repos: languages.into_iter().take(TOP_K).collect(),
            conventional_commits_num: conventional.iter().map(|entry| entry.num).sum(),
            top_3_conventional_commit_types: top_k(conventional),
        })
    }
}

fn account_age_days(created: DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    let days = now.signed_duration_since(created).num_days().max(0);
    (days + CREATED_DAYS_GRANULARITY - 1) / CREATED_DAYS_GRANULARITY * CREATED_DAYS_GRANULARITY
}

fn bucket_name(names: &[&str], buckets: &[u64]) -> String {
    names.get(calendar::busiest(buckets)).copied().unwrap_or_default().to_string()
}

/// Stable descending order by count, truncated.
fn top_k(mut entries: Vec<Ranked>) -> Vec<Ranked> {
    entries.sort_by(|a, b| b.num.cmp(&a.num));
    entries.truncate(TOP_K);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap()
    }

    fn full_view(year_days: Option<Vec<u64>>, repos: Value, types: Value) -> Value {
        let mut daily = serde_json::Map::new();
        if let Some(days) = year_days {
            let _ = daily.insert("2024".to_string(), json!(days));
        }

        let mut monthly = vec![0; 12];
        monthly[4] = 3;
        monthly[9] = 3;
        let mut hourly = vec![0; 24];
        hourly[14] = 2;

        json!({
            "account_info": {
                "avatar": "https://avatars.example/octocat",
                "url": "https://github.com/octocat",
                "name": "The Octocat",
                "username": "octocat",
                "followers_num": 10,
                "following_num": 2,
                "created_time": "2024-01-01T00:00:00+00:00",
            },
            "stargazers_num": 43,
            "commits_daily_num": daily,
            "commits_monthly_num": monthly,
            "commits_weekdaily_num": [0, 0, 1, 0, 0, 0, 1],
            "commits_hourly_num": hourly,
            "commits_num": 6,
            "commits_types_num": types,
            "issues_num": 1,
            "prs_num": 2,
            "repos_num": 2,
            "repos_details": repos,
        })
    }

    fn days(active: &[(usize, u64)]) -> Vec<u64> {
        let mut days = vec![0; 366];
        for &(index, count) in active {
            days[index] = count;
        }
        days
    }

    #[test]
    fn test_context_from_projected_aggregates() {
        let full = full_view(
            Some(days(&[(0, 1), (1, 4), (2, 1), (10, 1)])),
            json!([{ "name": "old-lib", "commits_num": 2 }, { "name": "fresh-app", "commits_num": 5 }]),
            json!({ "feat": 3, "others": 4, "fix": 3, "docs": 1, "ci": 2 }),
        );
        let new_repos = json!({ "languages_num": { "TypeScript": 500, "Rust": 20 } });

        let context = ReportContext::build(2024, &full, &new_repos, now()).unwrap();

        assert_eq!(context.year, 2024);
        assert_eq!(context.username, "octocat");
        assert_eq!(context.stars_num, 43);
        assert_eq!(context.commits_per_day.len(), 366);
        assert_eq!(context.commits_days_num, 4);
        assert_eq!(context.longest_commit_streak, 3);
        assert_eq!(context.longest_commit_break, 355);
        assert_eq!(context.max_commits_per_day, 4);
        assert_eq!(context.most_active_month, "May");
        assert_eq!(context.most_active_weekday, "Wed");
        assert_eq!(context.most_active_hour, "14:00");

        assert_eq!(
            context.top_3_most_committed_repos,
            vec![
                Ranked { name: "fresh-app".to_string(), num: 5 },
                Ranked { name: "old-lib".to_string(), num: 2 },
            ]
        );

        assert_eq!(context.languages_num, 2);
        assert_eq!(context.top_3_languages_used_in_new_repos[0].name, "TypeScript");

        assert_eq!(context.conventional_commits_num, 9);
        let types: Vec<_> = context.top_3_conventional_commit_types.iter().map(|r| (r.name.as_str(), r.num)).collect();
        assert_eq!(types, vec![("feat", 3), ("fix", 3), ("ci", 2)]);
    }

    #[test]
    fn test_missing_year_gives_empty_calendar() {
        let full = full_view(None, json!([]), json!({}));
        let context = ReportContext::build(2024, &full, &json!({ "languages_num": {} }), now()).unwrap();

        assert_eq!(context.commits_per_day, vec![0; 366]);
        assert_eq!(context.commits_days_num, 0);
        assert_eq!(context.longest_commit_streak, 0);
        assert_eq!(context.longest_commit_break, 366);
        assert_eq!(context.max_commits_per_day, 0);
        assert!(context.top_3_most_committed_repos.is_empty());
        assert!(context.top_3_conventional_commit_types.is_empty());
        assert_eq!(context.languages_num, 0);
    }

    #[test]
    fn test_only_others_yields_no_conventional_types() {
        let full = full_view(None, json!([]), json!({ "others": 7 }));
        let context = ReportContext::build(2024, &full, &json!({ "languages_num": {} }), now()).unwrap();

        assert_eq!(context.conventional_commits_num, 0);
        assert!(context.top_3_conventional_commit_types.is_empty());
    }

    #[test]
    fn test_account_age_rounds_up_to_hundreds() {
        let created = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(account_age_days(created, now()), 400);
        assert_eq!(account_age_days(created, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()), 0);
        assert_eq!(account_age_days(created, Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap()), 100);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = ReportContext::build(2024, &json!({}), &json!({ "languages_num": {} }), now()).unwrap_err();
        assert!(err.to_string().contains("full-year"));
    }
}
