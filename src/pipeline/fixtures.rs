//! Snapshot builders shared by unit tests.

use crate::facts::{AccountInfo, CommitData, IssueData, PullRequestData, RepoData, Snapshot, StarData};
use chrono::{DateTime, FixedOffset, TimeZone};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn account() -> AccountInfo {
    AccountInfo {
        url: "https://github.com/octocat".to_string(),
        name: "The Octocat".to_string(),
        username: "octocat".to_string(),
        avatar: "https://avatars.githubusercontent.com/u/583231".to_string(),
        bio: None,
        followers_num: 12,
        following_num: 3,
        created_time: at(2011, 1, 25, 18),
    }
}

pub fn repo(name: &str, created: DateTime<FixedOffset>, stars: u64, languages: &[(&str, u64)], commits: &[(&str, DateTime<FixedOffset>)]) -> RepoData {
    RepoData {
        name: name.to_string(),
        url: format!("https://github.com/octocat/{name}"),
        description: None,
        created_time: created,
        stargazers_num: stars,
        forks_num: 0,
        languages_num: languages.iter().map(|(l, b)| ((*l).to_string(), *b)).collect(),
        commits_details: commits
            .iter()
            .map(|(message, time)| CommitData {
                message: (*message).to_string(),
                created_time: *time,
            })
            .collect(),
    }
}

pub fn issue(created: DateTime<FixedOffset>) -> IssueData {
    IssueData {
        url: "https://github.com/octocat/hello/issues/1".to_string(),
        title: "Broken".to_string(),
        body: None,
        state: "open".to_string(),
        created_time: created,
    }
}

pub fn pull_request(created: DateTime<FixedOffset>, merged: bool) -> PullRequestData {
    PullRequestData {
        url: "https://github.com/octocat/hello/pull/2".to_string(),
        title: "Fix".to_string(),
        body: None,
        state: "closed".to_string(),
        created_time: created,
        merged,
        merged_time: merged.then_some(created),
    }
}

pub fn star(created: DateTime<FixedOffset>) -> StarData {
    StarData {
        name: "rust-lang/rust".to_string(),
        url: "https://github.com/rust-lang/rust".to_string(),
        created_time: created,
    }
}

/// Activity spread over 2023 and 2024, with one repository created in 2024.
pub fn snapshot() -> Snapshot {
    Snapshot {
        account_info: account(),
        repos: vec![
            repo(
                "old-lib",
                at(2020, 5, 1, 0),
                40,
                &[("Rust", 1000), ("C", 10)],
                &[
                    ("feat: parser", at(2024, 2, 1, 9)),
                    ("fix: overflow", at(2024, 2, 2, 10)),
                    ("chore: bump", at(2023, 11, 5, 10)),
                ],
            ),
            repo("fresh-app", at(2024, 3, 1, 0), 3, &[("TypeScript", 500), ("Rust", 20)], &[("feat: init", at(2024, 3, 1, 12)), ("docs: readme", at(2024, 3, 3, 22))]),
            repo("stale", at(2019, 1, 1, 0), 100, &[("Go", 800)], &[("refactor: all", at(2022, 7, 7, 7))]),
        ],
        issues: vec![issue(at(2024, 4, 1, 0)), issue(at(2023, 4, 1, 0))],
        prs: vec![pull_request(at(2024, 6, 1, 0), true), pull_request(at(2024, 7, 1, 0), false), pull_request(at(2022, 1, 1, 0), true)],
        stars: vec![star(at(2024, 8, 8, 8)), star(at(2021, 8, 8, 8))],
    }
}
