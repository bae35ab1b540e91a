//! Totals, classifications and histograms.

use crate::facts::CommitData;
use crate::misc::Tally;
use crate::pipeline::aggregate::CommitStats;
use crate::pipeline::calendar::{self, DailyCalendar};
use crate::pipeline::{Aggregate, CommitType, CountKind};

type Histogram = fn(&[CommitData]) -> Vec<u64>;
type HistogramField = fn(&mut CommitStats) -> &mut Vec<u64>;

/// Derives one family of statistics, per repository where applicable and overall.
#[must_use]
pub fn apply(mut aggregate: Aggregate, kind: CountKind) -> Aggregate {
    match kind {
        CountKind::Commits => count_commits(&mut aggregate),
        CountKind::CommitTypes => count_commit_types(&mut aggregate),
        CountKind::CommitsMonthly => count_histogram(&mut aggregate, |c| calendar::monthly(times(c)), |s| &mut s.commits_monthly_num),
        CountKind::CommitsWeekdaily => count_histogram(&mut aggregate, |c| calendar::weekdaily(times(c)), |s| &mut s.commits_weekdaily_num),
        CountKind::CommitsHourly => count_histogram(&mut aggregate, |c| calendar::hourly(times(c)), |s| &mut s.commits_hourly_num),
        CountKind::CommitsDaily => count_daily(&mut aggregate),
        CountKind::Repos => aggregate.stats.repos_num = aggregate.repos_details.len() as u64,
        CountKind::Languages => count_languages(&mut aggregate),
        CountKind::Stargazers => aggregate.stats.stargazers_num = aggregate.repos_details.iter().map(|r| r.repo.stargazers_num).sum(),
        CountKind::Forks => aggregate.stats.forks_num = aggregate.repos_details.iter().map(|r| r.repo.forks_num).sum(),
        CountKind::PullRequests => aggregate.stats.prs_num = aggregate.prs_details.len() as u64,
        CountKind::MergedPullRequests => aggregate.stats.prs_merged_num = aggregate.prs_details.iter().filter(|pr| pr.merged).count() as u64,
        CountKind::Issues => aggregate.stats.issues_num = aggregate.issues_details.len() as u64,
        CountKind::Stars => aggregate.stats.stars_num = aggregate.stars_details.len() as u64,
    }

    aggregate
}

fn times(commits: &[CommitData]) -> impl Iterator<Item = &chrono::DateTime<chrono::FixedOffset>> {
    commits.iter().map(|commit| &commit.created_time)
}

fn count_commits(aggregate: &mut Aggregate) {
    let mut total = 0;
    for repo in &mut aggregate.repos_details {
        repo.stats.commits_num = repo.repo.commits_details.len() as u64;
        total += repo.stats.commits_num;
    }
    aggregate.stats.commits.commits_num = total;
}

fn count_commit_types(aggregate: &mut Aggregate) {
    let mut total = Tally::new();
    for repo in &mut aggregate.repos_details {
        let mut types = Tally::new();
        for commit in &repo.repo.commits_details {
            types.add(&CommitType::classify(&commit.message).to_string(), 1);
        }

        for (kind, count) in types.iter() {
            total.add(kind, count);
        }
        repo.stats.commits_types_num = types;
    }
    aggregate.stats.commits.commits_types_num = total;
}

fn count_histogram(aggregate: &mut Aggregate, histogram: Histogram, field: HistogramField) {
    let mut total = field(&mut CommitStats::default()).clone();
    for repo in &mut aggregate.repos_details {
        let buckets = histogram(&repo.repo.commits_details);
        calendar::merge_buckets(&mut total, &buckets);
        *field(&mut repo.stats) = buckets;
    }
    *field(&mut aggregate.stats.commits) = total;
}

fn count_daily(aggregate: &mut Aggregate) {
    let mut total = DailyCalendar::new();
    for repo in &mut aggregate.repos_details {
        let days = calendar::daily(times(&repo.repo.commits_details));
        calendar::merge_daily(&mut total, &days);
        repo.stats.commits_daily_num = days;
    }
    aggregate.stats.commits.commits_daily_num = total;
}

fn count_languages(aggregate: &mut Aggregate) {
    let mut bytes = Tally::new();
    let mut repos = Tally::new();
    for repo in &mut aggregate.repos_details {
        // totals see the API order so ties keep the first language reported
        for (language, size) in repo.repo.languages_num.iter() {
            bytes.add(language, size);
            repos.add(language, 1);
        }
        repo.repo.languages_num = core::mem::take(&mut repo.repo.languages_num).sorted_descending();
    }
    aggregate.stats.languages_num = bytes.sorted_descending();
    aggregate.stats.repos_languages_num = repos.sorted_descending();
}
