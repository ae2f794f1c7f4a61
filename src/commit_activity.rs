// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Yearly commit activity fetcher.
///
/// GitHub computes repository statistics lazily and answers `202 Accepted`
/// with an empty body until they are ready. Any response without weekly
/// buckets is reported as a processing marker, never as an error.
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    decode::Fields,
    error::FetchError,
    report::{ActiveWeek, CommitActivity, Section, StatisticsStatus},
    transport::Transport,
};

/// One weekly bucket of the commit activity statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct WeeklyCommits
{
    /// Unix timestamp of the start of the week.
    pub week:  i64,
    /// Commits during the week.
    pub total: u64,
}

/// Fetches the commit activity of the last year for `owner/repository`.
pub async fn fetch_commit_activity<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Section<CommitActivity,>
{
    let result = load(transport, owner, repository,).await;
    if let Err(error,) = &result {
        warn!("Error fetching commit activity for {}/{}: {}", owner, repository, error);
    }
    result.into()
}

async fn load<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Result<CommitActivity, FetchError,>
{
    let route = format!("/repos/{owner}/{repository}/stats/commit_activity");
    let response = transport.get(&route,).await?;
    if !response.is_success() {
        debug!("{} returned HTTP {}", route, response.status);
    }

    let weeks: Vec<WeeklyCommits,> = response.into_collection().iter().map(weekly_bucket,).collect();
    Ok(summarize_weeks(&weeks,),)
}

/// Reads one bucket; each field defaults to `0` on its own.
fn weekly_bucket(value: &Value,) -> WeeklyCommits
{
    let fields = Fields::new(value,);
    WeeklyCommits {
        week: fields.signed("week",), total: fields.count("total",),
    }
}

/// Reduces weekly buckets to totals.
///
/// The busiest week is the first bucket holding the maximum, in upstream
/// order. An empty slice yields the processing marker.
pub fn summarize_weeks(weeks: &[WeeklyCommits],) -> CommitActivity
{
    let Some(first,) = weeks.first() else {
        return CommitActivity::Pending {
            status: StatisticsStatus::Processing,
        };
    };

    let year_total_commits: u64 = weeks.iter().map(|week| week.total,).sum();
    let busiest = weeks.iter().skip(1,).fold(first, |best, week| {
        if week.total > best.total { week } else { best }
    },);

    CommitActivity::Summary {
        year_total_commits,
        most_active_week: ActiveWeek {
            timestamp: busiest.week, commits: busiest.total,
        },
        weekly_average: year_total_commits as f64 / weeks.len() as f64,
    }
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::{WeeklyCommits, fetch_commit_activity, summarize_weeks, weekly_bucket};
    use crate::{
        report::{ActiveWeek, CommitActivity, StatisticsStatus},
        transport::fixture::FixtureTransport,
    };

    fn week(week: i64, total: u64,) -> WeeklyCommits
    {
        WeeklyCommits {
            week,
            total,
        }
    }

    #[test]
    fn empty_statistics_are_processing()
    {
        assert_eq!(summarize_weeks(&[]), CommitActivity::Pending {
            status: StatisticsStatus::Processing,
        });
    }

    #[test]
    fn ties_resolve_to_first_week_in_upstream_order()
    {
        let weeks = [week(300, 2,), week(100, 7,), week(200, 7,), week(400, 0,)];
        match summarize_weeks(&weeks,) {
            CommitActivity::Summary {
                year_total_commits,
                most_active_week,
                weekly_average,
            } => {
                assert_eq!(year_total_commits, 16);
                assert_eq!(most_active_week, ActiveWeek {
                    timestamp: 100, commits: 7,
                });
                assert!((weekly_average - 4.0).abs() < f64::EPSILON);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn all_zero_weeks_pick_the_first()
    {
        let weeks = [week(10, 0,), week(20, 0,)];
        match summarize_weeks(&weeks,) {
            CommitActivity::Summary {
                most_active_week, ..
            } => assert_eq!(most_active_week.timestamp, 10),
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn malformed_fields_default_independently()
    {
        assert_eq!(weekly_bucket(&json!({ "week": 5, "total": null })), week(5, 0,));
        assert_eq!(weekly_bucket(&json!({ "week": "soon", "total": 4 })), week(0, 4,));
        assert_eq!(weekly_bucket(&json!(17)), week(0, 0,));
    }

    #[tokio::test]
    async fn accepted_status_is_processing()
    {
        let transport = FixtureTransport::new().with_status(
            "/repos/octocat/Hello-World/stats/commit_activity",
            202,
            json!({}),
        );

        let section = fetch_commit_activity(&transport, "octocat", "Hello-World",).await;

        assert_eq!(
            serde_json::to_value(&section).expect("json"),
            json!({ "status": "processing" })
        );
    }

    #[tokio::test]
    async fn computes_summary_from_statistic()
    {
        let transport = FixtureTransport::new().with_json(
            "/repos/octocat/Hello-World/stats/commit_activity",
            json!([
                { "days": [0, 1, 0, 0, 0, 0, 0], "total": 1, "week": 1700000000 },
                { "days": [0, 3, 2, 0, 0, 0, 0], "total": 5, "week": 1700604800 },
            ]),
        );

        let section = fetch_commit_activity(&transport, "octocat", "Hello-World",).await;

        assert_eq!(
            serde_json::to_value(&section).expect("json"),
            json!({
                "year_total_commits": 6,
                "most_active_week": { "timestamp": 1700604800, "commits": 5 },
                "weekly_average": 3.0,
            })
        );
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_record()
    {
        let transport = FixtureTransport::new()
            .with_failure("/repos/octocat/Hello-World/stats/commit_activity", "timeout",);

        let section = fetch_commit_activity(&transport, "octocat", "Hello-World",).await;

        assert!(section.error().is_some());
    }
}
