// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Report model assembled from the endpoint fetchers.
//!
//! Each fetcher produces one closed record type. The assembler stores every
//! record as a [`Section`], which serializes either as the record itself or
//! as `{"error": "..."}` when the fetcher failed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::{TargetDescriptor, TargetKind};

/// Sentinel substituted for the output of a failed fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct ErrorRecord
{
    /// Human readable failure description.
    pub error: String,
}

impl ErrorRecord
{
    /// Creates a record from any displayable failure.
    pub fn new<M,>(message: M,) -> Self
    where
        M: std::fmt::Display,
    {
        Self {
            error: message.to_string(),
        }
    }
}

/// Outcome of one fetcher: its record, or an [`ErrorRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(untagged)]
pub enum Section<T,>
{
    /// The fetcher failed.
    Failed(ErrorRecord,),
    /// The fetcher produced its record.
    Ready(T,),
}

impl<T,> Section<T,>
{
    /// Returns the record when the fetcher succeeded.
    pub fn ready(&self,) -> Option<&T,>
    {
        match self {
            Self::Ready(record,) => Some(record,),
            Self::Failed(_,) => None,
        }
    }

    /// Returns the failure message when the fetcher failed.
    pub fn error(&self,) -> Option<&str,>
    {
        match self {
            Self::Failed(record,) => Some(&record.error,),
            Self::Ready(_,) => None,
        }
    }
}

impl<T, E,> From<Result<T, E,>,> for Section<T,>
where
    E: std::fmt::Display,
{
    fn from(result: Result<T, E,>,) -> Self
    {
        match result {
            Ok(record,) => Self::Ready(record,),
            Err(error,) => Self::Failed(ErrorRecord::new(error,),),
        }
    }
}

/// Identity of the analyzed subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct SubjectReference
{
    /// Profile or repository.
    pub kind:      TargetKind,
    /// `owner` or `owner/repository`.
    pub reference: String,
    /// Browsable github.com URL.
    pub url:       String,
}

impl From<&TargetDescriptor,> for SubjectReference
{
    fn from(target: &TargetDescriptor,) -> Self
    {
        Self {
            kind: target.kind(), reference: target.slug(), url: target.html_url(),
        }
    }
}

/// Repository resource merged with its language breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryDetails
{
    pub id:                u64,
    pub node_id:           String,
    pub full_name:         String,
    /// `None` when GitHub reports `null`.
    pub description:       Option<String,>,
    pub created_at:        String,
    pub updated_at:        String,
    pub pushed_at:         String,
    pub stargazers_count:  u64,
    pub watchers_count:    u64,
    pub forks_count:       u64,
    pub open_issues_count: u64,
    /// `None` when GitHub reports `null`.
    pub primary_language:  Option<String,>,
    /// Bytes of code per language.
    pub all_languages:     BTreeMap<String, u64,>,
    pub size:              u64,
    pub default_branch:    String,
    pub has_issues:        bool,
    pub has_wiki:          bool,
    pub has_pages:         bool,
    pub has_projects:      bool,
    pub has_downloads:     bool,
    pub archived:          bool,
    pub disabled:          bool,
    pub topics:            Vec<String,>,
    pub homepage:          Option<String,>,
    pub fork:              bool,
    /// `full_name` of the parent repository of a fork.
    pub parent:            Option<String,>,
    /// `full_name` of the root repository of a fork network.
    pub source:            Option<String,>,
    /// License display name.
    pub license:           Option<String,>,
}

/// One entry of the public activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ActivityEntry
{
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo:       String,
    pub created_at: String,
    /// Payload action, `"N/A"` when the event has none.
    pub action:     String,
}

/// Aggregates over the first page of owned repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepoSummary
{
    pub total_public_repos: u64,
    pub repo_names:         Vec<String,>,
    /// Highest star count, `0` for an empty collection.
    pub most_starred:       u64,
    /// Sum of fork counts, `0` for an empty collection.
    pub total_forks:        u64,
}

/// User resource enriched with fetched collections.
///
/// `followers` and `following` count the fetched first page, not the totals
/// stated on the account. The optional text fields and `hireable` are `None`
/// when GitHub reports them as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct OwnerProfile
{
    pub user_id:          u64,
    pub node_id:          String,
    pub login:            String,
    #[serde(rename = "type")]
    pub account_type:     String,
    pub avatar_url:       String,
    pub html_url:         String,
    pub created_at:       String,
    pub updated_at:       String,
    pub public_repos:     u64,
    pub public_gists:     u64,
    pub followers:        u64,
    pub following:        u64,
    pub follower_list:    Vec<String,>,
    pub following_list:   Vec<String,>,
    pub hireable:         Option<bool,>,
    pub blog:             Option<String,>,
    pub location:         Option<String,>,
    pub email:            Option<String,>,
    pub bio:              Option<String,>,
    pub twitter_username: Option<String,>,
    pub company:          Option<String,>,
    pub public_activity:  Vec<ActivityEntry,>,
    pub repo_summary:     RepoSummary,
}

/// Login and id of a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Collaborator
{
    pub login: String,
    pub id:    u64,
}

/// First page of repository collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Collaborators
{
    pub total_collaborators: u64,
    pub collaborators:       Vec<Collaborator,>,
}

/// Busiest week of the commit statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ActiveWeek
{
    /// Unix timestamp of the start of the week.
    pub timestamp: i64,
    pub commits:   u64,
}

/// Marker emitted while GitHub is still computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsStatus
{
    Processing,
}

/// Yearly commit activity, or a processing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(untagged)]
pub enum CommitActivity
{
    /// Statistics are not computed yet.
    Pending
    {
        status: StatisticsStatus,
    },
    /// Aggregates over the weekly buckets.
    Summary
    {
        year_total_commits: u64,
        most_active_week:   ActiveWeek,
        weekly_average:     f64,
    },
}

/// Count and unique visitors of a traffic statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
pub struct TrafficCount
{
    pub count:   u64,
    pub uniques: u64,
}

/// Views and clones, each present only when readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(untagged)]
pub enum Traffic
{
    /// Neither statistic was readable.
    Unavailable
    {
        note: String,
    },
    /// At least one statistic was readable.
    Available
    {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        views:  Option<TrafficCount,>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clones: Option<TrafficCount,>,
    },
}

/// Aggregate impact over the owner's repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
pub struct Contributions
{
    /// Sum of stars plus forks across the first page of repositories.
    pub total_contributions_impact: u64,
}

/// Best-effort snapshot of a profile or repository.
///
/// Repository-only sections are `None` for profile targets and are then
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport
{
    /// Assembly start time in RFC 3339 format.
    pub timestamp:          String,
    pub subject_reference:  SubjectReference,
    pub owner_profile:      Section<OwnerProfile,>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_details: Option<Section<RepositoryDetails,>,>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators:      Option<Section<Collaborators,>,>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_activity:    Option<Section<CommitActivity,>,>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic:            Option<Section<Traffic,>,>,
    pub contributions:      Section<Contributions,>,
}

impl AnalysisReport
{
    /// Opaque nested view consumed by presentation layers.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures.
    pub fn to_value(&self,) -> Result<Value, serde_json::Error,>
    {
        serde_json::to_value(self,)
    }

    /// Names of the serialized top-level keys in declaration order.
    pub fn section_keys(&self,) -> Vec<&'static str,>
    {
        let mut keys = vec!["timestamp", "subjectReference", "ownerProfile"];
        if self.repository_details.is_some() {
            keys.push("repositoryDetails",);
        }
        if self.collaborators.is_some() {
            keys.push("collaborators",);
        }
        if self.commit_activity.is_some() {
            keys.push("commitActivity",);
        }
        if self.traffic.is_some() {
            keys.push("traffic",);
        }
        keys.push("contributions",);
        keys
    }
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::{
        ActiveWeek, CommitActivity, Contributions, ErrorRecord, Section, StatisticsStatus,
        SubjectReference, Traffic, TrafficCount,
    };
    use crate::classify;

    #[test]
    fn sections_serialize_as_record_or_error()
    {
        let ready: Section<Contributions,> = Section::Ready(Contributions {
            total_contributions_impact: 7,
        },);
        let failed: Section<Contributions,> = Section::Failed(ErrorRecord::new("boom",),);

        assert_eq!(
            serde_json::to_value(&ready).expect("json"),
            json!({ "total_contributions_impact": 7 })
        );
        assert_eq!(serde_json::to_value(&failed).expect("json"), json!({ "error": "boom" }));
    }

    #[test]
    fn error_sections_deserialize_as_failures()
    {
        let section: Section<Contributions,> =
            serde_json::from_value(json!({ "error": "HTTP 500" }),).expect("section",);
        assert_eq!(section.error(), Some("HTTP 500"));
        assert!(section.ready().is_none());
    }

    #[test]
    fn result_conversion_keeps_message()
    {
        let section: Section<u8,> = Err::<u8, _,>("timed out",).into();
        assert_eq!(section, Section::Failed(ErrorRecord::new("timed out")));
        let section: Section<u8,> = Ok::<_, String,>(3,).into();
        assert_eq!(section.ready(), Some(&3));
    }

    #[test]
    fn commit_activity_shapes()
    {
        let pending = CommitActivity::Pending {
            status: StatisticsStatus::Processing,
        };
        assert_eq!(serde_json::to_value(&pending).expect("json"), json!({ "status": "processing" }));

        let summary = CommitActivity::Summary {
            year_total_commits: 10,
            most_active_week:   ActiveWeek {
                timestamp: 1, commits: 6,
            },
            weekly_average:     2.5,
        };
        assert_eq!(
            serde_json::to_value(&summary).expect("json"),
            json!({
                "year_total_commits": 10,
                "most_active_week": { "timestamp": 1, "commits": 6 },
                "weekly_average": 2.5,
            })
        );
    }

    #[test]
    fn traffic_omits_missing_statistics()
    {
        let traffic = Traffic::Available {
            views:  Some(TrafficCount {
                count: 4, uniques: 2,
            },),
            clones: None,
        };
        assert_eq!(
            serde_json::to_value(&traffic).expect("json"),
            json!({ "views": { "count": 4, "uniques": 2 } })
        );
    }

    #[test]
    fn subject_reference_reflects_target()
    {
        let target = classify("https://github.com/octocat/Hello-World",).expect("valid",);
        let subject = SubjectReference::from(&target,);
        assert_eq!(
            serde_json::to_value(&subject).expect("json"),
            json!({
                "kind": "repository",
                "reference": "octocat/Hello-World",
                "url": "https://github.com/octocat/Hello-World",
            })
        );
    }
}
