// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Owner profile fetcher.
///
/// Reads the user resource plus the public events, owned repositories,
/// followers and following collections, and reduces them to an
/// [`OwnerProfile`] record.
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    decode::{Fields, NOT_AVAILABLE, logins},
    error::FetchError,
    report::{ActivityEntry, OwnerProfile, RepoSummary, Section},
    transport::Transport,
};

/// Number of logins kept in follower and following previews.
const PREVIEW_LIMIT: usize = 5;
/// Number of events kept in the activity feed.
const ACTIVITY_LIMIT: usize = 10;

/// Fetches the profile of `owner`.
///
/// The user read must succeed. Collections answering with a non-success
/// status count as empty.
pub async fn fetch_owner_profile<T: Transport,>(transport: &T, owner: &str,) -> Section<OwnerProfile,>
{
    let result = load(transport, owner,).await;
    if let Err(error,) = &result {
        warn!("Error fetching owner profile for {}: {}", owner, error);
    }
    result.into()
}

async fn load<T: Transport,>(transport: &T, owner: &str,) -> Result<OwnerProfile, FetchError,>
{
    let route = format!("/users/{owner}");
    let user = transport.get(&route,).await?.into_success(&route,)?;

    let events = read_collection(transport, &format!("{route}/events/public"),).await?;
    let repositories = read_collection(transport, &format!("{route}/repos"),).await?;
    let followers = read_collection(transport, &format!("{route}/followers"),).await?;
    let following = read_collection(transport, &format!("{route}/following"),).await?;

    debug!(
        "{}: {} events, {} repositories, {} followers, {} following",
        owner,
        events.len(),
        repositories.len(),
        followers.len(),
        following.len()
    );

    let fields = Fields::new(&user,);
    Ok(OwnerProfile {
        user_id:          fields.count("id",),
        node_id:          fields.text("node_id", NOT_AVAILABLE,),
        login:            fields.text("login", NOT_AVAILABLE,),
        account_type:     fields.text("type", NOT_AVAILABLE,),
        avatar_url:       fields.text("avatar_url", "",),
        html_url:         fields.text("html_url", "",),
        created_at:       fields.text("created_at", NOT_AVAILABLE,),
        updated_at:       fields.text("updated_at", NOT_AVAILABLE,),
        public_repos:     fields.count("public_repos",),
        public_gists:     fields.count("public_gists",),
        followers:        followers.len() as u64,
        following:        following.len() as u64,
        follower_list:    logins(&followers, PREVIEW_LIMIT,),
        following_list:   logins(&following, PREVIEW_LIMIT,),
        hireable:         fields.nullable_flag("hireable",),
        blog:             fields.nullable_text("blog", "",),
        location:         fields.nullable_text("location", "",),
        email:            fields.nullable_text("email", "",),
        bio:              fields.nullable_text("bio", "",),
        twitter_username: fields.nullable_text("twitter_username", "",),
        company:          fields.nullable_text("company", "",),
        public_activity:  activity_feed(&events,),
        repo_summary:     summarize_repositories(&repositories,),
    },)
}

/// Reads a collection, treating a non-success status as empty.
///
/// # Errors
///
/// Propagates transport failures.
async fn read_collection<T: Transport,>(transport: &T, route: &str,) -> Result<Vec<Value,>, FetchError,>
{
    let response = transport.get(route,).await?;
    if !response.is_success() {
        debug!("{} returned HTTP {}, treating as empty", route, response.status);
    }
    Ok(response.into_collection(),)
}

fn activity_feed(events: &[Value],) -> Vec<ActivityEntry,>
{
    events
        .iter()
        .take(ACTIVITY_LIMIT,)
        .map(|event| {
            let fields = Fields::new(event,);
            ActivityEntry {
                event_type: fields.text("type", NOT_AVAILABLE,),
                repo:       fields
                    .nested_text("repo", "name",)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_owned(),),
                created_at: fields.text("created_at", NOT_AVAILABLE,),
                action:     fields
                    .nested_text("payload", "action",)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_owned(),),
            }
        },)
        .collect()
}

/// Summarizes the fetched repositories.
///
/// `most_starred` and `total_forks` are `0` for an empty collection.
pub(crate) fn summarize_repositories(repositories: &[Value],) -> RepoSummary
{
    RepoSummary {
        total_public_repos: repositories.len() as u64,
        repo_names:         repositories
            .iter()
            .take(PREVIEW_LIMIT,)
            .map(|repository| Fields::new(repository,).text("name", NOT_AVAILABLE,),)
            .collect(),
        most_starred:       repositories
            .iter()
            .map(|repository| Fields::new(repository,).count("stargazers_count",),)
            .max()
            .unwrap_or(0,),
        total_forks:        repositories
            .iter()
            .map(|repository| Fields::new(repository,).count("forks_count",),)
            .sum(),
    }
}
