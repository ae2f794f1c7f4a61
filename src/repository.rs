// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository details fetcher.
///
/// Reads the repository resource and its language breakdown and merges them
/// into a [`RepositoryDetails`] record.
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    decode::{Fields, NOT_AVAILABLE},
    error::FetchError,
    report::{RepositoryDetails, Section},
    transport::Transport,
};

/// Fetches the details of `owner/repository`.
///
/// A failed language read is absorbed as an empty mapping; any failure of
/// the main read becomes an error record.
pub async fn fetch_repository_details<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Section<RepositoryDetails,>
{
    let result = load(transport, owner, repository,).await;
    if let Err(error,) = &result {
        warn!("Error fetching repository details for {}/{}: {}", owner, repository, error);
    }
    result.into()
}

async fn load<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Result<RepositoryDetails, FetchError,>
{
    let route = format!("/repos/{owner}/{repository}");
    let data = transport.get(&route,).await?.into_success(&route,)?;
    let all_languages = load_languages(transport, &route,).await;

    Ok(details_from(&data, all_languages,),)
}

async fn load_languages<T: Transport,>(transport: &T, base_route: &str,) -> BTreeMap<String, u64,>
{
    let route = format!("{base_route}/languages");
    match transport.get(&route,).await {
        Ok(response,) if response.is_success() => languages_from(&response.body,),
        Ok(response,) => {
            debug!("{} returned HTTP {}, using empty language map", route, response.status);
            BTreeMap::new()
        }
        Err(error,) => {
            debug!("{} failed ({}), using empty language map", route, error);
            BTreeMap::new()
        }
    }
}

fn languages_from(body: &Value,) -> BTreeMap<String, u64,>
{
    body.as_object()
        .map(|languages| {
            languages
                .iter()
                .filter_map(|(name, bytes,)| bytes.as_u64().map(|bytes| (name.clone(), bytes,),),)
                .collect()
        },)
        .unwrap_or_default()
}

fn details_from(data: &Value, all_languages: BTreeMap<String, u64,>,) -> RepositoryDetails
{
    let fields = Fields::new(data,);

    RepositoryDetails {
        id: fields.count("id",),
        node_id: fields.text("node_id", NOT_AVAILABLE,),
        full_name: fields.text("full_name", NOT_AVAILABLE,),
        description: fields.nullable_text("description", "",),
        created_at: fields.text("created_at", NOT_AVAILABLE,),
        updated_at: fields.text("updated_at", NOT_AVAILABLE,),
        pushed_at: fields.text("pushed_at", NOT_AVAILABLE,),
        stargazers_count: fields.count("stargazers_count",),
        watchers_count: fields.count("watchers_count",),
        forks_count: fields.count("forks_count",),
        open_issues_count: fields.count("open_issues_count",),
        primary_language: fields.nullable_text("language", NOT_AVAILABLE,),
        all_languages,
        size: fields.count("size",),
        default_branch: fields.text("default_branch", NOT_AVAILABLE,),
        has_issues: fields.flag("has_issues",),
        has_wiki: fields.flag("has_wiki",),
        has_pages: fields.flag("has_pages",),
        has_projects: fields.flag("has_projects",),
        has_downloads: fields.flag("has_downloads",),
        archived: fields.flag("archived",),
        disabled: fields.flag("disabled",),
        topics: fields.strings("topics",),
        homepage: fields.nullable_text("homepage", "",),
        fork: fields.flag("fork",),
        parent: fields.nested_text("parent", "full_name",),
        source: fields.nested_text("source", "full_name",),
        license: fields.nested_text("license", "name",),
    }
}
