// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contribution impact fetcher.
///
/// Sums stars and forks over the first page of the owner's repositories.
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    decode::Fields,
    error::FetchError,
    report::{Contributions, Section},
    transport::Transport,
};

/// Fetches the aggregate impact of `owner`.
///
/// The repositories collection is read on its own even though the owner
/// profile reads it too; a non-success status counts as an empty collection.
pub async fn fetch_contributions<T: Transport,>(transport: &T, owner: &str,) -> Section<Contributions,>
{
    let result = load(transport, owner,).await;
    if let Err(error,) = &result {
        warn!("Error fetching contributions for {}: {}", owner, error);
    }
    result.into()
}

async fn load<T: Transport,>(transport: &T, owner: &str,) -> Result<Contributions, FetchError,>
{
    let route = format!("/users/{owner}/repos");
    let response = transport.get(&route,).await?;
    if !response.is_success() {
        debug!("{} returned HTTP {}, treating as empty", route, response.status);
    }

    Ok(Contributions {
        total_contributions_impact: impact(&response.into_collection(),),
    },)
}

/// Sum of stars plus forks across `repositories`.
pub fn impact(repositories: &[Value],) -> u64
{
    repositories
        .iter()
        .map(|repository| {
            let fields = Fields::new(repository,);
            fields.count("stargazers_count",) + fields.count("forks_count",)
        },)
        .sum()
}
