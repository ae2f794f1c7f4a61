// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Collaborators fetcher.
///
/// The collaborators endpoint requires push access, so anonymous callers
/// usually receive a non-success status. That case yields an empty list
/// instead of an error record.
use tracing::{debug, warn};

use crate::{
    decode::{Fields, NOT_AVAILABLE},
    error::FetchError,
    report::{Collaborator, Collaborators, Section},
    transport::Transport,
};

const PREVIEW_LIMIT: usize = 5;

/// Fetches the first page of collaborators of `owner/repository`.
pub async fn fetch_collaborators<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Section<Collaborators,>
{
    let result = load(transport, owner, repository,).await;
    if let Err(error,) = &result {
        warn!("Error fetching collaborators for {}/{}: {}", owner, repository, error);
    }
    result.into()
}

async fn load<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Result<Collaborators, FetchError,>
{
    let route = format!("/repos/{owner}/{repository}/collaborators");
    let response = transport.get(&route,).await?;
    if !response.is_success() {
        debug!("{} returned HTTP {}, treating as empty", route, response.status);
    }
    let collaborators = response.into_collection();

    Ok(Collaborators {
        total_collaborators: collaborators.len() as u64,
        collaborators:       collaborators
            .iter()
            .take(PREVIEW_LIMIT,)
            .map(|collaborator| {
                let fields = Fields::new(collaborator,);
                Collaborator {
                    login: fields.text("login", NOT_AVAILABLE,), id: fields.count("id",),
                }
            },)
            .collect(),
    },)
}
