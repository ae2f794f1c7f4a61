// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository traffic fetcher.
///
/// Traffic statistics are only visible to users with push access. Each of
/// the two statistics is included only when it could be read.
use tracing::warn;

use crate::{
    decode::Fields,
    error::FetchError,
    report::{Section, Traffic, TrafficCount},
    transport::{ApiResponse, Transport},
};

/// Note reported when neither statistic is readable.
pub const TRAFFIC_UNAVAILABLE_NOTE: &str = "Traffic data not publicly available";

/// Fetches view and clone statistics of `owner/repository`.
pub async fn fetch_traffic<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Section<Traffic,>
{
    let result = load(transport, owner, repository,).await;
    if let Err(error,) = &result {
        warn!("Error fetching traffic for {}/{}: {}", owner, repository, error);
    }
    result.into()
}

async fn load<T: Transport,>(
    transport: &T,
    owner: &str,
    repository: &str,
) -> Result<Traffic, FetchError,>
{
    let base = format!("/repos/{owner}/{repository}/traffic");
    let views = transport.get(&format!("{base}/views"),).await?;
    let clones = transport.get(&format!("{base}/clones"),).await?;

    Ok(match (traffic_count(&views,), traffic_count(&clones,),) {
        (None, None,) => Traffic::Unavailable {
            note: TRAFFIC_UNAVAILABLE_NOTE.to_owned(),
        },
        (views, clones,) => Traffic::Available {
            views,
            clones,
        },
    },)
}

fn traffic_count(response: &ApiResponse,) -> Option<TrafficCount,>
{
    response.is_success().then(|| {
        let fields = Fields::new(&response.body,);
        TrafficCount {
            count: fields.count("count",), uniques: fields.count("uniques",),
        }
    },)
}
