//! xdx.gg, a League of Legends statistics site serving the NA region.
//!
//! Everything that knows about the site's URLs or markup lives here.

pub mod parser;

use anyhow::anyhow;
use url::Url;

use crate::riot_id::RiotId;

pub const DEFAULT_BASE_URL: &str = "https://xdx.gg";

/// `https://xdx.gg/<name>-<tag>`, lower-cased, with spaces replaced by `-`.
pub fn profile_url(base_url: &Url, riot_id: &RiotId) -> anyhow::Result<Url> {
    let slug = format!("{}-{}", riot_id.name(), riot_id.tag())
        .replace(' ', "-")
        .to_lowercase();
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| anyhow!("{base_url} cannot be used as a base URL"))?
        .pop_if_empty()
        .push(&slug);
    Ok(url)
}
