use derive_more::{AsRef, Display, From};
use getset::Getters;
use lol_scraping_utils::regex;
use serde::{Deserialize, Serialize};

/// Tag assumed when an identifier carries no `#<tag>` part.
pub const DEFAULT_TAG: &str = "NA1";

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct PlayerName(String);

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct Tag(String);

/// An account identifier of the form `name#tag`.
#[derive(Clone, PartialEq, Eq, Debug, Getters, Display, Serialize, Deserialize)]
#[display("{name}#{tag}")]
#[getset(get = "pub")]
pub struct RiotId {
    name: PlayerName,
    tag: Tag,
}

impl RiotId {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: PlayerName(name.into()),
            tag: Tag(tag.into()),
        }
    }

    /// Splits `"karlphets #na1"` into `("karlphets", "NA1")`.
    /// Anything without a non-empty name before `#` is taken as a bare name.
    pub fn parse(input: &str) -> Self {
        match regex!(r"^(.+?)\s*#(.+)").captures(input) {
            Some(captures) => Self::new(
                captures[1].trim(),
                captures[2].trim().to_uppercase(),
            ),
            None => Self::new(input.trim(), DEFAULT_TAG),
        }
    }
}

impl From<&str> for RiotId {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}
