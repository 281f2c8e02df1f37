use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::riot_id::RiotId;

pub const REGION: &str = "NA";
pub const UNRANKED: &str = "Unranked";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchOutcome {
    Win,
    Lose,
    #[default]
    Unknown,
}

#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, CopyGetters, Serialize, Deserialize)]
pub struct MatchSummary {
    #[builder(default = "Unknown".to_owned(), setter(into))]
    #[getset(get = "pub")]
    champion: String,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    outcome: MatchOutcome,
    #[builder(default = "0/0/0".to_owned(), setter(into))]
    #[getset(get = "pub")]
    kda: String,
    #[builder(default = "Ranked Solo".to_owned(), setter(into))]
    #[getset(get = "pub")]
    game_mode: String,
}

/// The site's rolling aggregate over the last 90 days.
#[derive(Clone, PartialEq, Debug, Default, TypedBuilder, Getters, CopyGetters, Serialize, Deserialize)]
pub struct RecentActivity {
    #[builder(default)]
    #[getset(get_copy = "pub")]
    solo_duo_games: u32,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    solo_duo_winrate: f64,
    #[builder(default, setter(into))]
    #[getset(get = "pub")]
    top_champion: String,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    top_champion_pick: u32,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    top_champion_winrate: f64,
}

/// Everything extracted from one profile page.
///
/// Every field but `riot_id` has a default, so a page missing any section
/// still yields a record: numbers are zero, texts are empty, and `rank`
/// is [`UNRANKED`].
#[derive(Clone, PartialEq, Debug, TypedBuilder, Getters, CopyGetters, Serialize, Deserialize)]
pub struct AccountRecord {
    #[getset(get = "pub")]
    riot_id: RiotId,
    #[builder(default = REGION.to_owned(), setter(into))]
    #[getset(get = "pub")]
    region: String,
    #[builder(default = UNRANKED.to_owned(), setter(into))]
    #[getset(get = "pub")]
    rank: String,
    #[builder(default, setter(into))]
    #[getset(get = "pub")]
    tier: String,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    league_points: u32,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    win_rate: f64,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    wins: u32,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    losses: u32,
    /// Most recent first, at most 10.
    #[builder(default)]
    #[getset(get = "pub")]
    matches: Vec<MatchSummary>,
    #[builder(default)]
    #[getset(get = "pub")]
    recent_90_days: RecentActivity,
    #[builder(default, setter(into))]
    #[getset(get = "pub")]
    last_season_rank: String,
    /// Average rank labels of the latest matches, joined with `", "`.
    #[builder(default, setter(into))]
    #[getset(get = "pub")]
    recent_opponent_ranks: String,
}

#[cfg(test)]
mod tests {
    use super::{AccountRecord, MatchOutcome, MatchSummary, REGION, UNRANKED};
    use crate::riot_id::RiotId;

    #[test]
    fn record_defaults() {
        let record = AccountRecord::builder()
            .riot_id(RiotId::parse("Foo#NA1"))
            .build();
        assert_eq!(record.region(), REGION);
        assert_eq!(record.rank(), UNRANKED);
        assert_eq!(record.tier(), "");
        assert_eq!(record.league_points(), 0);
        assert_eq!(record.win_rate(), 0.);
        assert!(record.matches().is_empty());
        assert_eq!(record.recent_90_days().solo_duo_games(), 0);
        assert_eq!(record.recent_90_days().top_champion(), "");
        assert_eq!(record.last_season_rank(), "");
        assert_eq!(record.recent_opponent_ranks(), "");
    }

    #[test]
    fn match_summary_defaults() {
        let summary = MatchSummary::builder().build();
        assert_eq!(summary.champion(), "Unknown");
        assert_eq!(summary.outcome(), MatchOutcome::Unknown);
        assert_eq!(summary.kda(), "0/0/0");
        assert_eq!(summary.game_mode(), "Ranked Solo");
    }

    #[test]
    fn outcome_serializes_uppercase() {
        let json = serde_json::to_string(&[MatchOutcome::Win, MatchOutcome::Lose]).unwrap();
        assert_eq!(json, r#"["WIN","LOSE"]"#);
    }
}
