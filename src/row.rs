use getset::{CopyGetters, Getters};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    rank::{rank_score, RankScore},
    riot_id::RiotId,
    schema::{AccountRecord, MatchOutcome, MatchSummary},
};

/// Rank written in place of a label when the account could not be fetched.
pub const ERROR_RANK: &str = "ERROR";

const RECENT_MATCHES: usize = 10;
const LATEST_MATCHES: usize = 3;
const OPPONENT_RANK_SAMPLES: usize = 3;

/// One line of the output table. Field names are the CSV header.
#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize)]
pub struct OutputRow {
    #[getset(get = "pub")]
    username: String,
    #[getset(get = "pub")]
    tag: String,
    #[getset(get = "pub")]
    rank: String,
    #[getset(get_copy = "pub")]
    lp: u32,
    #[getset(get_copy = "pub")]
    rank_score: RankScore,
    #[getset(get_copy = "pub")]
    win_rate: f64,
    #[getset(get_copy = "pub")]
    wins: u32,
    #[getset(get_copy = "pub")]
    losses: u32,
    #[getset(get_copy = "pub")]
    recent_90d_solo_duo_games: u32,
    #[getset(get_copy = "pub")]
    recent_90d_solo_duo_winrate: f64,
    #[getset(get = "pub")]
    recent_90d_top_champion: String,
    #[getset(get_copy = "pub")]
    recent_90d_top_champion_pick: u32,
    #[getset(get_copy = "pub")]
    recent_90d_top_champion_winrate: f64,
    #[getset(get = "pub")]
    last_season_rank: String,
    #[getset(get = "pub")]
    recent_opponent_ranks: String,
    #[getset(get_copy = "pub")]
    hidden_rank_score: RankScore,
    #[getset(get_copy = "pub")]
    recent_10_winrate: f64,
    #[getset(get_copy = "pub")]
    recent_3_winrate: f64,
}

impl OutputRow {
    pub fn is_error(&self) -> bool {
        self.rank == ERROR_RANK
    }
}

pub fn build_row(record: &AccountRecord) -> OutputRow {
    let recent = record.recent_90_days();
    let matches = &record.matches()[..record.matches().len().min(RECENT_MATCHES)];
    let latest = &matches[..matches.len().min(LATEST_MATCHES)];
    OutputRow {
        username: record.riot_id().name().to_string(),
        tag: record.riot_id().tag().to_string(),
        rank: record.rank().clone(),
        lp: record.league_points(),
        rank_score: rank_score(record.rank()),
        win_rate: record.win_rate(),
        wins: record.wins(),
        losses: record.losses(),
        recent_90d_solo_duo_games: recent.solo_duo_games(),
        recent_90d_solo_duo_winrate: recent.solo_duo_winrate(),
        recent_90d_top_champion: recent.top_champion().clone(),
        recent_90d_top_champion_pick: recent.top_champion_pick(),
        recent_90d_top_champion_winrate: recent.top_champion_winrate(),
        last_season_rank: record.last_season_rank().clone(),
        recent_opponent_ranks: record.recent_opponent_ranks().clone(),
        hidden_rank_score: hidden_rank_score(record.recent_opponent_ranks()),
        recent_10_winrate: win_rate_percent(matches),
        recent_3_winrate: win_rate_percent(latest),
    }
}

pub fn build_error_row(identifier: &str) -> OutputRow {
    let riot_id = RiotId::parse(identifier);
    OutputRow {
        username: riot_id.name().to_string(),
        tag: riot_id.tag().to_string(),
        rank: ERROR_RANK.to_owned(),
        lp: 0,
        rank_score: RankScore::default(),
        win_rate: 0.,
        wins: 0,
        losses: 0,
        recent_90d_solo_duo_games: 0,
        recent_90d_solo_duo_winrate: 0.,
        recent_90d_top_champion: String::new(),
        recent_90d_top_champion_pick: 0,
        recent_90d_top_champion_winrate: 0.,
        last_season_rank: String::new(),
        recent_opponent_ranks: String::new(),
        hidden_rank_score: RankScore::default(),
        recent_10_winrate: 0.,
        recent_3_winrate: 0.,
    }
}

/// Ceiling of the mean score of the first three comma-separated labels.
pub fn hidden_rank_score(labels: &str) -> RankScore {
    let scores = labels
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .take(OPPONENT_RANK_SAMPLES)
        .map(|label| u32::from(rank_score(label).get()))
        .collect_vec();
    if scores.is_empty() {
        return RankScore::default();
    }
    let total: u32 = scores.iter().sum();
    let mean = total.div_ceil(scores.len() as u32);
    // Mean of scores that fit in `u8` fits in `u8` too.
    RankScore::from(mean as u8)
}

/// Percentage of wins, rounded to 2 decimal places; 0 for no matches.
pub fn win_rate_percent(matches: &[MatchSummary]) -> f64 {
    if matches.is_empty() {
        return 0.;
    }
    let wins = matches
        .iter()
        .filter(|m| m.outcome() == MatchOutcome::Win)
        .count();
    round_to_hundredths(wins as f64 / matches.len() as f64 * 100.)
}

fn round_to_hundredths(x: f64) -> f64 {
    (x * 100.).round() / 100.
}
