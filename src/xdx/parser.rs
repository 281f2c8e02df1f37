//! Best-effort extraction of an [`AccountRecord`] from a rendered profile page.
//!
//! The site's markup is not a stable contract, so nothing here fails:
//! every extractor falls back to the record's defaults when its anchor is missing.

use std::collections::HashSet;

use itertools::Itertools;
use log::debug;
use lol_scraping_utils::{regex, selector};
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::{
    riot_id::RiotId,
    schema::{AccountRecord, MatchOutcome, MatchSummary, RecentActivity, UNRANKED},
};

const MAX_MATCHES: usize = 10;
const OPPONENT_RANK_MATCHES: usize = 3;

const TIERS: [&str; 7] = [
    "iron", "bronze", "silver", "gold", "platinum", "emerald", "diamond",
];
const SEASON_KEYWORDS: [&str; 6] = [
    "last season",
    "previous season",
    "season",
    "s13",
    "s14",
    "s15",
];

pub fn parse(html: &Html, riot_id: RiotId) -> AccountRecord {
    let root = html.root_element();
    let solo = find_solo_rank(root).unwrap_or_default();
    let rows = match_rows(root);
    let matches = rows
        .iter()
        .map(|&row| parse_match_row(row))
        .filter(|m| m.outcome() != MatchOutcome::Unknown)
        .take(MAX_MATCHES)
        .collect_vec();
    let recent_opponent_ranks = rows
        .iter()
        .take(OPPONENT_RANK_MATCHES)
        .filter_map(|&row| find_average_rank(row))
        .join(", ");
    debug!("Solo rank of {riot_id}: {solo:?}");
    debug!("{} matches, opponent ranks {recent_opponent_ranks:?}", matches.len());

    AccountRecord::builder()
        .riot_id(riot_id)
        .rank(solo.rank)
        .tier(solo.tier)
        .league_points(solo.league_points)
        .win_rate(solo.win_rate)
        .wins(solo.wins)
        .losses(solo.losses)
        .matches(matches)
        .recent_90_days(find_recent_activity(root).unwrap_or_default())
        .last_season_rank(find_last_season_rank(root).unwrap_or_default())
        .recent_opponent_ranks(recent_opponent_ranks)
        .build()
}

#[derive(Debug, PartialEq)]
struct SoloRank {
    rank: String,
    tier: String,
    league_points: u32,
    win_rate: f64,
    wins: u32,
    losses: u32,
}
impl Default for SoloRank {
    fn default() -> Self {
        Self {
            rank: UNRANKED.to_owned(),
            tier: String::new(),
            league_points: 0,
            win_rate: 0.,
            wins: 0,
            losses: 0,
        }
    }
}

fn find_solo_rank(root: ElementRef) -> Option<SoloRank> {
    root.select(selector!(r#"div[class*="SummonerRank_wrapper"]"#))
        .find_map(parse_rank_wrapper)
}

/// `None` unless the block is the Solo/Duo queue and carries a stats section.
fn parse_rank_wrapper(wrapper: ElementRef) -> Option<SoloRank> {
    let icon = wrapper
        .select(selector!(r#"div[class*="SummonerRank_rankicon"]"#))
        .next()?;
    if !stripped_text(icon).contains("Solo") {
        return None;
    }
    let mut tier = find_all_tags(icon, &["img"])
        .next()
        .and_then(|img| img.value().attr("alt"))
        .unwrap_or_default()
        .to_uppercase();

    let rank_text = find_rank_text(wrapper);
    if tier.is_empty() {
        if let Some(word) = rank_text
            .as_deref()
            .and_then(|text| regex!(r"^(\w+)").captures(text))
        {
            tier = word[1].to_uppercase();
        }
    }

    let stats = wrapper
        .select(selector!(r#"div[class*="SummonerRank_stats"]"#))
        .next()?;
    let mut solo = SoloRank {
        rank: rank_text.unwrap_or_else(|| tier.clone()),
        tier,
        ..Default::default()
    };
    for item in child_elements(stats, "div") {
        let text = stripped_text(item);
        if text.contains("LP") {
            if let Some(c) = regex!(r"(?i)(\d+)\s*LP").captures(&text) {
                solo.league_points = c[1].parse().unwrap_or_default();
            }
        }
        if text.to_lowercase().contains("win rate") || text.contains('%') {
            if let Some(c) = regex!(r"(\d+\.?\d*)\s*%").captures(&text) {
                solo.win_rate = c[1].parse().unwrap_or_default();
            }
        }
        if text.contains('W') && text.contains('L') {
            if let Some(c) = regex!(r"(?i)(\d+)\s*W.*?(\d+)\s*L").captures(&text) {
                solo.wins = c[1].parse().unwrap_or_default();
                solo.losses = c[2].parse().unwrap_or_default();
            }
        }
    }
    Some(solo)
}

/// Text like `"platinum I"`: first a div whose only text node contains it,
/// then any div whose whole text starts with it.
fn find_rank_text(wrapper: ElementRef) -> Option<String> {
    let pattern = regex!(r"(?i)\w+\s+[IVX\d]+");
    let anchored = regex!(r"(?i)^\w+\s+[IVX\d]+");
    let divs = || find_all_tags(wrapper, &["div"]);
    divs()
        .find(|div| own_string(*div).is_some_and(|s| pattern.is_match(s)))
        .or_else(|| divs().find(|div| anchored.is_match(&stripped_text(*div))))
        .map(stripped_text)
}

fn find_recent_activity(root: ElementRef) -> Option<RecentActivity> {
    let heading = root
        .select(selector!("h3"))
        .find(|h3| regex!(r"(?i)Last 90 Days").is_match(&h3.text().collect::<String>()))?;
    let container = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "div")?;

    let mut builder = RecentActivityFields::default();
    if let Some(queue) = container
        .select(selector!(r#"div[class*="RecentStats_queue"]"#))
        .find(|q| q.text().collect::<String>().contains("Solo/Duo"))
    {
        // <div>357 x</div><div>Solo/Duo</div><div>52.1%</div>
        let cells = child_elements(queue, "div").collect_vec();
        if cells.len() >= 3 {
            if let Some(c) = regex!(r"(\d+)").captures(&stripped_text(cells[0])) {
                builder.solo_duo_games = c[1].parse().unwrap_or_default();
            }
            if let Some(c) = regex!(r"(\d+\.?\d*)%").captures(&stripped_text(cells[2])) {
                builder.solo_duo_winrate = c[1].parse().unwrap_or_default();
            }
        }
    }

    // Rows are ordered by pick count, so the first is the most played.
    if let Some(row) = container
        .select(selector!(r#"div[class*="RecentStats_row"]"#))
        .next()
    {
        if let Some(alt) = row
            .select(selector!(r#"img[class*="Champ_champ"][alt]"#))
            .next()
            .and_then(|img| img.value().attr("alt"))
        {
            builder.top_champion = alt.to_owned();
        }
        let cells = child_elements(row, "div").collect_vec();
        if cells.len() >= 5 {
            let picks = stripped_text(cells[2]);
            if !picks.is_empty() && picks.chars().all(|c| c.is_ascii_digit()) {
                builder.top_champion_pick = picks.parse().unwrap_or_default();
            }
            if let Some(c) = regex!(r"(\d+)%").captures(&stripped_text(cells[4])) {
                builder.top_champion_winrate = c[1].parse().unwrap_or_default();
            }
        }
    }
    Some(builder.build())
}

#[derive(Default)]
struct RecentActivityFields {
    solo_duo_games: u32,
    solo_duo_winrate: f64,
    top_champion: String,
    top_champion_pick: u32,
    top_champion_winrate: f64,
}
impl RecentActivityFields {
    fn build(self) -> RecentActivity {
        RecentActivity::builder()
            .solo_duo_games(self.solo_duo_games)
            .solo_duo_winrate(self.solo_duo_winrate)
            .top_champion(self.top_champion)
            .top_champion_pick(self.top_champion_pick)
            .top_champion_winrate(self.top_champion_winrate)
            .build()
    }
}

/// Candidate match rows in document order, each element at most once.
fn match_rows(root: ElementRef) -> Vec<ElementRef> {
    let mut seen = HashSet::new();
    find_all(
        root,
        &["div", "table", "ul"],
        regex!(r"(?i)match|game|history|record"),
    )
    .flat_map(|container| {
        find_all(
            container,
            &["tr", "div", "li"],
            regex!(r"(?i)match|game|item|row"),
        )
        .take(MAX_MATCHES)
    })
    .filter(|row| seen.insert(row.id()))
    .collect()
}

fn parse_match_row(row: ElementRef) -> MatchSummary {
    let champion = find_all(row, &["img"], regex!(r"(?i)champion"))
        .next()
        .map(|img| img.value().attr("alt").unwrap_or("Unknown").to_owned())
        .or_else(|| {
            find_all(row, &["div", "span"], regex!(r"(?i)champion|name"))
                .next()
                .map(stripped_text)
        })
        .unwrap_or_else(|| "Unknown".to_owned());

    let outcome = match find_all(
        row,
        &["div", "span", "td"],
        regex!(r"(?i)result|outcome|victory|defeat"),
    )
    .next()
    {
        Some(result) => outcome_from_text(&stripped_text(result).to_lowercase()),
        None => {
            let classes = row.value().classes().map(str::to_lowercase).collect_vec();
            if classes.iter().any(|c| c.contains("win") || c.contains("victory")) {
                MatchOutcome::Win
            } else if classes.iter().any(|c| c.contains("loss") || c.contains("defeat")) {
                MatchOutcome::Lose
            } else {
                MatchOutcome::Unknown
            }
        }
    };

    let kda_pattern = regex!(r"\d+/\d+/\d+");
    let kda = find_all_tags(row, &["div", "span", "td"])
        .find_map(|e| own_string(e).filter(|s| kda_pattern.is_match(s)))
        .map_or_else(|| "0/0/0".to_owned(), |s| s.trim().to_owned());

    MatchSummary::builder()
        .champion(champion)
        .outcome(outcome)
        .kda(kda)
        .build()
}

fn outcome_from_text(lowered: &str) -> MatchOutcome {
    if lowered.contains("win") || lowered.contains("victory") {
        MatchOutcome::Win
    } else if lowered.contains("loss") || lowered.contains("defeat") {
        MatchOutcome::Lose
    } else {
        MatchOutcome::Unknown
    }
}

/// Average rank shown in a match row, e.g. `"Emerald III"`, without any LP that follows it.
fn find_average_rank(row: ElementRef) -> Option<String> {
    let text = row.text().collect::<String>();
    let labelled = [
        regex!(r"(?is)avg.*?rank.*?(\w+\s+[IVX]+)"),
        regex!(r"(?is)average.*?rank.*?(\w+\s+[IVX]+)"),
        regex!(r"(?is)rank.*?avg.*?(\w+\s+[IVX]+)"),
    ];
    if let Some(rank) = labelled
        .iter()
        .filter_map(|pattern| pattern.captures(&text))
        .map(|c| c[1].trim().to_owned())
        .find(|rank| names_tier(rank, &TIERS))
    {
        return Some(rank);
    }

    // A tier icon, with the division written somewhere around it.
    for img in find_all_tags(row, &["img"]) {
        let Some(tier) = img.value().attr("alt").filter(|alt| {
            regex!(r"(?i)iron|bronze|silver|gold|platinum|emerald|diamond|master").is_match(alt)
        }) else {
            continue;
        };
        let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\s+([IVX]+)", regex::escape(tier)))
        else {
            continue;
        };
        for ancestor in element_ancestors(img).take(3) {
            let text = ancestor.text().collect::<String>();
            if let Some(division) = division_without_lp(&pattern, &text, 1) {
                return Some(format!("{tier} {division}"));
            }
        }
    }

    let bare = regex!(r"(?i)\b(iron|bronze|silver|gold|platinum|emerald|diamond)\s+([IVX]+)");
    bare.captures_iter(&text)
        .find(|c| !followed_by_digit(&text, c.get(0).map_or(0, |m| m.end())))
        .map(|c| format!("{} {}", &c[1], &c[2]))
}

/// Capture group `group` of the first match of `pattern` that is not directly followed by a digit.
fn division_without_lp<'t>(pattern: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    pattern
        .captures_iter(text)
        .find(|c| !followed_by_digit(text, c.get(0).map_or(0, |m| m.end())))
        .and_then(|c| c.get(group))
        .map(|m| m.as_str())
}

fn followed_by_digit(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn find_last_season_rank(root: ElementRef) -> Option<String> {
    let rank_pattern = regex!(r"(?i)(\w+\s+[IVX\d]+)");
    let all_tiers = [
        "iron",
        "bronze",
        "silver",
        "gold",
        "platinum",
        "emerald",
        "diamond",
        "master",
        "grandmaster",
        "challenger",
    ];

    // Text mentioning a season, then up to three enclosing elements.
    for keyword in SEASON_KEYWORDS {
        let texts = root
            .descendants()
            .filter(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.to_lowercase().contains(keyword))
            })
            .collect_vec();
        for text_node in texts {
            let Some(parent) = text_node.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            for element in std::iter::once(parent).chain(element_ancestors(parent)).take(3) {
                let text = element.text().collect::<String>();
                if let Some(c) = rank_pattern.captures(&text) {
                    if names_tier(&c[1], &all_tiers) {
                        return Some(c[1].to_owned());
                    }
                }
            }
        }
    }

    find_all(
        root,
        &["div", "section"],
        regex!(r"(?i)history|season|previous|past"),
    )
    .map(|section| section.text().collect::<String>())
    .filter(|text| {
        let lowered = text.to_lowercase();
        ["season", "last", "previous"]
            .iter()
            .any(|k| lowered.contains(k))
    })
    .find_map(|text| {
        rank_pattern
            .captures(&text)
            .map(|c| c[1].to_owned())
            .filter(|rank| names_tier(rank, &TIERS))
    })
}

fn names_tier(rank: &str, tiers: &[&str]) -> bool {
    let lowered = rank.to_lowercase();
    tiers.iter().any(|tier| lowered.contains(tier))
}

/// Descendants (excluding `root`) with one of `tags` and a class matching `class`.
fn find_all<'a>(
    root: ElementRef<'a>,
    tags: &'a [&'a str],
    class: &'a Regex,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    find_all_tags(root, tags).filter(move |e| e.value().classes().any(|c| class.is_match(c)))
}

fn find_all_tags<'a>(
    root: ElementRef<'a>,
    tags: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| tags.contains(&e.value().name()))
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == tag)
}

fn element_ancestors<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap)
}

/// Text nodes trimmed and concatenated, skipping blank ones.
fn stripped_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// The single text of an element that has exactly one child, descending through
/// single-element chains; `None` for mixed or empty content.
fn own_string(element: ElementRef) -> Option<&str> {
    let mut children = element.children();
    let child = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match child.value().as_text() {
        Some(text) => Some(&**text),
        None => own_string(ElementRef::wrap(child)?),
    }
}
