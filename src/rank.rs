use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Ordinal strength of a rank label, from 0 (unranked or unknown) to 11 (diamond).
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Default,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RankScore(u8);

impl RankScore {
    pub fn get(self) -> u8 {
        self.0
    }
}

const DIAMOND: u8 = 11;
const SILVER: u8 = 2;

/// A tier whose score depends on its division.
struct DividedTier {
    /// Spellings accepted by the exact table; also the substrings tested by the fallback.
    names: &'static [&'static str],
    /// Scores of divisions 1 to 4.
    divisions: [u8; 4],
    /// Fallback score when no division marker is found.
    default: u8,
}

// Checked in this order by the substring fallback.
const DIVIDED_TIERS: [DividedTier; 3] = [
    DividedTier {
        names: &["emerald"],
        divisions: [10, 9, 8, 7],
        default: 7,
    },
    DividedTier {
        names: &["platinum", "plat"],
        divisions: [7, 6, 6, 5],
        default: 5,
    },
    DividedTier {
        names: &["gold"],
        divisions: [4, 4, 3, 3],
        default: 3,
    },
];

pub fn rank_score(label: &str) -> RankScore {
    let label = label.trim().to_lowercase();
    let score = match label.as_str() {
        "" | "unranked" | "error" => 0,
        "diamond" => DIAMOND,
        "silver" => SILVER,
        label => exact_divided(label).unwrap_or_else(|| by_substring(label)),
    };
    RankScore(score)
}

/// `"<tier> <division>"` with a known tier spelling and division `1`-`4` or `i`-`iv`.
fn exact_divided(label: &str) -> Option<u8> {
    let (name, division) = label.split_once(' ')?;
    let division = match division {
        "1" | "i" => 0,
        "2" | "ii" => 1,
        "3" | "iii" => 2,
        "4" | "iv" => 3,
        _ => return None,
    };
    DIVIDED_TIERS
        .iter()
        .find(|tier| tier.names.contains(&name))
        .map(|tier| tier.divisions[division])
}

fn by_substring(label: &str) -> u8 {
    if label.contains("diamond") {
        return DIAMOND;
    }
    if let Some(tier) = DIVIDED_TIERS
        .iter()
        .find(|tier| tier.names.iter().any(|name| label.contains(name)))
    {
        return division_marker(label).map_or(tier.default, |d| tier.divisions[d]);
    }
    if label.contains("silver") {
        return SILVER;
    }
    0
}

/// Index of the first division whose digit or numeral occurs anywhere in `label`.
///
/// Divisions are tried from 1 to 4 and the numerals are plain substrings,
/// so `"platinum iv 20lp"` resolves to division 1 through the `i` in `platinum`.
fn division_marker(label: &str) -> Option<usize> {
    [("1", "i"), ("2", "ii"), ("3", "iii"), ("4", "iv")]
        .iter()
        .position(|(digit, numeral)| label.contains(digit) || label.contains(numeral))
}

#[cfg(test)]
mod tests {
    use super::rank_score;

    fn score(label: &str) -> u8 {
        rank_score(label).get()
    }

    #[test]
    fn table_entries() {
        let table = [
            ("diamond", 11),
            ("emerald 1", 10),
            ("emerald 2", 9),
            ("emerald 3", 8),
            ("emerald 4", 7),
            ("emerald i", 10),
            ("emerald ii", 9),
            ("emerald iii", 8),
            ("emerald iv", 7),
            ("platinum 1", 7),
            ("platinum 2", 6),
            ("platinum 3", 6),
            ("platinum 4", 5),
            ("plat 1", 7),
            ("plat 2", 6),
            ("plat 3", 6),
            ("plat 4", 5),
            ("platinum i", 7),
            ("platinum ii", 6),
            ("platinum iii", 6),
            ("platinum iv", 5),
            ("gold 1", 4),
            ("gold 2", 4),
            ("gold 3", 3),
            ("gold 4", 3),
            ("gold i", 4),
            ("gold ii", 4),
            ("gold iii", 3),
            ("gold iv", 3),
            ("silver", 2),
        ];
        for (label, expected) in table {
            assert_eq!(score(label), expected, "{label}");
            assert_eq!(score(&label.to_uppercase()), expected, "{label}");
            assert_eq!(score(&format!("  {label}\t")), expected, "{label}");
        }
    }

    #[test]
    fn sentinels_score_zero() {
        assert_eq!(score(""), 0);
        assert_eq!(score("   "), 0);
        assert_eq!(score("Unranked"), 0);
        assert_eq!(score("ERROR"), 0);
    }

    #[test]
    fn arabic_and_roman_divisions_agree() {
        assert_eq!(score("Emerald 1"), 10);
        assert_eq!(score("Emerald I"), 10);
        assert_eq!(score("Platinum IV"), 5);
        assert_eq!(score("Gold 3"), 3);
        assert_eq!(score("Silver"), 2);
    }

    #[test]
    fn substring_fallback() {
        assert_eq!(score("Diamond IV"), 11);
        assert_eq!(score("Diamond 2 75 LP"), 11);
        assert_eq!(score("Emerald"), 7);
        assert_eq!(score("emerald-3"), 8);
        assert_eq!(score("Gold"), 3);
        assert_eq!(score("gold2"), 4);
        assert_eq!(score("Silver IV"), 2);
        assert_eq!(score("SomeRandomText"), 0);
        assert_eq!(score("Bronze II"), 0);
    }

    #[test]
    fn first_division_marker_wins() {
        // Both "1" and "2" occur; division 1 is checked first.
        assert_eq!(score("Emerald 2 (peak 1)"), 10);
        // The `i` of "platinum" counts as a division 1 marker.
        assert_eq!(score("Platinum IV 20LP"), 7);
        assert_eq!(score("Plat"), 5);
        assert_eq!(score("Platinum"), 7);
    }
}
