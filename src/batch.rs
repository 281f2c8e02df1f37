use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread::sleep,
    time::Duration,
};

use itertools::Itertools;
use log::{debug, warn};

use crate::{
    riot_id::RiotId,
    row::{build_error_row, build_row, OutputRow},
    schema::AccountRecord,
};

/// Something that turns an account identifier into an extracted record.
pub trait AccountSource {
    fn fetch(&mut self, riot_id: &RiotId) -> anyhow::Result<AccountRecord>;
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Interrupted by the user after {done} of {total} accounts.")]
    Interrupted { done: usize, total: usize },
}

/// Fetches every identifier in order, one row each.
///
/// A failed fetch becomes an error row and is never retried. `interval` is
/// slept between two fetches. Once `interrupted` is set, the batch stops
/// and its rows are discarded.
pub fn scrape_batch<S: AccountSource>(
    source: &mut S,
    identifiers: &[String],
    interval: Duration,
    interrupted: &AtomicBool,
) -> Result<Vec<OutputRow>, BatchError> {
    let total = identifiers.len();
    let check = |done| {
        if interrupted.load(Ordering::SeqCst) {
            Err(BatchError::Interrupted { done, total })
        } else {
            Ok(())
        }
    };

    let mut rows = Vec::with_capacity(total);
    for (i, identifier) in identifiers.iter().enumerate() {
        check(i)?;
        println!("[{}/{}] {}", i + 1, total, identifier);
        let riot_id = RiotId::parse(identifier);
        match source.fetch(&riot_id) {
            Ok(record) => {
                debug!("Extracted {record:?}");
                let row = build_row(&record);
                println!("  ✓ {} #{} - {}", row.username(), row.tag(), row.rank());
                rows.push(row);
            }
            Err(e) => {
                warn!("Failed to fetch {identifier}: {e:?}");
                println!("  ✗ failed: {e:#}");
                rows.push(build_error_row(identifier));
            }
        }
        if i + 1 < total {
            sleep(interval);
        }
    }
    check(total)?;
    Ok(rows)
}

/// Number of rows per rank label, most frequent first; error rows are left out.
pub fn rank_breakdown(rows: &[OutputRow]) -> Vec<(&str, usize)> {
    rows.iter()
        .filter(|row| !row.is_error())
        .map(|row| row.rank().as_str())
        .counts()
        .into_iter()
        .sorted_by(|(rank_x, count_x), (rank_y, count_y)| {
            count_y.cmp(count_x).then_with(|| rank_x.cmp(rank_y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        time::Duration,
    };

    use anyhow::bail;

    use super::{rank_breakdown, scrape_batch, AccountSource, BatchError};
    use crate::{
        riot_id::RiotId,
        row::build_row,
        schema::{AccountRecord, MatchOutcome, MatchSummary},
    };

    /// Answers from a fixed table and remembers what was asked.
    #[derive(Default)]
    struct FakeSource {
        ranks: Vec<(&'static str, &'static str)>,
        requested: Vec<RiotId>,
        interrupt_after: Option<(usize, Arc<AtomicBool>)>,
    }

    impl AccountSource for FakeSource {
        fn fetch(&mut self, riot_id: &RiotId) -> anyhow::Result<AccountRecord> {
            self.requested.push(riot_id.clone());
            if let Some((after, flag)) = &self.interrupt_after {
                if self.requested.len() == *after {
                    flag.store(true, Ordering::SeqCst);
                }
            }
            let Some(&(_, rank)) = self
                .ranks
                .iter()
                .find(|(name, _)| riot_id.name().to_string() == *name)
            else {
                bail!("Profile page of {riot_id} did not load");
            };
            Ok(AccountRecord::builder()
                .riot_id(riot_id.clone())
                .rank(rank)
                .league_points(50)
                .matches(vec![MatchSummary::builder()
                    .outcome(MatchOutcome::Win)
                    .build()])
                .build())
        }
    }

    fn identifiers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn failed_fetch_becomes_error_row_in_place() {
        let mut source = FakeSource {
            ranks: vec![("Alpha", "Gold II"), ("Gamma", "Emerald I")],
            ..Default::default()
        };
        let flag = AtomicBool::new(false);
        let rows = scrape_batch(
            &mut source,
            &identifiers(&["Alpha#NA1", "Beta", "Gamma#na1"]),
            Duration::ZERO,
            &flag,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter()
                .map(|r| (r.username().as_str(), r.rank().as_str()))
                .collect::<Vec<_>>(),
            [("Alpha", "Gold II"), ("Beta", "ERROR"), ("Gamma", "Emerald I")]
        );
        assert_eq!(rows[0].lp(), 50);
        assert_eq!(rows[0].recent_10_winrate(), 100.);
        assert_eq!(rows[1].tag(), "NA1");
        assert_eq!(rows[1].lp(), 0);
        assert_eq!(rows[2].tag(), "NA1");
        assert_eq!(rows[2].rank_score().get(), 10);

        assert_eq!(
            rank_breakdown(&rows),
            [("Emerald I", 1), ("Gold II", 1)]
        );
    }

    #[test]
    fn each_identifier_is_fetched_once_in_order() {
        let mut source = FakeSource::default();
        let flag = AtomicBool::new(false);
        let rows = scrape_batch(
            &mut source,
            &identifiers(&["B#NA1", "A#NA1", "B#NA1"]),
            Duration::ZERO,
            &flag,
        )
        .unwrap();
        assert!(rows.iter().all(|r| r.is_error()));
        assert_eq!(
            source.requested,
            [
                RiotId::parse("B#NA1"),
                RiotId::parse("A#NA1"),
                RiotId::parse("B#NA1")
            ]
        );
    }

    #[test]
    fn interrupted_before_start() {
        let mut source = FakeSource::default();
        let flag = AtomicBool::new(true);
        let result = scrape_batch(&mut source, &identifiers(&["A"]), Duration::ZERO, &flag);
        assert!(matches!(
            result,
            Err(BatchError::Interrupted { done: 0, total: 1 })
        ));
        assert!(source.requested.is_empty());
    }

    #[test]
    fn interrupted_midway_discards_rows() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut source = FakeSource {
            ranks: vec![("A", "Silver"), ("B", "Silver"), ("C", "Silver")],
            interrupt_after: Some((2, flag.clone())),
            ..Default::default()
        };
        let result = scrape_batch(
            &mut source,
            &identifiers(&["A", "B", "C"]),
            Duration::ZERO,
            &flag,
        );
        assert!(matches!(
            result,
            Err(BatchError::Interrupted { done: 2, total: 3 })
        ));
        assert_eq!(source.requested.len(), 2);
    }

    #[test]
    fn interrupted_during_last_fetch() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut source = FakeSource {
            ranks: vec![("A", "Silver")],
            interrupt_after: Some((1, flag.clone())),
            ..Default::default()
        };
        let result = scrape_batch(&mut source, &identifiers(&["A"]), Duration::ZERO, &flag);
        assert!(matches!(
            result,
            Err(BatchError::Interrupted { done: 1, total: 1 })
        ));
    }

    #[test]
    fn breakdown_orders_by_count_then_label() {
        let row = |rank: &str| {
            build_row(
                &AccountRecord::builder()
                    .riot_id(RiotId::parse("X"))
                    .rank(rank)
                    .build(),
            )
        };
        let rows = [
            row("Silver"),
            row("Gold I"),
            row("Unranked"),
            row("Gold I"),
            crate::row::build_error_row("Y"),
            row("Bronze II"),
        ];
        assert_eq!(
            rank_breakdown(&rows),
            [("Gold I", 2), ("Bronze II", 1), ("Silver", 1), ("Unranked", 1)]
        );
    }
}
