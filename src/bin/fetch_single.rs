use std::path::PathBuf;

use clap::Parser;
use lol_scraping::{
    batch::AccountSource, browser::BrowserSession, config::Config, riot_id::RiotId, row::build_row,
};
use lol_scraping_utils::fs_util::write_json_pretty;

/// Fetches a single account and dumps everything extracted from its profile page.
#[derive(Parser)]
struct Opts {
    #[arg(default_value = "karlphets#NA1")]
    identifier: String,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write the extracted record to this JSON file.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();
    let config = Config::load(opts.config.as_deref())?;

    let riot_id = RiotId::parse(&opts.identifier);
    let record = {
        let mut session = BrowserSession::launch(&config)?;
        session.fetch(&riot_id)?
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    if let Some(path) = &opts.save {
        write_json_pretty(path, &record)?;
        println!("Saved to {}", path.display());
    }

    let row = build_row(&record);
    println!();
    println!("{riot_id}");
    println!(
        "  Rank: {} ({} LP), score {}",
        row.rank(),
        row.lp(),
        row.rank_score()
    );
    println!(
        "  Win rate: {}% ({}W {}L)",
        row.win_rate(),
        row.wins(),
        row.losses()
    );
    println!(
        "  Last 90 days: {} games, {}% win rate, mostly {}",
        row.recent_90d_solo_duo_games(),
        row.recent_90d_solo_duo_winrate(),
        row.recent_90d_top_champion()
    );
    println!("  Last season: {}", row.last_season_rank());
    println!(
        "  Recent opponents: {} (hidden score {})",
        row.recent_opponent_ranks(),
        row.hidden_rank_score()
    );
    println!(
        "  Recent win rate: {}% of 10, {}% of 3",
        row.recent_10_winrate(),
        row.recent_3_winrate()
    );
    Ok(())
}
