use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use clap::Parser;
use log::info;
use lol_scraping::{
    batch::{rank_breakdown, scrape_batch, BatchError},
    browser::BrowserSession,
    config::Config,
    input::read_identifiers,
    output::{resolve_output_path, write_csv},
    row::OutputRow,
};

/// Collects ranked-ladder statistics of League of Legends accounts from xdx.gg into a CSV file.
#[derive(Parser)]
struct Opts {
    /// Text file with one `name#tag` per line.
    identifiers_path: PathBuf,
    /// Name of the CSV file; it is always placed in the output directory.
    output_path: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<BatchError>() {
                Some(BatchError::Interrupted { .. }) => {
                    info!("{e}");
                    println!("\nInterrupted by user.");
                }
                None => eprintln!("Error: {e:?}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let config = Config::load(opts.config.as_deref())?;
    let identifiers = read_identifiers(&opts.identifiers_path)?;
    println!(
        "Loaded {} accounts from {}",
        identifiers.len(),
        opts.identifiers_path.display()
    );

    fs_err::create_dir_all(&config.output_dir)?;
    let output_path = resolve_output_path(
        &config.output_dir,
        &config.file_prefix,
        opts.output_path.as_deref(),
        chrono::Local::now().naive_local(),
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("Failed to install the Ctrl-C handler")?;
    }

    let rows = {
        let mut session = BrowserSession::launch(&config)?;
        scrape_batch(
            &mut session,
            &identifiers,
            config.request_interval,
            &interrupted,
        )?
    };

    write_csv(&output_path, &rows)?;
    info!("Saved {} rows to {output_path:?}", rows.len());
    print_summary(&output_path, &rows);
    Ok(())
}

fn print_summary(output_path: &Path, rows: &[OutputRow]) {
    let succeeded = rows.iter().filter(|row| !row.is_error()).count();
    println!();
    println!("Saved to {}", output_path.display());
    println!("Succeeded: {succeeded}/{}", rows.len());
    println!("Rank breakdown:");
    for (rank, count) in rank_breakdown(rows) {
        println!("  {rank}: {count}");
    }
}
