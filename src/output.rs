use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDateTime;
use fs_err::File;
use lol_scraping_utils::regex;

use crate::row::OutputRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Where the table goes: always inside `output_dir`.
///
/// Without a requested name the file is `<prefix>_<timestamp>.csv`.
/// A requested name keeps only its file name and gets `_<timestamp>` before
/// the extension, unless it already ends with `_YYYYMMDD_HHMMSS`.
pub fn resolve_output_path(
    output_dir: &Path,
    prefix: &str,
    requested: Option<&Path>,
    now: NaiveDateTime,
) -> PathBuf {
    let file_name = match requested {
        None => format!("{prefix}_{}.csv", timestamp(now)),
        Some(requested) => {
            let stem = requested
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let extension = requested
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            if has_timestamp_suffix(&stem) {
                format!("{stem}{extension}")
            } else {
                format!("{stem}_{}{extension}", timestamp(now))
            }
        }
    };
    output_dir.join(file_name)
}

fn has_timestamp_suffix(stem: &str) -> bool {
    regex!(r"(?:^|_)[0-9]{8}_[0-9]{6}$").is_match(stem)
}

/// Writes the whole table at once, with a BOM so that spreadsheets detect UTF-8.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> anyhow::Result<()> {
    (|| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(UTF8_BOM)?;
        let mut writer = csv::Writer::from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        anyhow::Ok(())
    })()
    .with_context(|| format!("While writing {} rows to {path:?}", rows.len()))
}
