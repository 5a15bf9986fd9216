//! Logs command for viewing the log file written by interactive sessions

use anyhow::{Context, Result};
use clap::Args;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Seek, SeekFrom},
    path::Path,
    time::Duration,
};
use notify::{recommended_watcher, RecursiveMode, Watcher};
use tokio::time::interval;

use crate::config::Config;

/// View the artgrid log file
#[derive(Debug, Args)]
pub struct LogsCommand {
    /// Follow log output in real-time
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show from the end of the log
    #[arg(short, long, default_value = "100")]
    pub tail: usize,

    /// Filter logs by level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub level: Option<String>,
}

impl LogsCommand {
    /// Execute the logs command
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let log_file = config.log_file();

        if !log_file.exists() {
            eprintln!("No log file found at: {}", log_file.display());
            eprintln!("Run artgrid interactively at least once to generate logs.");
            return Ok(());
        }

        let file = File::open(&log_file)
            .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;
        for line in self.tail_lines(file)? {
            println!("{}", line);
        }

        if self.follow {
            self.follow_logs(&log_file).await?;
        }
        Ok(())
    }

    /// Last `tail` lines of the log that pass the level filter
    fn tail_lines<R: Read>(&self, reader: R) -> Result<Vec<String>> {
        let lines = BufReader::new(reader)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()?;

        let filtered: Vec<String> = lines.into_iter().filter(|line| self.matches_level(line)).collect();
        let skip = filtered.len().saturating_sub(self.tail);
        Ok(filtered.into_iter().skip(skip).collect())
    }

    /// Lines look like `<timestamp>  LEVEL target: message`
    fn matches_level(&self, line: &str) -> bool {
        match &self.level {
            Some(level) => line
                .split_whitespace()
                .nth(1)
                .map_or(false, |found| found.eq_ignore_ascii_case(level)),
            None => true,
        }
    }

    /// Print lines appended to the log until Ctrl+C. Watcher events drive the
    /// reads; the interval tick catches anything the watcher misses.
    async fn follow_logs(&self, log_file: &Path) -> Result<()> {
        let (tx, mut rx) = tokio::sync::mpsc::channel(100);

        let file_name = log_file.file_name().map(|name| name.to_os_string());
        let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    let _ = tx.try_send(());
                }
            }
        })?;

        let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
        watcher.watch(log_dir, RecursiveMode::NonRecursive)?;

        let mut position = std::fs::metadata(log_file)?.len();
        let mut ticker = interval(Duration::from_millis(500));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => return Ok(()),
                Some(()) = rx.recv() => self.print_new_lines(log_file, &mut position)?,
                _ = ticker.tick() => self.print_new_lines(log_file, &mut position)?,
            }
        }
    }

    fn print_new_lines(&self, log_file: &Path, position: &mut u64) -> Result<()> {
        for line in read_new_lines(log_file, position)? {
            if self.matches_level(&line) {
                println!("{}", line);
            }
        }
        Ok(())
    }
}

/// Lines appended after `position`, advancing it to the end of the file
fn read_new_lines(log_file: &Path, position: &mut u64) -> Result<Vec<String>> {
    let len = std::fs::metadata(log_file)?.len();
    if len < *position {
        // Truncated or rotated
        *position = 0;
    }
    if len == *position {
        return Ok(Vec::new());
    }

    let mut file = File::open(log_file)?;
    file.seek(SeekFrom::Start(*position))?;
    let mut appended = String::new();
    file.read_to_string(&mut appended)?;
    *position = len;

    Ok(appended.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
2026-10-19T10:00:00.000000Z  INFO artgrid::cli::root: Starting interactive mode
2026-10-19T10:00:01.000000Z ERROR artgrid::api::client: Error fetching artworks page 3: HTTP error! status: 500
2026-10-19T10:00:02.000000Z DEBUG artgrid::catalog::controller: Total pages is now 12
2026-10-19T10:00:03.000000Z  INFO artgrid::catalog::controller: Selected 15 rows
";

    fn command(tail: usize, level: Option<&str>) -> LogsCommand {
        LogsCommand {
            follow: false,
            tail,
            level: level.map(str::to_string),
        }
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        let lines = command(2, None).tail_lines(LOG.as_bytes()).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("Selected 15 rows"));
    }

    #[test]
    fn test_level_filter() {
        let lines = command(100, Some("error")).tail_lines(LOG.as_bytes()).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("status: 500"));

        let lines = command(100, Some("INFO")).tail_lines(LOG.as_bytes()).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_read_new_lines_tracks_position_and_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artgrid.log");
        std::fs::write(&path, "first\n").unwrap();
        let mut position = std::fs::metadata(&path).unwrap().len();

        assert!(read_new_lines(&path, &mut position).unwrap().is_empty());

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        std::io::Write::write_all(&mut file, b"second\nthird\n").unwrap();
        assert_eq!(read_new_lines(&path, &mut position).unwrap(), vec!["second", "third"]);

        std::fs::write(&path, "fresh\n").unwrap();
        assert_eq!(read_new_lines(&path, &mut position).unwrap(), vec!["fresh"]);
    }
}
