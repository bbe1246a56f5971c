//! `add`, `add2`, `addlocal` and `addlocal2`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use ptingest_core::ingest::{BatchOutcome, ItemReport, ReportCallback, STDIN_SENTINEL};
use ptingest_core::site::is_url;
use ptingest_core::{BatchExecutor, Config, IngestMode, IngestOptions, SiteRegistry};

use super::client_from_config;

/// Expand wildcard inputs. `-`, URLs and plain paths pass through verbatim.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    for input in inputs {
        let is_pattern = input != STDIN_SENTINEL
            && !is_url(input)
            && input.contains(['*', '?', '[']);
        if !is_pattern {
            expanded.push(input.clone());
            continue;
        }

        let paths = glob::glob(input).with_context(|| format!("invalid pattern {}", input))?;
        let before = expanded.len();
        for entry in paths {
            match entry {
                Ok(path) => expanded.push(path.to_string_lossy().into_owned()),
                Err(e) => warn!(pattern = %input, error = %e, "Unreadable path while expanding"),
            }
        }
        debug!(pattern = %input, matches = expanded.len() - before, "Expanded pattern");
    }
    Ok(expanded)
}

fn print_report(report: &ItemReport) {
    println!("{}", report);
}

/// Run one ingest batch against the named client and print the summary.
pub async fn run(
    config: &Config,
    client_name: &str,
    mode: IngestMode,
    inputs: &[String],
    options: IngestOptions,
) -> Result<BatchOutcome> {
    let client = client_from_config(config, client_name)?;
    let catalog = Arc::new(SiteRegistry::new(&config.sites));
    let callback: ReportCallback = Arc::new(print_report);

    let executor = BatchExecutor::new(client, catalog, options).with_report_callback(callback);
    let outcome = match mode {
        IngestMode::Remote => executor.run_remote(inputs).await?,
        IngestMode::Local => executor.run_local(inputs).await?,
    };

    println!();
    println!("{}", outcome.summary_line());
    outcome.ensure_success()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expand_inputs_passthrough() {
        let inputs = strings(&["-", "a.torrent", "https://cdn.example/x*.torrent"]);
        assert_eq!(expand_inputs(&inputs).unwrap(), inputs);
    }

    #[test]
    fn test_expand_inputs_glob() {
        let dir = TempDir::new().unwrap();
        for name in ["b.torrent", "a.torrent", "c.txt", "d.torrent.added"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*.torrent", dir.path().display());
        let expanded = expand_inputs(&[pattern]).unwrap();
        let names: Vec<String> = expanded
            .iter()
            .map(|p| {
                std::path::Path::new(p)
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["a.torrent", "b.torrent"]);
    }

    #[test]
    fn test_expand_inputs_no_match() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.torrent", dir.path().display());
        assert!(expand_inputs(&[pattern]).unwrap().is_empty());
    }
}
