//! Persist the best score to disk (XDG config or ~/.config/dashtui).
//!
//! A single integer. Missing or corrupt files read as 0; recording a
//! score that does not beat the stored best leaves the file untouched.

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const FILENAME: &str = "highscore";

/// Returns the path to the best-score file (config dir / dashtui / highscore).
fn config_path() -> Result<PathBuf> {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if xdg.is_empty() {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".config")
        } else {
            PathBuf::from(xdg)
        }
    } else {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    Ok(base.join("dashtui").join(FILENAME))
}

/// Load the best score from disk; 0 on missing/parse error.
pub fn load_best_score() -> u32 {
    let path = match config_path() {
        Ok(p) => p,
        Err(_) => return 0,
    };
    fs::read_to_string(path).map_or(0, |s| parse_best(&s))
}

/// File contents -> score; anything unparseable reads as 0.
fn parse_best(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

/// Record a finished score: persists it only if it beats the stored best.
/// Returns the best score after the update.
pub fn record_score(score: u32) -> Result<u32> {
    let best = load_best_score();
    if score <= best {
        return Ok(best);
    }
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "{}", score)?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_best_plain_integer() {
        assert_eq!(parse_best("1234\n"), 1234);
    }

    #[test]
    fn test_parse_best_garbage_reads_as_zero() {
        assert_eq!(parse_best(""), 0);
        assert_eq!(parse_best("not a number"), 0);
        assert_eq!(parse_best("-5"), 0);
    }
}
