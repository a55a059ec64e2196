//! Win screen statistics
//!
//! After a win, the player's session time is listed next to a few rival
//! wizards whose times are drawn around it, then the table is shuffled.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Label for the player's own entry
pub const PLAYER_NAME: &str = "You";

/// Rival names shown on the win screen
pub const RIVAL_NAMES: [&str; 3] = ["Cake", "Katia", "Igor"];

/// Width of the window rival times are drawn from (ms)
const SPREAD_MS: f64 = 3000.0;

/// No rival finishes faster than this (ms)
const MIN_TIME_MS: f64 = 1000.0;

/// A single statistics row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    /// Session time in milliseconds
    pub time_ms: f64,
}

/// Statistics table for one winning run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub entries: Vec<StatEntry>,
}

impl RunStatistics {
    /// Build a shuffled table for a run that took `time_ms`
    pub fn generate<R: Rng + ?Sized>(time_ms: f64, rng: &mut R) -> Self {
        let mut entries = Vec::with_capacity(RIVAL_NAMES.len() + 1);
        entries.push(StatEntry {
            name: PLAYER_NAME.to_string(),
            time_ms,
        });

        for name in RIVAL_NAMES {
            let jitter = rng.random_range(0.0..SPREAD_MS) - SPREAD_MS / 2.0;
            entries.push(StatEntry {
                name: name.to_string(),
                time_ms: (time_ms + jitter).max(MIN_TIME_MS),
            });
        }

        entries.shuffle(rng);
        Self { entries }
    }

    /// The player's own time
    pub fn player_time(&self) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == PLAYER_NAME)
            .map(|e| e.time_ms)
    }

    /// Fastest entry
    pub fn best(&self) -> Option<&StatEntry> {
        self.entries
            .iter()
            .min_by(|a, b| a.time_ms.total_cmp(&b.time_ms))
    }

    /// 1-based position of the player when sorted by time
    pub fn player_rank(&self) -> Option<usize> {
        let mine = self.player_time()?;
        Some(self.entries.iter().filter(|e| e.time_ms < mine).count() + 1)
    }

    /// One display line per entry, in table order
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.name, format_duration(e.time_ms)))
            .collect()
    }
}

/// Format milliseconds as seconds with one decimal
pub fn format_duration(ms: f64) -> String {
    format!("{:.1} s", ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_contains_player_and_rivals() {
        let mut rng = Pcg32::seed_from_u64(7);
        let stats = RunStatistics::generate(12_000.0, &mut rng);
        assert_eq!(stats.entries.len(), 4);
        assert_eq!(stats.player_time(), Some(12_000.0));
        for name in RIVAL_NAMES {
            assert!(stats.entries.iter().any(|e| e.name == name));
        }
    }

    #[test]
    fn test_rival_times_near_player() {
        let mut rng = Pcg32::seed_from_u64(42);
        let stats = RunStatistics::generate(20_000.0, &mut rng);
        for entry in &stats.entries {
            assert!(entry.time_ms >= 18_500.0 && entry.time_ms <= 21_500.0);
        }
    }

    #[test]
    fn test_rival_times_floored() {
        let mut rng = Pcg32::seed_from_u64(1);
        let stats = RunStatistics::generate(200.0, &mut rng);
        for entry in stats.entries.iter().filter(|e| e.name != PLAYER_NAME) {
            assert!(entry.time_ms >= MIN_TIME_MS);
        }
        // Player time is reported as-is
        assert_eq!(stats.player_time(), Some(200.0));
        assert_eq!(stats.player_rank(), Some(1));
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = RunStatistics::generate(9_000.0, &mut Pcg32::seed_from_u64(99));
        let b = RunStatistics::generate(9_000.0, &mut Pcg32::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_lines_format() {
        let stats = RunStatistics {
            entries: vec![StatEntry {
                name: PLAYER_NAME.to_string(),
                time_ms: 12_345.0,
            }],
        };
        assert_eq!(stats.lines(), vec!["You: 12.3 s".to_string()]);
        assert_eq!(stats.best().map(|e| e.name.as_str()), Some("You"));
    }
}
