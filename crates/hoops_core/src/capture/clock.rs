use serde::{Deserialize, Serialize};
use std::fmt;

use super::CaptureError;
use crate::config::CaptureConfig;

/// Parse `M:SS` / `MM:SS` into seconds remaining.
pub fn parse_game_time(raw: &str) -> Option<u32> {
    let (minutes, seconds) = raw.trim().split_once(':')?;
    if minutes.is_empty() || seconds.len() != 2 {
        return None;
    }
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits(minutes) || !digits(seconds) {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

pub fn format_game_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Period and time remaining, counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameClock {
    pub quarter: u8,
    pub seconds_remaining: u32,
}

impl GameClock {
    /// Validate a tagger-entered period and time against the config.
    pub fn parse(quarter: u8, game_time: &str, config: &CaptureConfig) -> Result<Self, CaptureError> {
        if quarter == 0 || quarter > config.max_period() {
            return Err(CaptureError::InvalidQuarter(quarter));
        }
        let seconds = parse_game_time(game_time)
            .filter(|&s| s <= config.period_length_secs(quarter))
            .ok_or_else(|| CaptureError::InvalidGameTime(game_time.to_string()))?;
        Ok(Self { quarter, seconds_remaining: seconds })
    }

    /// Start of the given period.
    pub fn start_of(quarter: u8, config: &CaptureConfig) -> Self {
        Self { quarter, seconds_remaining: config.period_length_secs(quarter) }
    }

    pub fn game_time(&self) -> String {
        format_game_time(self.seconds_remaining)
    }

    /// Run the clock down by one play.
    ///
    /// Reaching or crossing 0:00 wraps to the previous period at its full
    /// length. Period 1 clamps at 0:00.
    pub fn tick(&mut self, config: &CaptureConfig) {
        if self.seconds_remaining > config.clock_step_secs {
            self.seconds_remaining -= config.clock_step_secs;
        } else if self.quarter > 1 {
            self.quarter -= 1;
            self.seconds_remaining = config.period_length_secs(self.quarter);
            log::debug!("Clock wrapped back to period {}", self.quarter);
        } else {
            self.seconds_remaining = 0;
        }
    }

    pub fn is_overtime(&self, config: &CaptureConfig) -> bool {
        self.quarter > config.regulation_quarters
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.game_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_time() {
        assert_eq!(parse_game_time("12:00"), Some(720));
        assert_eq!(parse_game_time("0:07"), Some(7));
        assert_eq!(parse_game_time(" 5:30 "), Some(330));
        assert_eq!(parse_game_time("5:3"), None);
        assert_eq!(parse_game_time("5:60"), None);
        assert_eq!(parse_game_time(":30"), None);
        assert_eq!(parse_game_time("five"), None);
        assert_eq!(parse_game_time(""), None);
    }

    #[test]
    fn test_parse_game_time_rejects_signs() {
        assert_eq!(parse_game_time("+5:00"), None);
        assert_eq!(parse_game_time("5:+5"), None);
        assert_eq!(parse_game_time("-1:00"), None);
        assert_eq!(parse_game_time("5: 5"), None);
    }

    #[test]
    fn test_clock_validation() {
        let cfg = CaptureConfig::default();
        assert!(GameClock::parse(1, "12:00", &cfg).is_ok());
        assert!(matches!(GameClock::parse(1, "12:01", &cfg), Err(CaptureError::InvalidGameTime(_))));
        assert!(matches!(GameClock::parse(0, "5:00", &cfg), Err(CaptureError::InvalidQuarter(0))));
        assert!(matches!(GameClock::parse(9, "1:00", &cfg), Err(CaptureError::InvalidQuarter(9))));
        // overtime periods are shorter
        assert!(GameClock::parse(5, "6:00", &cfg).is_err());
    }

    #[test]
    fn test_tick_decrements_by_step() {
        let cfg = CaptureConfig::default();
        let mut clock = GameClock::parse(2, "5:30", &cfg).unwrap();
        clock.tick(&cfg);
        assert_eq!(clock.game_time(), "5:10");
        assert_eq!(clock.quarter, 2);
    }

    #[test]
    fn test_tick_wraps_to_previous_period() {
        let cfg = CaptureConfig::default();
        let mut clock = GameClock::parse(2, "0:15", &cfg).unwrap();
        clock.tick(&cfg);
        assert_eq!(clock, GameClock { quarter: 1, seconds_remaining: 720 });

        // exactly one step left also wraps
        let mut exact = GameClock::parse(3, "0:20", &cfg).unwrap();
        exact.tick(&cfg);
        assert_eq!(exact, GameClock { quarter: 2, seconds_remaining: 720 });

        // overtime wraps back into the fourth quarter at regulation length
        let mut overtime = GameClock { quarter: 5, seconds_remaining: 10 };
        overtime.tick(&cfg);
        assert_eq!(overtime, GameClock { quarter: 4, seconds_remaining: 720 });
        assert!(!overtime.is_overtime(&cfg));
    }

    #[test]
    fn test_tick_clamps_at_first_period() {
        let cfg = CaptureConfig::default();
        let mut first = GameClock::parse(1, "0:15", &cfg).unwrap();
        first.tick(&cfg);
        assert_eq!(first, GameClock { quarter: 1, seconds_remaining: 0 });

        first.tick(&cfg);
        assert_eq!(first, GameClock { quarter: 1, seconds_remaining: 0 });
        assert_eq!(first.to_string(), "Q1 0:00");
    }
}
