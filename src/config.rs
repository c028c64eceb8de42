//! Tunable timings, selectors and texts for a game session.
//!
//! `GameConfig::default()` reproduces the original page: 1 s ticks, a 1 s
//! appearance debounce, the mole hiding again after 200–400 ms and the summary
//! alert 100 ms after the winning click.

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Period of the elapsed-time counter.
    pub tick_interval_ms: u32,
    /// Quiet window before a requested appearance actually runs.
    pub debounce_ms: u32,
    /// How long the mole stays visible (inclusive range).
    pub hide_delay_min_ms: u32,
    pub hide_delay_max_ms: u32,
    /// Delay between the winning click and the summary alert.
    pub summary_delay_ms: u32,
    pub selectors: Selectors,
    /// Class applied to the mole image.
    pub mole_class: String,
}

/// CSS selectors resolved inside the game container.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Selectors {
    pub time: String,
    pub clicks: String,
    pub start_button: String,
    pub win_message: String,
    pub hole: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            time: ".time".into(),
            clicks: ".clicks".into(),
            start_button: ".start-button".into(),
            win_message: ".win-message".into(),
            hole: ".hole".into(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            debounce_ms: 1000,
            hide_delay_min_ms: 200,
            hide_delay_max_ms: 400,
            summary_delay_ms: 100,
            selectors: Selectors::default(),
            mole_class: "mole".into(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig("tick_interval_ms must be > 0".into()));
        }
        if self.debounce_ms == 0 {
            return Err(GameError::InvalidConfig("debounce_ms must be > 0".into()));
        }
        if self.hide_delay_min_ms > self.hide_delay_max_ms {
            return Err(GameError::InvalidConfig(format!(
                "hide delay range {}..={} is empty",
                self.hide_delay_min_ms, self.hide_delay_max_ms
            )));
        }
        let selectors = [
            &self.selectors.time,
            &self.selectors.clicks,
            &self.selectors.start_button,
            &self.selectors.win_message,
            &self.selectors.hole,
        ];
        if selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(GameError::InvalidConfig("selectors must not be empty".into()));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON object; omitted fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(src: &str) -> Result<Self, GameError> {
        let cfg: GameConfig =
            serde_json::from_str(src).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_page() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.debounce_ms, 1000);
        assert_eq!((cfg.hide_delay_min_ms, cfg.hide_delay_max_ms), (200, 400));
        assert_eq!(cfg.summary_delay_ms, 100);
        assert_eq!(cfg.selectors.hole, ".hole");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_hide_range() {
        let cfg = GameConfig {
            hide_delay_min_ms: 500,
            hide_delay_max_ms: 100,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_tick() {
        let cfg = GameConfig {
            tick_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_debounce() {
        let cfg = GameConfig {
            debounce_ms: 0,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_blank_selector() {
        let mut cfg = GameConfig::default();
        cfg.selectors.clicks = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"debounce_ms": 250, "selectors": {"hole": ".pit"}}"#)
            .unwrap();
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.selectors.hole, ".pit");
        assert_eq!(cfg.selectors.time, ".time");
        assert_eq!(cfg.tick_interval_ms, 1000);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn bad_json_is_invalid_config() {
        assert!(matches!(
            GameConfig::from_json("{nope"),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
