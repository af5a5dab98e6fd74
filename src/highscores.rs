//! Best score persistence
//!
//! A single best score kept in LocalStorage as a plain integer string.

use serde::{Deserialize, Serialize};

/// Best score across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "colorMatchHighScore";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Record a finished run; returns true if it set a new best
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            log::info!("New high score: {score} (was {})", self.best);
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Parse a stored value; anything unreadable counts as no record
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(best) => Self { best },
            Err(e) => {
                log::warn!("Ignoring stored high score {raw:?}: {e}");
                Self::default()
            }
        }
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY)
        {
            let score = Self::parse(&raw);
            log::info!("Loaded high score {}", score.best);
            return score;
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.best.to_string())
                .is_err()
            {
                log::warn!("Failed to save high score");
            } else {
                log::info!("High score saved ({})", self.best);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
