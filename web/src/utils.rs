use gloo::storage::{LocalStorage, Storage};
use kulki_core::ScoreStore;
use serde::{Deserialize, Serialize};

/// Versioned LocalStorage keys.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// High-score persistence over browser LocalStorage. Best effort: a missing
/// or unreadable value falls back to a session-local high score, and store
/// failures are logged and dropped.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalScore;

impl StorageKey for LocalScore {
    const KEY: &'static str = "kulki:highscore:v1";
}

impl ScoreStore for LocalScore {
    fn load(&self) -> Option<u32> {
        LocalStorage::get(Self::KEY).ok()
    }

    fn save(&self, high_score: u32) {
        if let Err(err) = LocalStorage::set(Self::KEY, high_score) {
            log::warn!("failed to store high score: {:?}", err);
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub muted: bool,
}

impl StorageKey for Settings {
    const KEY: &'static str = "kulki:settings:v1";
}

impl Settings {
    pub(crate) fn local_or_default() -> Self {
        LocalStorage::get(Self::KEY).unwrap_or_default()
    }

    pub(crate) fn local_save(self) {
        if let Err(err) = LocalStorage::set(Self::KEY, self) {
            log::warn!("failed to store settings: {:?}", err);
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}
