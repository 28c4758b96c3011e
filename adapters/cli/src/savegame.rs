use std::{
    fs, io,
    path::{Path, PathBuf},
};

use dungeon_crawl_world::{GameSession, LevelError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Tag identifying save files written by this game.
pub(crate) const SAVE_FORMAT: &str = "dungeon-crawl-save";
/// Envelope version understood by [`SaveGame::decode`].
pub(crate) const SAVE_VERSION: u32 = 1;

/// Versioned envelope around a stored session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SaveGame {
    format: String,
    version: u32,
    session: GameSession,
}

impl SaveGame {
    /// Wraps a snapshot of `session`.
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            format: SAVE_FORMAT.to_owned(),
            version: SAVE_VERSION,
            session,
        }
    }

    pub(crate) fn into_session(self) -> GameSession {
        self.session
    }

    pub(crate) fn encode(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(SaveError::Encode)
    }

    /// Parses and validates a save file. Nothing is returned unless the whole
    /// envelope and the session inside it are sound.
    pub(crate) fn decode(contents: &str) -> Result<Self, SaveError> {
        let save: Self = serde_json::from_str(contents).map_err(SaveError::Malformed)?;
        if save.format != SAVE_FORMAT {
            return Err(SaveError::UnknownFormat(save.format));
        }
        if save.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(save.version));
        }
        save.session.validate()?;
        Ok(save)
    }

    pub(crate) fn save_to_path(&self, path: &Path) -> Result<(), SaveError> {
        let contents = self.encode()?;
        fs::write(path, contents).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    pub(crate) fn load_from_path(path: &Path) -> Result<Self, SaveError> {
        let contents = fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let save = Self::decode(&contents)?;
        info!(path = %path.display(), "game loaded");
        Ok(save)
    }
}

/// Errors raised while writing or reading save files.
#[derive(Debug, Error)]
pub(crate) enum SaveError {
    #[error("could not access save file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode the session")]
    Encode(#[source] serde_json::Error),
    #[error("save file is not valid")]
    Malformed(#[source] serde_json::Error),
    #[error("save file format `{0}` is not supported")]
    UnknownFormat(String),
    #[error("save file version {0} is not supported")]
    UnsupportedVersion(u32),
    #[error("saved session is inconsistent")]
    InvalidSession(#[from] LevelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawl_core::{Command, Direction};
    use dungeon_crawl_world::{self as world, query};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dungeon-crawl-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn saved_session_loads_back_from_disk() {
        let mut session = GameSession::campaign().expect("campaign");
        let mut events = Vec::new();
        world::apply(
            &mut session,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        let path = temp_path("round-trip");

        SaveGame::new(session.clone())
            .save_to_path(&path)
            .expect("save succeeds");
        let loaded = SaveGame::load_from_path(&path)
            .expect("load succeeds")
            .into_session();
        let _ = fs::remove_file(&path);

        assert_eq!(
            query::player(&loaded).position(),
            query::player(&session).position()
        );
        assert_eq!(query::active_slot(&loaded), query::active_slot(&session));
    }

    #[test]
    fn foreign_formats_are_rejected() {
        let session = GameSession::campaign().expect("campaign");
        let encoded = SaveGame::new(session)
            .encode()
            .expect("encode")
            .replace(SAVE_FORMAT, "other-game-save");
        assert!(matches!(
            SaveGame::decode(&encoded),
            Err(SaveError::UnknownFormat(format)) if format == "other-game-save"
        ));
    }

    #[test]
    fn future_versions_are_rejected() {
        let session = GameSession::campaign().expect("campaign");
        let mut value: serde_json::Value =
            serde_json::from_str(&SaveGame::new(session).encode().expect("encode"))
                .expect("valid json");
        value["version"] = serde_json::json!(2);
        assert!(matches!(
            SaveGame::decode(&value.to_string()),
            Err(SaveError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn sessions_with_a_dead_running_player_are_rejected() {
        let session = GameSession::campaign().expect("campaign");
        let mut value: serde_json::Value =
            serde_json::from_str(&SaveGame::new(session).encode().expect("encode"))
                .expect("valid json");
        value["session"]["player"]["health"] = serde_json::json!(0);
        assert!(matches!(
            SaveGame::decode(&value.to_string()),
            Err(SaveError::InvalidSession(_))
        ));
    }

    #[test]
    fn truncated_files_are_malformed() {
        let session = GameSession::campaign().expect("campaign");
        let encoded = SaveGame::new(session).encode().expect("encode");
        let truncated = &encoded[..encoded.len() / 2];
        assert!(matches!(
            SaveGame::decode(truncated),
            Err(SaveError::Malformed(_))
        ));
    }

    #[test]
    fn missing_files_report_the_path() {
        let path = temp_path("missing");
        let error = SaveGame::load_from_path(&path).expect_err("nothing to load");
        assert!(error.to_string().contains("dungeon-crawl"));
    }
}
