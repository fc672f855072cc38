//! Background asset loading.
//!
//! Parsing a glTF file or decoding a large image takes long enough to
//! stutter the render loop, so both run on short-lived worker threads.
//! Results come back over mpsc channels the engine drains between frames;
//! GPU upload stays on the engine thread.

use std::path::PathBuf;
use std::sync::mpsc;

use crate::assets::{self, CharacterData, DecodedImage};
use crate::error::ViewerError;

type LoadResult<T> = Result<T, ViewerError>;

/// Spawns asset worker threads and collects their results.
///
/// Loads cannot be cancelled; starting a second character load while one
/// is in flight lets both complete, and installs land in arrival order.
pub(crate) struct AssetLoader {
    character_tx: mpsc::Sender<LoadResult<CharacterData>>,
    character_rx: mpsc::Receiver<LoadResult<CharacterData>>,
    backdrop_tx: mpsc::Sender<LoadResult<DecodedImage>>,
    backdrop_rx: mpsc::Receiver<LoadResult<DecodedImage>>,
}

impl AssetLoader {
    /// Create an idle loader.
    pub(crate) fn new() -> Self {
        let (character_tx, character_rx) = mpsc::channel();
        let (backdrop_tx, backdrop_rx) = mpsc::channel();
        Self {
            character_tx,
            character_rx,
            backdrop_tx,
            backdrop_rx,
        }
    }

    /// Parse a character asset on a worker thread.
    pub(crate) fn load_character(&self, path: PathBuf) {
        let tx = self.character_tx.clone();
        spawn_worker("character-loader", move || {
            let _ = tx.send(assets::load_character(&path));
        });
    }

    /// Decode a backdrop image on a worker thread.
    pub(crate) fn load_backdrop(&self, path: PathBuf) {
        let tx = self.backdrop_tx.clone();
        spawn_worker("backdrop-loader", move || {
            let _ = tx.send(assets::load_backdrop_image(&path));
        });
    }

    /// Non-blocking check for a finished character parse.
    pub(crate) fn try_recv_character(&self) -> Option<LoadResult<CharacterData>> {
        self.character_rx.try_recv().ok()
    }

    /// Non-blocking check for a finished backdrop decode.
    pub(crate) fn try_recv_backdrop(&self) -> Option<LoadResult<DecodedImage>> {
        self.backdrop_rx.try_recv().ok()
    }
}

/// Spawn a named worker thread. On spawn failure the load never completes;
/// the status line keeps its last value and the failure is logged.
fn spawn_worker(name: &str, work: impl FnOnce() + Send + 'static) {
    let builder = std::thread::Builder::new().name(name.to_owned());
    if let Err(e) = builder.spawn(work) {
        log::warn!("failed to spawn {name} thread: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait_for<T>(poll: impl Fn() -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(value) = poll() {
                return value;
            }
            assert!(Instant::now() < deadline, "loader result never arrived");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn missing_character_reports_error() {
        let loader = AssetLoader::new();
        loader.load_character(PathBuf::from("no/such/model.glb"));

        let result = wait_for(|| loader.try_recv_character());
        assert!(result.is_err());
    }

    #[test]
    fn missing_backdrop_reports_error() {
        let loader = AssetLoader::new();
        loader.load_backdrop(PathBuf::from("no/such/image.jpg"));

        let result = wait_for(|| loader.try_recv_backdrop());
        assert!(result.is_err());
    }

    #[test]
    fn try_recv_is_non_blocking_when_idle() {
        let loader = AssetLoader::new();
        assert!(loader.try_recv_character().is_none());
        assert!(loader.try_recv_backdrop().is_none());
    }
}
