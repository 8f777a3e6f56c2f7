//! Fire-and-forget audio command channel.
//!
//! The world model never blocks on audio and audio failures never raise into
//! the action chain: commands are enqueued to a dedicated Tokio task that
//! drives an [`AudioBackend`], and backend errors are logged and dropped.
//! Resume and unload are independent operations; resuming a track never
//! implies unloading it.

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Commands accepted by the audio worker. `key` names a loaded track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    /// Load a sound file under a key.
    Load { key: String, path: String },
    /// Start playback of a loaded track.
    Play { key: String, looped: bool },
    /// Stop playback of one track.
    Stop { key: String },
    /// Pause all playing tracks.
    PauseAll,
    /// Resume all paused tracks.
    ResumeAll,
    /// Release a loaded track.
    Unload { key: String },
    /// Stop everything.
    StopAll,
}

/// Playback backend driven by the audio worker. Implementations live in the
/// presentation layer; the engine only knows this interface.
pub trait AudioBackend: Send + 'static {
    fn handle(&mut self, cmd: AudioCmd) -> anyhow::Result<()>;
}

/// Backend that discards every command; useful for tests and headless runs.
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn handle(&mut self, cmd: AudioCmd) -> anyhow::Result<()> {
        debug!("audio: discarding {cmd:?}");
        Ok(())
    }
}

/// Cloneable sending side of the audio channel.
#[derive(Clone)]
pub struct AudioHandle {
    tx: mpsc::UnboundedSender<AudioCmd>,
}

impl AudioHandle {
    /// Spawn the audio worker on the current Tokio runtime and return the
    /// handle used to enqueue commands.
    pub fn spawn(backend: impl AudioBackend) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(run_worker(backend, rx));
        (Self { tx }, join)
    }

    /// Enqueue a command. Never blocks and never fails from the caller's
    /// perspective; a closed worker is logged and ignored.
    pub fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio: worker gone, command dropped");
        }
    }
}

async fn run_worker(mut backend: impl AudioBackend, mut rx: mpsc::UnboundedReceiver<AudioCmd>) {
    while let Some(cmd) = rx.recv().await {
        debug!("audio: {cmd:?}");
        if let Err(err) = backend.handle(cmd) {
            warn!("audio: backend error ignored: {err:#}");
        }
    }
    debug!("audio: worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;

    struct Recording(std_mpsc::Sender<AudioCmd>);

    impl AudioBackend for Recording {
        fn handle(&mut self, cmd: AudioCmd) -> anyhow::Result<()> {
            self.0.send(cmd.clone()).ok();
            if matches!(cmd, AudioCmd::StopAll) {
                anyhow::bail!("device lost");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn commands_arrive_in_order_and_errors_are_swallowed() {
        let (record_tx, record_rx) = std_mpsc::channel();
        let (handle, join) = AudioHandle::spawn(Recording(record_tx));
        handle.send(AudioCmd::Load {
            key: "theme".into(),
            path: "theme.ogg".into(),
        });
        // The backend error from StopAll must not surface anywhere.
        handle.send(AudioCmd::StopAll);
        handle.send(AudioCmd::ResumeAll);
        drop(handle);
        join.await.expect("worker exits cleanly");

        let received: Vec<AudioCmd> = record_rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                AudioCmd::Load {
                    key: "theme".into(),
                    path: "theme.ogg".into()
                },
                AudioCmd::StopAll,
                AudioCmd::ResumeAll,
            ]
        );
    }
}
