//! Background model loading. The worker owns the loader and a sender;
//! the UI thread drains [`LoadEvent`]s once per frame.

use std::{path::PathBuf, thread};

use asset::{AssetLoadError, AssetLoader, LoadProgress, ModelData};
use crossbeam_channel::{Receiver, TryRecvError};

#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Finished(Result<ModelData, AssetLoadError>),
}

/// Receiving end of an in-flight load.
pub struct LoadHandle {
    path: PathBuf,
    rx: Receiver<LoadEvent>,
}

impl LoadHandle {
    /// Next event without blocking. A worker that vanished without a result
    /// is reported as [`AssetLoadError::Interrupted`].
    pub fn try_next(&self) -> Option<LoadEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.interrupted()),
        }
    }

    fn interrupted(&self) -> LoadEvent {
        LoadEvent::Finished(Err(AssetLoadError::Interrupted {
            path: self.path.clone(),
        }))
    }
}

/// Start loading `path` on a worker thread. Fire-and-forget: there is no
/// cancellation, the worker runs to completion.
pub fn spawn_load<L>(loader: L, path: PathBuf) -> std::io::Result<LoadHandle>
where
    L: AssetLoader + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    let worker_path = path.clone();
    thread::Builder::new()
        .name("asset-load".into())
        .spawn(move || {
            let progress_tx = tx.clone();
            let result = loader.load(&worker_path, &mut |p| {
                let _ = progress_tx.send(LoadEvent::Progress(p));
            });
            // Receiver gone means the viewer shut down; nothing left to tell.
            let _ = tx.send(LoadEvent::Finished(result));
        })?;
    Ok(LoadHandle { path, rx })
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use crossbeam_channel::RecvTimeoutError;

    use super::*;

    struct Ticker;

    impl AssetLoader for Ticker {
        fn load(
            &self,
            path: &Path,
            progress: &mut dyn FnMut(LoadProgress),
        ) -> Result<ModelData, AssetLoadError> {
            for loaded in [5, 10] {
                progress(LoadProgress {
                    loaded,
                    total: Some(10),
                });
            }
            Err(AssetLoadError::Empty {
                path: path.to_path_buf(),
            })
        }
    }

    struct Panics;

    impl AssetLoader for Panics {
        fn load(
            &self,
            _: &Path,
            _: &mut dyn FnMut(LoadProgress),
        ) -> Result<ModelData, AssetLoadError> {
            panic!("loader blew up")
        }
    }

    fn next_timeout(handle: &LoadHandle, timeout: Duration) -> Option<LoadEvent> {
        match handle.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(handle.interrupted()),
        }
    }

    fn drain(handle: &LoadHandle) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(event) = next_timeout(handle, Duration::from_secs(5)) {
            let done = matches!(event, LoadEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn progress_then_result_in_order() {
        let handle = spawn_load(Ticker, PathBuf::from("a.glb")).expect("spawn");
        let events = drain(&handle);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], LoadEvent::Progress(LoadProgress { loaded: 5, .. })));
        assert!(matches!(events[1], LoadEvent::Progress(LoadProgress { loaded: 10, .. })));
        assert!(matches!(events[2], LoadEvent::Finished(Err(AssetLoadError::Empty { .. }))));
    }

    #[test]
    fn dead_worker_reports_interrupted() {
        let handle = spawn_load(Panics, PathBuf::from("b.glb")).expect("spawn");
        let events = drain(&handle);
        assert!(matches!(
            events.last(),
            Some(LoadEvent::Finished(Err(AssetLoadError::Interrupted { .. })))
        ));
    }
}
