//! Background catalog and thumbnail worker
//!
//! Catalog calls and thumbnail loads run on two dedicated threads so the UI
//! never blocks on the network. Jobs arrive over unbounded tokio channels and
//! finished work is reported as [`WorkerEvent`]s that the UI thread drains
//! each frame. Jobs whose cancel token has fired are dropped without
//! touching the network.

use crate::catalog::{Catalog, CatalogReply};
use crate::error::CatalogError;
use crate::thumbnail::{Thumbnail, ThumbnailLoader};
use crate::transport::HttpTransport;
use crate::view_state::{FetchRequest, FetchTicket, ThumbnailRequest, ThumbnailTarget, ViewStateController};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// Called after every event so a sleeping UI can repaint
pub type Wake = Arc<dyn Fn() + Send + Sync>;

/// Finished background work
#[derive(Debug)]
pub enum WorkerEvent {
    Fetched {
        ticket: FetchTicket,
        result: Result<CatalogReply, CatalogError>,
    },
    Thumbnail {
        target: ThumbnailTarget,
        thumbnail: Option<Thumbnail>,
    },
}

impl WorkerEvent {
    /// Feed this event into the controller
    pub fn apply_to(self, controller: &mut ViewStateController) {
        match self {
            WorkerEvent::Fetched { ticket, result } => controller.complete(ticket, result),
            WorkerEvent::Thumbnail { target, thumbnail } => {
                controller.apply_thumbnail(target, thumbnail)
            }
        }
    }
}

/// Handle to the worker threads
pub struct CatalogWorker {
    fetch_tx: mpsc::UnboundedSender<FetchRequest>,
    thumbnail_tx: mpsc::UnboundedSender<ThumbnailRequest>,
    events: Receiver<WorkerEvent>,
    threads: Vec<JoinHandle<()>>,
}

impl CatalogWorker {
    /// Start the worker threads
    pub fn spawn<C, T>(catalog: C, loader: ThumbnailLoader<T>, wake: Option<Wake>) -> std::io::Result<Self>
    where
        C: Catalog + 'static,
        T: HttpTransport + 'static,
    {
        let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchRequest>();
        let (thumbnail_tx, mut thumbnail_rx) = mpsc::unbounded_channel::<ThumbnailRequest>();
        let (event_tx, events) = crossbeam_channel::unbounded();

        let fetch_events = EventSink::new(event_tx.clone(), wake.clone());
        let fetch_thread = std::thread::Builder::new()
            .name("catalog-fetch".into())
            .spawn(move || {
                while let Some(request) = fetch_rx.blocking_recv() {
                    if request.cancel.is_cancelled() {
                        tracing::debug!(ticket = ?request.ticket, "Skipping cancelled fetch");
                        continue;
                    }
                    let result = request.query.run(&catalog);
                    if !fetch_events.send(WorkerEvent::Fetched {
                        ticket: request.ticket,
                        result,
                    }) {
                        break;
                    }
                }
                tracing::debug!("Catalog fetch worker stopped");
            })?;

        let thumbnail_events = EventSink::new(event_tx, wake);
        let thumbnail_thread = std::thread::Builder::new()
            .name("thumbnail-load".into())
            .spawn(move || {
                while let Some(request) = thumbnail_rx.blocking_recv() {
                    if request.cancel.is_cancelled() {
                        continue;
                    }
                    let thumbnail = loader.load_or_none(&request.url, request.size);
                    // Owner may have gone away while we were downloading
                    if request.cancel.is_cancelled() {
                        continue;
                    }
                    if !thumbnail_events.send(WorkerEvent::Thumbnail {
                        target: request.target,
                        thumbnail,
                    }) {
                        break;
                    }
                }
                tracing::debug!("Thumbnail worker stopped");
            })?;

        Ok(Self {
            fetch_tx,
            thumbnail_tx,
            events,
            threads: vec![fetch_thread, thumbnail_thread],
        })
    }

    /// Queue a catalog call
    pub fn submit_fetch(&self, request: FetchRequest) {
        if self.fetch_tx.send(request).is_err() {
            tracing::error!("Catalog fetch worker is gone");
        }
    }

    /// Queue thumbnail loads
    pub fn submit_thumbnails(&self, requests: impl IntoIterator<Item = ThumbnailRequest>) {
        for request in requests {
            if self.thumbnail_tx.send(request).is_err() {
                tracing::error!("Thumbnail worker is gone");
                return;
            }
        }
    }

    /// Next finished event, if any
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Hand every queued thumbnail request to the loader and apply all
    /// finished events. Returns the number of events applied.
    pub fn pump(&self, controller: &mut ViewStateController) -> usize {
        self.submit_thumbnails(controller.take_thumbnail_requests());

        let mut applied = 0;
        while let Some(event) = self.try_recv() {
            event.apply_to(controller);
            applied += 1;
        }

        if applied > 0 {
            // Completions may have opened views with new thumbnails
            self.submit_thumbnails(controller.take_thumbnail_requests());
        }
        applied
    }

    /// Close the job queues and wait for in-flight work to finish
    pub fn shutdown(self) {
        let Self {
            fetch_tx,
            thumbnail_tx,
            threads,
            ..
        } = self;
        drop(fetch_tx);
        drop(thumbnail_tx);

        for handle in threads {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }
    }
}

struct EventSink {
    tx: Sender<WorkerEvent>,
    wake: Option<Wake>,
}

impl EventSink {
    fn new(tx: Sender<WorkerEvent>, wake: Option<Wake>) -> Self {
        Self { tx, wake }
    }

    /// False once the receiving side is gone
    fn send(&self, event: WorkerEvent) -> bool {
        if self.tx.send(event).is_err() {
            return false;
        }
        if let Some(wake) = &self.wake {
            wake();
        }
        true
    }
}
