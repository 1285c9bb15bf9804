//! Background transport.
//!
//! The interaction thread must never wait on the network. `BackgroundSession`
//! implements [`RemoteSession`] by pushing each call into an mpsc channel; a
//! worker thread owns the real transport and logs failures. Calls return
//! `Ack::Queued` as soon as they are enqueued.
//!
//! Before every send the worker drains the channel into [`PendingRequests`],
//! which keeps only the newest selection and focus sync. A slow backend
//! therefore receives the latest state next instead of working through
//! every superseded rectangle. Bulk edits are never dropped or reordered,
//! and a sync queued before a bulk edit stays before it.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use gridsync_protocol::{
    Ack, BulkEditCommand, GridAddress, RemoteError, RemoteSession, Request, SelectionRect,
};

/// What the worker did before it shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub sent: u64,
    pub failed: u64,
    /// Syncs replaced by a newer one of the same kind before being sent.
    pub superseded: u64,
}

/// Requests waiting for the worker, latest-wins per sync kind.
#[derive(Debug, Default)]
pub struct PendingRequests {
    queue: VecDeque<Request>,
}

fn same_kind(a: &Request, b: &Request) -> bool {
    matches!(
        (a, b),
        (Request::SyncSelection { .. }, Request::SyncSelection { .. })
            | (Request::SyncFocus { .. }, Request::SyncFocus { .. })
    )
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Returns true if it replaced an older sync.
    pub fn push(&mut self, request: Request) -> bool {
        let mut replaced = false;
        if !matches!(request, Request::BulkEdit { .. }) {
            // Only syncs after the last bulk edit may be collapsed.
            let floor = self
                .queue
                .iter()
                .rposition(|r| matches!(r, Request::BulkEdit { .. }))
                .map_or(0, |i| i + 1);
            if let Some(offset) = self.queue.iter().skip(floor).position(|r| same_kind(r, &request)) {
                self.queue.remove(floor + offset);
                replaced = true;
            }
        }
        self.queue.push_back(request);
        replaced
    }

    pub fn pop(&mut self) -> Option<Request> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

pub struct BackgroundSession {
    tx: Option<mpsc::Sender<Request>>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl BackgroundSession {
    /// Move `transport` onto a worker thread.
    pub fn spawn<T>(transport: T) -> std::io::Result<Self>
    where
        T: RemoteSession + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Request>();
        let handle = thread::Builder::new()
            .name("gridsync-sync".into())
            .spawn(move || run_worker(transport, rx))?;
        Ok(Self { tx: Some(tx), handle: Some(handle) })
    }

    fn enqueue(&mut self, request: Request) -> Result<Ack, RemoteError> {
        let tx = self.tx.as_ref().ok_or(RemoteError::ChannelClosed)?;
        tx.send(request).map_err(|_| RemoteError::ChannelClosed)?;
        Ok(Ack::Queued)
    }

    /// Close the channel and wait for the worker to finish what is queued.
    pub fn shutdown(mut self) -> WorkerStats {
        self.join()
    }

    fn join(&mut self) -> WorkerStats {
        drop(self.tx.take());
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                log::warn!("sync worker panicked");
                WorkerStats::default()
            }
            None => WorkerStats::default(),
        }
    }
}

impl Drop for BackgroundSession {
    fn drop(&mut self) {
        self.join();
    }
}

fn run_worker<T: RemoteSession>(mut transport: T, rx: mpsc::Receiver<Request>) -> WorkerStats {
    let mut stats = WorkerStats::default();
    let mut pending = PendingRequests::new();
    loop {
        if pending.is_empty() {
            match rx.recv() {
                Ok(request) => {
                    pending.push(request);
                }
                Err(_) => break,
            }
        }
        while let Ok(request) = rx.try_recv() {
            if pending.push(request) {
                stats.superseded += 1;
            }
        }
        let Some(request) = pending.pop() else {
            continue;
        };
        match transport.send(&request) {
            Ok(_) => stats.sent += 1,
            Err(e) => {
                stats.failed += 1;
                log::warn!("{} failed: {}", request.describe(), e);
            }
        }
    }
    log::debug!(
        "sync worker done (sent={}, failed={}, superseded={})",
        stats.sent,
        stats.failed,
        stats.superseded
    );
    stats
}

impl RemoteSession for BackgroundSession {
    fn sync_selection(&mut self, rect: &SelectionRect) -> Result<Ack, RemoteError> {
        self.enqueue(Request::SyncSelection { rect: *rect })
    }

    fn sync_focus(&mut self, focus: Option<GridAddress>) -> Result<Ack, RemoteError> {
        self.enqueue(Request::SyncFocus { focus })
    }

    fn apply_bulk_edit(&mut self, command: BulkEditCommand) -> Result<Ack, RemoteError> {
        self.enqueue(Request::BulkEdit { command })
    }
}
