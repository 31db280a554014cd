use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::common::{DbError, PageId, Result, DISK_QUEUE_DEPTH, PAGE_SIZE};

use super::DiskManager;

/// A disk I/O request processed by the scheduler's worker thread.
/// Requests carry owned page buffers; completions carry the I/O result so
/// failures surface synchronously to the scheduling caller.
pub enum DiskRequest {
    /// Read one page; the filled buffer comes back through the ack channel.
    Read {
        page_id: PageId,
        ack: mpsc::Sender<Result<Box<[u8; PAGE_SIZE]>>>,
    },
    /// Write one page from the given buffer.
    Write {
        page_id: PageId,
        data: Box<[u8; PAGE_SIZE]>,
        ack: mpsc::Sender<Result<()>>,
    },
}

/// DiskScheduler manages a background worker thread that processes disk I/O
/// requests from a bounded queue.
pub struct DiskScheduler {
    /// The disk manager for actual I/O operations
    disk_manager: Arc<DiskManager>,
    /// Channel sender for queuing requests
    request_sender: Sender<DiskRequest>,
    /// Flag to signal shutdown
    shutdown: Arc<AtomicBool>,
    /// Handle to the background worker thread
    worker_handle: Option<JoinHandle<()>>,
}

impl DiskScheduler {
    /// Creates a new DiskScheduler with the given DiskManager.
    /// Spawns a background worker thread to process requests.
    pub fn new(disk_manager: Arc<DiskManager>) -> Self {
        let (sender, receiver) = bounded::<DiskRequest>(DISK_QUEUE_DEPTH);
        let shutdown = Arc::new(AtomicBool::new(false));

        let dm_clone = Arc::clone(&disk_manager);
        let shutdown_clone = Arc::clone(&shutdown);

        let worker_handle = thread::spawn(move || {
            Self::start_worker_thread(dm_clone, receiver, shutdown_clone);
        });

        Self {
            disk_manager,
            request_sender: sender,
            shutdown,
            worker_handle: Some(worker_handle),
        }
    }

    /// Schedules a disk request for processing by the background worker.
    pub fn schedule(&self, request: DiskRequest) -> Result<()> {
        self.request_sender
            .send(request)
            .map_err(|e| DbError::Scheduler(format!("failed to schedule request: {}", e)))
    }

    /// Schedules a read request and waits for completion.
    pub fn schedule_read_sync(&self, page_id: PageId) -> Result<Box<[u8; PAGE_SIZE]>> {
        let (tx, rx) = mpsc::channel();
        self.schedule(DiskRequest::Read { page_id, ack: tx })?;

        rx.recv()
            .map_err(|e| DbError::Scheduler(format!("failed to receive completion: {}", e)))?
    }

    /// Schedules a write request and waits for completion.
    pub fn schedule_write_sync(&self, page_id: PageId, data: Box<[u8; PAGE_SIZE]>) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        self.schedule(DiskRequest::Write {
            page_id,
            data,
            ack: tx,
        })?;

        rx.recv()
            .map_err(|e| DbError::Scheduler(format!("failed to receive completion: {}", e)))?
    }

    /// The background worker thread function.
    /// Processes requests from the queue until shutdown is signaled.
    fn start_worker_thread(
        disk_manager: Arc<DiskManager>,
        receiver: Receiver<DiskRequest>,
        shutdown: Arc<AtomicBool>,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                // Drain remaining requests before exiting
                while let Ok(request) = receiver.try_recv() {
                    Self::process_request(&disk_manager, request);
                }
                break;
            }

            match receiver.recv_timeout(std::time::Duration::from_millis(100)) {
                Ok(request) => {
                    Self::process_request(&disk_manager, request);
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                    // Continue loop, check shutdown flag
                }
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                    break;
                }
            }
        }
    }

    /// Processes a single disk request.
    fn process_request(disk_manager: &DiskManager, request: DiskRequest) {
        match request {
            DiskRequest::Read { page_id, ack } => {
                let mut data = Box::new([0u8; PAGE_SIZE]);
                let result = disk_manager
                    .read_page(page_id, &mut data[..])
                    .map(|()| data);
                let _ = ack.send(result);
            }
            DiskRequest::Write { page_id, data, ack } => {
                let result = disk_manager.write_page(page_id, &data[..]);
                let _ = ack.send(result);
            }
        }
    }

    /// Returns a reference to the underlying DiskManager.
    pub fn disk_manager(&self) -> &Arc<DiskManager> {
        &self.disk_manager
    }
}

impl Drop for DiskScheduler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);

        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}
