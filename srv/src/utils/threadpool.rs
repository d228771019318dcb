//! Worker pool module.

use log::{debug, warn};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::error::{Result, ServeError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of threads, each serving one connection at a time.
pub struct WorkerPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::new(id, Arc::clone(&receiver)))
            .collect();

        Self {
            workers,
            sender: Some(sender),
        }
    }

    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(ServeError::PoolClosed)?;
        sender
            .send(Box::new(f))
            .map_err(|_| ServeError::PoolClosed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // closing the channel stops every worker once the queue drains.
        drop(self.sender.take());

        for worker in &mut self.workers {
            debug!("waiting for worker {}", worker.id);

            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!("worker {} panicked", worker.id);
                }
            }
        }
    }
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Self {
        let thread = thread::spawn(move || loop {
            let job = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };

            match job {
                Ok(job) => {
                    debug!("worker {id} got a connection");
                    job();
                }
                Err(_) => {
                    debug!("worker {id} exiting");
                    break;
                }
            }
        });

        Worker {
            id,
            thread: Some(thread),
        }
    }
}
