//! Server module.

use log::{info, warn};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Accept loop stopped by Ctrl-C.
pub struct Server {
    addr: String,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Binds, installs the Ctrl-C handler and hands every accepted
    /// connection to `f` until shutdown.
    pub fn running<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(TcpStream),
    {
        let listener = TcpListener::bind(&self.addr)?;
        let local_addr = listener.local_addr()?;
        info!("listening on {local_addr}");

        let shutdown = self.shutdown.clone();
        ctrlc::set_handler(move || {
            info!("ctrlc handle ...");

            shutdown.store(true, Ordering::Relaxed);
            // wake the blocking accept.
            let _ = TcpStream::connect(local_addr);
        })?;

        serve(listener, &self.shutdown, f);

        Ok(())
    }
}

/// Accepts connections until `shutdown` is set; the connection that
/// observes the flag is dropped unserved.
pub fn serve<F>(listener: TcpListener, shutdown: &AtomicBool, mut f: F)
where
    F: FnMut(TcpStream),
{
    for stream in listener.incoming() {
        if shutdown.load(Ordering::Relaxed) {
            info!("Server shutting down...");
            return;
        }

        match stream {
            Ok(stream) => f(stream),
            Err(e) => warn!("accept failed: {e}"),
        }
    }
}
