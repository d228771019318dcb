//! Network context and connection acquisition.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};

use log::{debug, info, warn};

use super::error::{ClientError, Result};
use super::ClientOptions;

/// Process-wide networking context.
///
/// Created once before the first connection and dropped after the last
/// one is released.
#[derive(Debug)]
pub struct Network {
    opts: ClientOptions,
}

impl Network {
    pub fn init(opts: ClientOptions) -> Self {
        info!("network context initialized (port {})", opts.port);
        Self { opts }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.opts
    }

    /// Resolves `host` and connects to the first address that accepts.
    pub fn connect(&self, host: &str) -> Result<TcpStream> {
        let connect_err = |source: io::Error| ClientError::Connect {
            host: host.to_string(),
            source,
        };

        let addrs = (host, self.opts.port)
            .to_socket_addrs()
            .map_err(connect_err)?;

        let mut last_err = None;
        for addr in addrs {
            debug!("trying {} ...", addr);
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(self.opts.read_timeout)
                        .map_err(connect_err)?;
                    stream
                        .set_write_timeout(self.opts.write_timeout)
                        .map_err(connect_err)?;

                    info!("connected to {}", addr);
                    return Ok(stream);
                }
                Err(e) => {
                    warn!("connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(connect_err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no address resolved")
        })))
    }
}

impl Drop for Network {
    fn drop(&mut self) {
        info!("network context torn down");
    }
}
