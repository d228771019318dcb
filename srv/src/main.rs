//! Reference file server: answers each request with the named file from
//! its root directory, or with an `Error: <reason>` reply.
use std::env;
use std::net::TcpStream;
use std::path::PathBuf;

use log::{error, info};

mod error;
mod handler;
mod settings;
mod utils;

use crate::error::Result;
use crate::handler::handle_connection;
use crate::utils::server::Server;
use crate::utils::threadpool::WorkerPool;

fn main() -> Result<()> {
    // Init log config from env.
    env_logger::init();

    let root = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| settings::DEFAULT_ROOT.to_string()),
    );
    info!("serving files from {}", root.display());

    let addr = format!("{}:{}", "0.0.0.0", settings::DEFAULT_PORT);
    let mut server = Server::new(addr);

    let pool = WorkerPool::new(settings::WORKERS);

    server.running(move |mut stream: TcpStream| {
        match stream.peer_addr() {
            Ok(peer) => info!("Connection established! from {peer}"),
            Err(e) => info!("Connection established! (peer unknown: {e})"),
        }

        let root = root.clone();
        let res = pool.execute(move || match handle_connection(&mut stream, &root) {
            Ok(served) => info!("connection done, {served} request(s) served"),
            Err(e) => error!("{:?}", e),
        });

        if let Err(e) = res {
            error!("{e}");
        }
    })?;

    Ok(())
}
