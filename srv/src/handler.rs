//! Per-connection request handling.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::Result;
use crate::settings::REQUEST_BUFLEN;
use crate::utils::path::resolve_request;

/// Serves requests on one connection until the client closes it.
/// Returns the number of requests answered.
pub fn handle_connection<S>(stream: &mut S, root: &Path) -> Result<u64>
where
    S: Read + Write,
{
    let mut buf = [0u8; REQUEST_BUFLEN];
    let mut served = 0;

    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }

        let name = String::from_utf8_lossy(&buf[..n]);
        debug!("request for '{}'", name);

        stream.write_all(&reply_for(root, &name))?;
        served += 1;
    }

    Ok(served)
}

fn reply_for(root: &Path, name: &str) -> Vec<u8> {
    let path = match resolve_request(root, name) {
        Some(path) => path,
        None => {
            warn!("refusing file name '{}'", name);
            return b"Error: invalid file name".to_vec();
        }
    };

    match fs::read(&path) {
        // a zero-length reply reads as a closed connection on the client.
        Ok(contents) if contents.is_empty() => b"Error: empty file".to_vec(),
        Ok(contents) => {
            info!("serving {} ({} bytes)", path.display(), contents.len());
            contents
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => b"Error: not found".to_vec(),
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            format!("Error: {}", e).into_bytes()
        }
    }
}
