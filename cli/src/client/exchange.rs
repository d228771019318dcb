//! Request encoder and response interpreter.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use log::{debug, trace};

use super::error::{ClientError, Result};
use super::format::{Request, Response};
use super::sink::SinkProvider;

/// How much of the stream makes up one file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ReceiveStrategy {
    /// One bounded read per request. Anything past the receive buffer is
    /// truncated; the connection stays open for the next request.
    #[default]
    SingleRead,

    /// Keep reading into the sink until the peer closes the stream.
    /// Only one file can be fetched per connection.
    UntilClose,
}

/// A payload written to its sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub path: PathBuf,
    pub bytes: u64,

    /// Peer closed the stream after the payload.
    pub peer_closed: bool,
}

/// Sends the raw request bytes with a single write.
///
/// A short write is reported as a transport error, never completed with
/// a second transmission.
pub fn send_request<C>(conn: &mut C, request: &Request) -> Result<()>
where
    C: Write,
{
    let bytes = request.as_bytes();

    let written = loop {
        match conn.write(bytes) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ClientError::Transport(e)),
        }
    };

    if written != bytes.len() {
        return Err(ClientError::Transport(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write, sent {} of {} bytes", written, bytes.len()),
        )));
    }

    conn.flush().map_err(ClientError::Transport)?;
    trace!("sent request '{}' ({} bytes)", request, written);

    Ok(())
}

fn read_once<C>(conn: &mut C, buf: &mut [u8]) -> Result<usize>
where
    C: Read,
{
    loop {
        match conn.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ClientError::Transport(e)),
        }
    }
}

/// Reads one response and either reports the rejection or writes the
/// payload to the sink named after `request`.
///
/// The sink is only created once the response is known not to be a
/// rejection, and is closed on every return path.
pub fn receive_response<C, P>(
    conn: &mut C,
    buf: &mut [u8],
    sinks: &P,
    request: &Request,
    strategy: ReceiveStrategy,
) -> Result<Saved>
where
    C: Read,
    P: SinkProvider,
{
    let n = read_once(conn, buf)?;
    if n == 0 {
        return Err(ClientError::PeerClosed);
    }
    debug!("received {} bytes for '{}'", n, request);

    if let Response::Rejected(message) = Response::classify(&buf[..n]) {
        return Err(ClientError::ServerRejected(message));
    }

    let path = sinks.locate(request.name());
    let io_err = |source: io::Error| ClientError::Io {
        path: path.clone(),
        source,
    };

    let mut sink = sinks.create(&path).map_err(io_err)?;
    sink.write_all(&buf[..n]).map_err(io_err)?;

    let mut bytes = n as u64;
    let mut peer_closed = false;

    if strategy == ReceiveStrategy::UntilClose {
        loop {
            let n = read_once(conn, buf)?;
            if n == 0 {
                peer_closed = true;
                break;
            }
            sink.write_all(&buf[..n]).map_err(io_err)?;
            bytes += n as u64;
        }
    }

    sink.flush().map_err(io_err)?;
    debug!("wrote {} bytes to {}", bytes, path.display());

    Ok(Saved {
        path,
        bytes,
        peer_closed,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::Rng;
    use tempdir::TempDir;

    use super::super::settings::DEFAULT_BUFLEN;
    use super::super::sink::DirSinks;
    use super::super::testing::MockConn;
    use super::*;

    fn request(name: &str) -> Request {
        Request::new(name).unwrap()
    }

    #[test]
    fn it_should_send_raw_filename() {
        let mut conn = MockConn::new();
        send_request(&mut conn, &request("report.txt")).unwrap();

        assert_eq!(conn.written, b"report.txt");
        assert_eq!(conn.writes, 1);
    }

    #[test]
    fn short_write_is_transport_error() {
        let mut conn = MockConn::new().write_limit(4);
        let res = send_request(&mut conn, &request("report.txt"));

        assert!(matches!(res, Err(ClientError::Transport(_))));
        assert_eq!(conn.writes, 1, "short write must not be retried");
    }

    #[test]
    fn failed_write_is_transport_error() {
        let mut conn = MockConn::new().write_error(io::ErrorKind::BrokenPipe);
        let res = send_request(&mut conn, &request("report.txt"));

        match res {
            Err(ClientError::Transport(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn it_should_save_payload() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut conn = MockConn::new().reply(b"hello");
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let saved = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("report.txt"),
            ReceiveStrategy::SingleRead,
        )
        .unwrap();

        assert_eq!(saved.path, dir.path().join("report.txt"));
        assert_eq!(saved.bytes, 5);
        assert!(!saved.peer_closed);
        assert_eq!(fs::read(&saved.path).unwrap(), b"hello");
    }

    #[test]
    fn it_should_save_random_payload() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let mut rng = rand::thread_rng();
        let mut payload: Vec<u8> = (0..DEFAULT_BUFLEN).map(|_| rng.gen()).collect();
        // keep it clear of the rejection prefix.
        payload[0] = b'#';

        let mut conn = MockConn::new().reply(&payload);
        let saved = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("blob.bin"),
            ReceiveStrategy::SingleRead,
        )
        .unwrap();

        assert_eq!(fs::read(saved.path).unwrap(), payload);
    }

    #[test]
    fn rejection_creates_no_sink() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut conn = MockConn::new().reply(b"Error: not found");
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let res = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("missing.txt"),
            ReceiveStrategy::SingleRead,
        );

        match res {
            Err(ClientError::ServerRejected(message)) => assert_eq!(message, "not found"),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!dir.path().join("missing.txt").exists());
    }

    #[test]
    fn zero_byte_read_is_peer_closed() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut conn = MockConn::new();
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let res = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("report.txt"),
            ReceiveStrategy::SingleRead,
        );

        assert!(matches!(res, Err(ClientError::PeerClosed)));
        assert!(!dir.path().join("report.txt").exists());
    }

    #[test]
    fn read_error_is_transport_error() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut conn = MockConn::new().read_error(io::ErrorKind::ConnectionReset);
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let res = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("report.txt"),
            ReceiveStrategy::SingleRead,
        );

        assert!(matches!(res, Err(ClientError::Transport(_))));
    }

    #[test]
    fn interrupted_read_is_retried() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let mut conn = MockConn::new()
            .read_error(io::ErrorKind::Interrupted)
            .reply(b"hello");
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let saved = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("report.txt"),
            ReceiveStrategy::SingleRead,
        )
        .unwrap();

        assert_eq!(saved.bytes, 5);
    }

    #[test]
    fn single_read_truncates_to_buffer() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let payload = vec![b'x'; 20];
        let mut conn = MockConn::new().reply(&payload);
        let mut buf = [0u8; 8];

        let saved = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("big.txt"),
            ReceiveStrategy::SingleRead,
        )
        .unwrap();

        assert_eq!(saved.bytes, 8);
        assert_eq!(fs::read(saved.path).unwrap(), vec![b'x'; 8]);
        // the rest is left unread on the stream.
        assert_eq!(conn.pending(), 12);
    }

    #[test]
    fn until_close_reads_whole_stream() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path());
        let payload: Vec<u8> = (0..100u8).collect();
        let mut conn = MockConn::new().reply(&payload[..40]).reply(&payload[40..]);
        let mut buf = [0u8; 16];

        let saved = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("big.bin"),
            ReceiveStrategy::UntilClose,
        )
        .unwrap();

        assert_eq!(saved.bytes, 100);
        assert!(saved.peer_closed);
        assert_eq!(fs::read(saved.path).unwrap(), payload);
    }

    #[test]
    fn sink_failure_is_local_io_error() {
        let dir = TempDir::new("exchange-test").unwrap();
        let sinks = DirSinks::new(dir.path().join("missing"));
        let mut conn = MockConn::new().reply(b"hello");
        let mut buf = [0u8; DEFAULT_BUFLEN];

        let res = receive_response(
            &mut conn,
            &mut buf,
            &sinks,
            &request("report.txt"),
            ReceiveStrategy::SingleRead,
        );

        match res {
            Err(e @ ClientError::Io { .. }) => assert!(e.is_recoverable()),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
