//! Session state machine.
//!
//! One connection, one request at a time: prompt, send, receive, classify,
//! then back to the prompt until the operator leaves or the transport fails.

use std::io::{Read, Write};
use std::net::TcpStream;

use log::{info, trace, warn};

use super::error::{ClientError, Result};
use super::exchange::{receive_response, send_request, ReceiveStrategy, Saved};
use super::format::{Command, Request};
use super::net::Network;
use super::prompt::Prompt;
use super::settings::{CONTINUE_PROMPT, FILENAME_PROMPT};
use super::sink::SinkProvider;
use super::ClientOptions;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    Connecting,
    Connected,
    AwaitingRequest,
    RequestSent,
    AwaitingResponse,
    /// Terminal, the connection has been released.
    Closed,
}

/// Outcome counts of a session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub saved: u32,
    pub rejected: u32,
    pub failed: u32,
    pub bytes: u64,
}

#[derive(Debug)]
pub struct Session<C, P>
where
    C: Read + Write,
    P: SinkProvider,
{
    /// `None` once closed.
    conn: Option<C>,

    sinks: P,

    /// receive buffer, one response at a time.
    buf: Vec<u8>,

    strategy: ReceiveStrategy,

    state: State,

    summary: Summary,
}

impl<P> Session<TcpStream, P>
where
    P: SinkProvider,
{
    /// Connects to `host` through the network context.
    pub fn connect(network: &Network, host: &str, sinks: P) -> Result<Self> {
        trace!("session: {:?}", State::Connecting);
        let stream = network.connect(host)?;
        Ok(Self::new(stream, sinks, network.options()))
    }
}

impl<C, P> Session<C, P>
where
    C: Read + Write,
    P: SinkProvider,
{
    /// Wraps an established connection.
    pub fn new(conn: C, sinks: P, opts: &ClientOptions) -> Self {
        Self {
            conn: Some(conn),
            sinks,
            buf: vec![0u8; opts.buffer_size],
            strategy: opts.receive_strategy,
            state: State::Connected,
            summary: Summary::default(),
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    fn transition(&mut self, next: State) {
        trace!("session: {:?} -> {:?}", self.state, next);
        self.state = next;
        if next == State::Closed && self.conn.take().is_some() {
            info!("connection released");
        }
    }

    /// Releases the connection; no further requests are possible.
    #[allow(dead_code)]
    pub fn close(&mut self) {
        self.transition(State::Closed);
    }

    /// Runs one request/response cycle.
    ///
    /// Rejections and local sink failures leave the session usable, any
    /// other error closes it. With `ReceiveStrategy::UntilClose` every
    /// outcome closes it, since unread file bytes may remain on the stream.
    pub fn request(&mut self, request: &Request) -> Result<Saved> {
        if self.is_closed() {
            return Err(ClientError::SessionClosed);
        }
        self.transition(State::AwaitingRequest);

        let res = self.exchange(request);

        match &res {
            _ if self.strategy == ReceiveStrategy::UntilClose => self.transition(State::Closed),
            Ok(saved) if saved.peer_closed => self.transition(State::Closed),
            Ok(_) => self.transition(State::AwaitingRequest),
            Err(e) if e.is_recoverable() => self.transition(State::AwaitingRequest),
            Err(e) => {
                warn!("closing session after '{}': {}", request, e);
                self.transition(State::Closed);
            }
        }

        res
    }

    fn exchange(&mut self, request: &Request) -> Result<Saved> {
        let conn = self.conn.as_mut().ok_or(ClientError::SessionClosed)?;
        send_request(conn, request)?;
        self.transition(State::RequestSent);

        self.transition(State::AwaitingResponse);
        let conn = self.conn.as_mut().ok_or(ClientError::SessionClosed)?;
        receive_response(conn, &mut self.buf, &self.sinks, request, self.strategy)
    }

    /// Drives the interactive loop until the operator leaves or a fatal
    /// error occurs. The session is closed on return.
    pub fn run<O>(&mut self, prompt: &mut O) -> Result<()>
    where
        O: Prompt,
    {
        let res = self.drive(prompt);
        self.transition(State::Closed);
        res
    }

    fn drive<O>(&mut self, prompt: &mut O) -> Result<()>
    where
        O: Prompt,
    {
        while !self.is_closed() {
            let request = match Command::parse(&prompt.line(FILENAME_PROMPT)?) {
                Command::Empty => continue,
                Command::Exit => {
                    info!("operator requested exit");
                    return Ok(());
                }
                Command::Fetch(request) => request,
            };

            match self.request(&request) {
                Ok(saved) => {
                    self.summary.saved += 1;
                    self.summary.bytes += saved.bytes;
                    prompt.show(&format!(
                        "Received {} bytes into {}",
                        saved.bytes,
                        saved.path.display()
                    ))?;
                    if saved.peer_closed {
                        // the peer ended the stream along with the file.
                        prompt.show("Connection closed by the server")?;
                    }
                }
                Err(ClientError::ServerRejected(message)) => {
                    self.summary.rejected += 1;
                    prompt.show(&format!("Server rejected '{}': {}", request, message))?;
                }
                Err(e @ ClientError::Io { .. }) => {
                    self.summary.failed += 1;
                    prompt.show(&e.to_string())?;
                }
                Err(e) => return Err(e),
            }

            if self.is_closed() {
                return Ok(());
            }

            if !prompt.confirm(CONTINUE_PROMPT)? {
                return Ok(());
            }
        }

        Ok(())
    }
}
