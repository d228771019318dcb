//! filefetch: request files from a remote server and save them locally.
use std::process::ExitCode;

use log::error;

mod client;

use crate::client::{ClientOptions, Network, Prompt, Result, Session, StdPrompt};

fn run() -> Result<()> {
    let opts = ClientOptions::new();
    let network = Network::init(opts.clone());

    let mut prompt = StdPrompt::stdio();
    let host = prompt.line("Enter the server name: ")?;

    let sinks = opts.sinks()?;
    let mut session = Session::connect(&network, &host, sinks)?;

    let res = session.run(&mut prompt);

    let summary = session.summary();
    prompt.show(&format!(
        "{} file(s) saved ({} bytes), {} rejected, {} failed locally",
        summary.saved, summary.bytes, summary.rejected, summary.failed
    ))?;

    res
}

fn main() -> ExitCode {
    // Init log config from env.
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
