//! Host console transport.
//!
//! Stands in for the radio link when running the simulator: telemetry
//! lines go to stdout, commands are typed on stdin.  A reader thread frames
//! stdin with [`LineDecoder`] and hands complete lines to the sample loop
//! through the bounded [`InboundLines`] channel.
//!
//! A successful `write` + `flush` counts as the acknowledgment.

use core::time::Duration;
use std::io::{self, Read, Write};
use std::thread::{self, JoinHandle};

use embassy_sync::channel::TrySendError;
use log::{debug, info, warn};

use crate::app::ports::LineTransport;
use crate::error::CommsError;
use crate::link::channels::{INBOUND_LINES, InboundLines};
use crate::link::codec::{Line, LineDecoder};

const READ_BUF_SIZE: usize = 64;

/// [`LineTransport`] over a writer plus an inbound line channel.
pub struct ConsoleTransport<W: Write> {
    out: W,
    inbound: &'static InboundLines,
}

impl ConsoleTransport<io::Stdout> {
    /// stdout for telemetry, stdin (via a reader thread) for commands.
    pub fn stdio() -> io::Result<(Self, JoinHandle<()>)> {
        let reader = spawn_reader(io::stdin(), &INBOUND_LINES)?;
        Ok((Self::new(io::stdout(), &INBOUND_LINES), reader))
    }
}

impl<W: Write> ConsoleTransport<W> {
    pub fn new(out: W, inbound: &'static InboundLines) -> Self {
        Self { out, inbound }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> LineTransport for ConsoleTransport<W> {
    fn send(&mut self, line: &str, _ack_timeout: Duration) -> Result<(), CommsError> {
        self.out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| {
                debug!("Console: write failed: {}", e);
                CommsError::Io
            })
    }

    fn try_receive(&mut self) -> Option<Line> {
        self.inbound.try_receive().ok()
    }
}

/// Spawn the thread that frames `input` into lines for `inbound`.
///
/// Runs until EOF or a read error.  Lines that find the channel full are
/// dropped with a warning.
pub fn spawn_reader<R>(input: R, inbound: &'static InboundLines) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("console-rx".into())
        .spawn(move || read_lines(input, inbound))
}

fn read_lines<R: Read>(mut input: R, inbound: &InboundLines) {
    let mut decoder = LineDecoder::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => {
                info!("Console: input closed");
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Console: read error: {}", e);
                return;
            }
        };
        decoder.feed(&buf[..n], |line| {
            if let Err(TrySendError::Full(line)) = inbound.try_send(line) {
                warn!("Console: inbound queue full, dropping {:?}", line.as_str());
            }
        });
    }
}
