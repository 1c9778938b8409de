//! JSON-lines bridge loop.
//!
//! Serializes the two event sources (inbound lines and the fall timer) into a
//! single command stream over one [`Session`].

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::Instant;

use crate::core::GameSnapshot;
use crate::engine::Session;
use crate::protocol::{
    create_ack, create_error, create_observation, parse_message, ErrorCode, ParsedMessage,
    MAX_COMMANDS_PER_MESSAGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeOptions {
    /// Disable the internal fall timer; clients send `tick` commands.
    pub manual_ticks: bool,
}

/// Writes outbound messages as JSON lines, reusing one buffer.
struct LineWriter<W> {
    out: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(4096),
        }
    }

    async fn send<T: serde::Serialize>(&mut self, msg: &T) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, msg)?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf).await?;
        self.out.flush().await?;
        Ok(())
    }
}

struct Bridge<W> {
    session: Session,
    writer: LineWriter<W>,
    snap: GameSnapshot,
}

impl<W: AsyncWrite + Unpin> Bridge<W> {
    async fn observe(&mut self, seq: u64) -> Result<()> {
        self.session.snapshot_into(&mut self.snap);
        let obs = create_observation(seq, &self.snap, self.session.fall_interval_ms());
        self.writer.send(&obs).await
    }

    async fn handle_line(&mut self, line: &str) -> Result<()> {
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                return self
                    .writer
                    .send(&create_error(e.seq, e.code, &e.message))
                    .await
            }
        };

        match msg {
            ParsedMessage::Start(m) => {
                self.session.start();
                self.observe(m.seq).await
            }
            ParsedMessage::Snapshot(m) => self.observe(m.seq).await,
            ParsedMessage::Command(m) => {
                if !self.session.started() {
                    let err = create_error(m.seq, ErrorCode::NotStarted, "send start first");
                    return self.writer.send(&err).await;
                }

                let mut accepted = [false; MAX_COMMANDS_PER_MESSAGE];
                for (slot, cmd) in accepted.iter_mut().zip(m.commands.iter()) {
                    *slot = self.session.submit(cmd);
                }
                let accepted = &accepted[..m.commands.len()];

                self.writer.send(&create_ack(m.seq, accepted)).await?;
                if accepted.iter().any(|&a| a) {
                    self.observe(m.seq).await?;
                }
                Ok(())
            }
        }
    }

    /// Fold wall time since `last` into the session; observe if anything fell.
    async fn pump_clock(&mut self, last: &mut Instant) -> Result<()> {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(*last);
        *last = now;

        let ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        if self.session.advance(ms) > 0 {
            self.observe(0).await?;
        }
        Ok(())
    }
}

/// Run the bridge until `reader` reaches EOF. Returns the final session.
pub async fn run_bridge<R, W>(
    session: Session,
    options: BridgeOptions,
    reader: R,
    writer: W,
) -> Result<Session>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut bridge = Bridge {
        session,
        writer: LineWriter::new(writer),
        snap: GameSnapshot::default(),
    };
    let mut lines = reader.lines();
    let mut last = Instant::now();

    loop {
        let wait = if options.manual_ticks {
            None
        } else {
            bridge.session.until_next_tick_ms()
        };
        let timer = tokio::time::sleep(Duration::from_millis(wait.unwrap_or(0) as u64));

        tokio::select! {
            line = lines.next_line() => {
                if !options.manual_ticks {
                    bridge.pump_clock(&mut last).await?;
                }
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                bridge.handle_line(line).await?;
            }
            _ = timer, if wait.is_some() => {
                bridge.pump_clock(&mut last).await?;
            }
        }
    }

    Ok(bridge.session)
}

/// Run the bridge on the process's stdin/stdout.
pub async fn run_stdio(session: Session, options: BridgeOptions) -> Result<Session> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_bridge(session, options, stdin, stdout).await
}

/// Blocking entry point for synchronous hosts.
pub fn run_stdio_blocking(session: Session, options: BridgeOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_stdio(session, options))?;
    Ok(())
}
