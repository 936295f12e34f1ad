//! Headless Color Match runner (default binary).
//!
//! Reads line-delimited JSON commands from stdin and writes acks, errors and board
//! observations to stdout. Rendering is left to whatever sits on the other end of the
//! pipe.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use color_match::session::{handle_line, spawn_observation_stream, Session, SessionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = SessionConfig::from_env();
    eprintln!(
        "[Session] seed={} resolve_delay_ms={}",
        config.seed, config.resolve_delay_ms
    );

    let session = Session::spawn(config);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                break;
            }
        }
    });

    let observations = spawn_observation_stream(&session, out_tx.clone());

    let result = run(&session, &out_tx).await;

    // Always stop the session so the observation stream and writer drain.
    session.shutdown().await?;
    let _ = observations.await;
    drop(out_tx);
    let _ = writer.await;
    result
}

async fn run(
    session: &color_match::session::SessionHandle,
    out: &mpsc::UnboundedSender<String>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let reply = handle_line(session, &line).await?;
        if let Some(line) = reply.line {
            if out.send(line).is_err() {
                break;
            }
        }
        if reply.quit {
            break;
        }
    }
    Ok(())
}
