//! Snapshot transport
//!
//! Reads newline-delimited JSON snapshots from a TCP connection on a
//! background thread and forwards the parsed values to the event loop over a
//! channel. The event loop drains the channel between frames, so
//! reconciliation always runs on the windowing thread and each message is
//! fully applied before the next.

use packvis_core::{Error, Snapshot};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

/// Connect to `addr` in the background and stream snapshots into the
/// returned channel. The channel closes when the peer disconnects or the
/// connection fails; the receiver side decides whether that ends the
/// session.
pub fn spawn_snapshot_stream(addr: String) -> Receiver<Snapshot> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                log::error!("failed to start transport runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let stream = match TcpStream::connect(&addr).await {
                Ok(stream) => stream,
                Err(err) => {
                    log::error!("connect {addr}: {err}");
                    return;
                }
            };
            log::info!("connected to snapshot stream at {addr}");

            let mut lines = BufReader::new(stream).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<Snapshot>(&line) {
                            Ok(snapshot) => {
                                if tx.send(snapshot).is_err() {
                                    // Viewer is gone.
                                    return;
                                }
                            }
                            Err(err) => {
                                // A bad message must not block later ones.
                                let err = Error::Decode(err.to_string());
                                log::warn!("dropping undecodable snapshot: {err}");
                            }
                        }
                    }
                    Ok(None) => {
                        log::info!("snapshot stream closed by peer");
                        return;
                    }
                    Err(err) => {
                        log::error!("snapshot stream read: {err}");
                        return;
                    }
                }
            }
        });
    });
    rx
}
