//! Serves a scripted bin-packing episode as newline-delimited JSON, one
//! snapshot per step, so the viewer can be exercised without a simulator.

use anyhow::Result;
use packvis_demos::scripted_episode;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let listener = TcpListener::bind("127.0.0.1:5000").await?;
    log::info!("serving scripted episode on 127.0.0.1:5000");

    loop {
        let (mut socket, peer) = listener.accept().await?;
        log::info!("viewer connected: {peer}");
        tokio::spawn(async move {
            for snapshot in scripted_episode(24, 7) {
                let mut line = match serde_json::to_string(&snapshot) {
                    Ok(line) => line,
                    Err(err) => {
                        log::error!("encode snapshot: {err}");
                        return;
                    }
                };
                line.push('\n');
                if socket.write_all(line.as_bytes()).await.is_err() {
                    log::info!("viewer disconnected: {peer}");
                    return;
                }
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
            log::info!("episode complete for {peer}");
        });
    }
}
