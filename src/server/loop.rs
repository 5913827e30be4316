// Server loop module
// Accepts connections until the shutdown signal fires, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until `shutdown` is notified.
///
/// On shutdown the listening socket is closed immediately (no new
/// connections), then in-flight responses get a bounded grace period
/// before the loop returns.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    // Closing the listener here releases the socket before draining
    drop(listener);
    drain(&active_connections, state.config.performance.shutdown_grace).await;
    Ok(())
}

/// Wait for in-flight connections to finish, up to `grace_secs`.
async fn drain(active_connections: &AtomicUsize, grace_secs: u64) {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(grace_secs);

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {} connections still active",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
