//! Accept loop: one client at a time, cooperative shutdown, single rebind.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::connection::{self, ConnectionEnd};
use super::ServeContext;
use crate::application::SessionManager;

/// Upper bound on a client's TLS handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Run until shutdown is requested or the listener cannot be recreated.
pub(crate) async fn run(
    mut listener: TcpListener,
    addr: SocketAddr,
    acceptor: TlsAcceptor,
    ctx: Arc<ServeContext>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut sessions = SessionManager::new(ctx.max_session_length);
    info!(%addr, "Remote control listening");

    loop {
        let accepted = tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(()) => {
                        if *shutdown.borrow() {
                            info!("Shutdown signal received");
                            break;
                        }
                        continue;
                    }
                    Err(_) => {
                        info!("Shutdown channel closed");
                        break;
                    }
                }
            }
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                let connection_id = Uuid::new_v4();
                info!(%peer, %connection_id, "Client connected");

                match timeout(HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
                    Ok(Ok(tls)) => {
                        match connection::serve(tls, Some(&listener), &ctx, &mut sessions, connection_id).await {
                            Ok(ConnectionEnd::Closed) => {
                                info!(%peer, %connection_id, "Client disconnected");
                            }
                            Ok(ConnectionEnd::TooManyAttempts) => {
                                info!(%peer, %connection_id, "Client dropped after failed logins");
                            }
                            Ok(ConnectionEnd::LineTooLong) => {
                                info!(%peer, %connection_id, "Client dropped after an oversized line");
                            }
                            Err(err) => {
                                warn!(%peer, %connection_id, error = %err, "Client connection failed");
                            }
                        }
                    }
                    Ok(Err(err)) => {
                        warn!(%peer, %connection_id, error = %err, "TLS handshake failed");
                    }
                    Err(_) => {
                        warn!(%peer, %connection_id, "TLS handshake timed out");
                    }
                }

                sessions.reset();
                if *shutdown.borrow() {
                    info!("Shutdown requested during connection, stopping");
                    break;
                }
            }
            Err(err) => {
                error!(%addr, error = %err, "Listener accept failed, recreating listener");
                drop(listener);
                listener = match TcpListener::bind(addr).await {
                    Ok(rebound) => {
                        warn!(%addr, "Listener recreated");
                        rebound
                    }
                    Err(err) => {
                        error!(%addr, error = %err, "Failed to recreate listener, remote control stopped");
                        return;
                    }
                };
            }
        }
    }

    info!(%addr, "Remote control stopped");
}
