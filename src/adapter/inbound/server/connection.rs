//! One client connection: prompts, handshake, expiry and dispatch.

use std::io;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::render::render;
use super::{
    ServeContext, COMMAND_PROMPT, INVALID_UTF8, LINE_TOO_LONG, LOGIN_FAILED, LOGIN_PROMPT,
    LOGIN_SUCCEEDED, MAX_LINE_BYTES, PASSWORD_PROMPT, SESSION_EXPIRED, TOO_MANY_ATTEMPTS,
};
use crate::application::{AuthOutcome, SessionManager};
use crate::domain::Response;

/// Pause after a failed accept while refusing extra clients.
const REFUSE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Why a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionEnd {
    /// The client closed the stream.
    Closed,
    /// The login attempt limit was reached.
    TooManyAttempts,
    /// The client sent a line longer than [`MAX_LINE_BYTES`].
    LineTooLong,
}

/// One unit of client input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    NotUtf8,
    TooLong,
    Eof,
}

/// Serve one client until it disconnects.
///
/// `busy_listener`, when given, is drained while the client is served so that
/// further connection attempts are closed straight away. The caller resets
/// the session afterwards.
pub(crate) async fn serve<S>(
    stream: S,
    busy_listener: Option<&TcpListener>,
    ctx: &ServeContext,
    sessions: &mut SessionManager,
    connection_id: Uuid,
) -> io::Result<ConnectionEnd>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut failed_attempts: u32 = 0;

    send(&mut writer, LOGIN_PROMPT).await?;

    loop {
        let input = tokio::select! {
            input = read_input(&mut reader, &mut buf) => input?,
            () = refuse_extra_clients(busy_listener, connection_id) => continue,
        };
        let line = match input {
            Input::Line(line) => Some(line),
            Input::NotUtf8 => None,
            Input::TooLong => {
                warn!(%connection_id, limit = MAX_LINE_BYTES, "Input line too long, closing connection");
                send(&mut writer, LINE_TOO_LONG).await?;
                writer.shutdown().await?;
                return Ok(ConnectionEnd::LineTooLong);
            }
            Input::Eof => return Ok(ConnectionEnd::Closed),
        };
        let now = Utc::now();

        if sessions.session().state().is_logged_in() {
            if !sessions.is_authenticated_at(now) {
                info!(%connection_id, "Session expired");
                sessions.reset();
                send(&mut writer, SESSION_EXPIRED).await?;
                send(&mut writer, LOGIN_PROMPT).await?;
                continue;
            }

            let response = match &line {
                Some(line) => ctx.registry.dispatch_line(line, &sessions.snapshot(now)),
                None => Response::error(INVALID_UTF8),
            };
            debug!(%connection_id, success = response.is_success(), "Command handled");
            send(&mut writer, &render(&response, ctx.response_format)).await?;
            send(&mut writer, COMMAND_PROMPT).await?;
            continue;
        }

        let outcome = match &line {
            Some(line) => ctx.authenticator.handle_line(sessions.session_mut(), line, now),
            None => {
                debug!(%connection_id, "Undecodable handshake line");
                sessions.reset();
                AuthOutcome::Rejected
            }
        };

        match outcome {
            AuthOutcome::PasswordRequired => send(&mut writer, PASSWORD_PROMPT).await?,
            AuthOutcome::LoggedIn | AuthOutcome::AlreadyLoggedIn => {
                info!(%connection_id, "Client authenticated");
                failed_attempts = 0;
                send(&mut writer, LOGIN_SUCCEEDED).await?;
                send(&mut writer, COMMAND_PROMPT).await?;
            }
            AuthOutcome::Rejected => {
                failed_attempts += 1;
                send(&mut writer, LOGIN_FAILED).await?;
                if failed_attempts >= ctx.max_login_attempts {
                    warn!(%connection_id, attempts = failed_attempts, "Too many failed logins, closing connection");
                    send(&mut writer, TOO_MANY_ATTEMPTS).await?;
                    writer.shutdown().await?;
                    return Ok(ConnectionEnd::TooManyAttempts);
                }
                send(&mut writer, LOGIN_PROMPT).await?;
            }
        }
    }
}

/// Read one `\n`-terminated line of at most [`MAX_LINE_BYTES`].
///
/// A trailing `\r` is dropped. A final line without terminator still counts
/// as a line.
async fn read_input<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Input>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    // Room for the longest line plus `\r\n`.
    let limit = u64::try_from(MAX_LINE_BYTES + 2).unwrap_or(u64::MAX);
    let read = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(Input::Eof);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > MAX_LINE_BYTES {
        return Ok(Input::TooLong);
    }

    Ok(match std::str::from_utf8(buf) {
        Ok(line) => Input::Line(line.to_string()),
        Err(_) => Input::NotUtf8,
    })
}

async fn send<W>(writer: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Accept and immediately drop connections while a client is being served.
///
/// Never completes; it is only ever raced against the client's next line.
async fn refuse_extra_clients(listener: Option<&TcpListener>, connection_id: Uuid) {
    let Some(listener) = listener else {
        return std::future::pending().await;
    };

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                warn!(%peer, busy_with = %connection_id, "Refusing connection while another client is connected");
                drop(stream);
            }
            Err(err) => {
                warn!(error = %err, "Failed to accept connection while busy");
                tokio::time::sleep(REFUSE_RETRY_DELAY).await;
            }
        }
    }
}
