//! Background resource relay.
//!
//! Serves the embedded [`ResourceCatalog`] to the running script over a local
//! named channel: a Unix domain socket under the temp directory, or a named
//! pipe on Windows. The channel name is a fixed prefix plus a build-time
//! token chosen by the generator, so concurrently running packaged
//! executables never collide.
//!
//! The relay accepts exactly one connection and then runs a synchronous
//! request/response loop: one resource name per line in, the resource bytes
//! (or a sentinel plus an error line) out. A malformed or missing-resource
//! request never ends the session; only the peer disconnecting does. There
//! are no timeouts — accept and read both block until the peer acts or the
//! process exits, at which point the task is abandoned.

#[cfg(unix)]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::catalog::{Lookup, ResourceCatalog};
use crate::error::RelayError;

/// Fixed literal prefix for relay channel names.
pub const CHANNEL_PREFIX: &str = "packhost-";

/// Sentinel line sent to the peer when a request cannot be served.
pub const INVALID_RESOURCE_SENTINEL: &str = "Invalid Resource";

/// Full channel name for a build-time token.
pub fn channel_name(token: &str) -> String {
    format!("{CHANNEL_PREFIX}{token}")
}

/// Filesystem path of the Unix domain socket for a token.
#[cfg(unix)]
pub fn socket_path(token: &str) -> PathBuf {
    std::env::temp_dir().join(channel_name(token))
}

/// Named pipe path for a token.
#[cfg(windows)]
pub fn pipe_path(token: &str) -> String {
    format!(r"\\.\pipe\{}", channel_name(token))
}

/// Single-connection server for the embedded resource catalog.
#[derive(Debug, Clone)]
pub struct ResourceRelay {
    catalog: Arc<ResourceCatalog>,
    token: String,
}

impl ResourceRelay {
    pub fn new(catalog: Arc<ResourceCatalog>, token: &str) -> Self {
        Self {
            catalog,
            token: token.to_string(),
        }
    }

    /// Bind the channel, wait for the single peer, and serve it until it
    /// disconnects. Bind and accept failures are fatal to the relay task
    /// only; the caller decides whether to surface them.
    #[cfg(unix)]
    pub async fn serve(self) -> Result<(), RelayError> {
        let path = socket_path(&self.token);
        remove_stale_socket(&path).await;
        let listener = tokio::net::UnixListener::bind(&path).map_err(RelayError::Bind)?;
        tracing::debug!(channel = %channel_name(&self.token), "relay listening");
        let (stream, _) = listener.accept().await.map_err(RelayError::Accept)?;
        tracing::debug!("relay peer connected");
        let result = self.session(stream).await;
        let _ = std::fs::remove_file(&path);
        result
    }

    #[cfg(windows)]
    pub async fn serve(self) -> Result<(), RelayError> {
        use tokio::net::windows::named_pipe::ServerOptions;

        let name = pipe_path(&self.token);
        let server = ServerOptions::new()
            .first_pipe_instance(true)
            .create(&name)
            .map_err(RelayError::Bind)?;
        tracing::debug!(channel = %channel_name(&self.token), "relay listening");
        server.connect().await.map_err(RelayError::Accept)?;
        tracing::debug!("relay peer connected");
        self.session(server).await
    }

    /// One session's request/response loop. Generic over the transport so
    /// tests can drive it with an in-memory duplex stream.
    pub async fn session<S>(&self, stream: S) -> Result<(), RelayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            // Tolerate CRLF peers; the lookup itself stays exact-match.
            let name = line.strip_suffix('\r').unwrap_or(&line);
            tracing::debug!(resource = name, "relay request");
            let lookup = self.catalog.lookup(name);
            if !matches!(lookup, Lookup::Found(_)) {
                tracing::debug!(resource = name, "relay request could not be served");
            }
            write_response(&mut writer, name, lookup).await?;
        }
        tracing::debug!("relay peer disconnected");
        Ok(())
    }
}

/// Encode one lookup result onto the wire.
///
/// Found: the full content in one write. Anything else: the sentinel line,
/// then one error-message line. Both cases end with an explicit flush.
async fn write_response<W>(writer: &mut W, name: &str, lookup: Lookup) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    match lookup {
        Lookup::Found(content) => {
            writer.write_all(&content).await?;
        }
        Lookup::NotFound => {
            let message = format!("no resource named `{name}` in the catalog");
            write_sentinel(writer, &message).await?;
        }
        Lookup::IoError(message) => {
            write_sentinel(writer, &message).await?;
        }
    }
    writer.flush().await?;
    Ok(())
}

/// Unlink a leftover socket file only when no live instance owns it.
///
/// A crashed predecessor leaves a socket nothing answers on; a probe connect
/// to that is refused and the file can go. A connectable socket belongs to a
/// running sibling, so it stays in place and the following bind reports the
/// name collision instead of silently replacing the channel.
#[cfg(unix)]
async fn remove_stale_socket(path: &Path) {
    if !path.exists() {
        return;
    }
    match tokio::net::UnixStream::connect(path).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
            let _ = std::fs::remove_file(path);
        }
        Err(_) => {}
    }
}

async fn write_sentinel<W>(writer: &mut W, message: &str) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(INVALID_RESOURCE_SENTINEL.as_bytes())
        .await?;
    writer.write_all(b"\n").await?;
    // Keep the error message to a single line so the peer's framing holds.
    let message = message.replace('\n', " ");
    writer.write_all(message.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn relay_with(entries: &[(&str, &[u8])]) -> ResourceRelay {
        ResourceRelay::new(Arc::new(ResourceCatalog::from_entries(entries)), "test")
    }

    /// Drive one session over an in-memory stream: write all request lines,
    /// close the write half, then collect everything the relay sent back.
    async fn run_session(relay: ResourceRelay, requests: &str) -> Vec<u8> {
        let (server_side, mut client_side) = tokio::io::duplex(64 * 1024);
        let server = tokio::spawn(async move { relay.session(server_side).await });

        client_side.write_all(requests.as_bytes()).await.unwrap();
        client_side.shutdown().await.unwrap();

        let mut response = Vec::new();
        client_side.read_to_end(&mut response).await.unwrap();
        server.await.unwrap().expect("session should end cleanly");
        response
    }

    #[tokio::test]
    async fn found_resource_is_served_verbatim() {
        let response = run_session(relay_with(&[("A", b"hello")]), "A\n").await;
        assert_eq!(response, b"hello");
    }

    #[tokio::test]
    async fn missing_resource_gets_sentinel_and_message_line() {
        let response = run_session(relay_with(&[("A", b"hello")]), "B\n").await;
        let text = String::from_utf8(response).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(INVALID_RESOURCE_SENTINEL));
        let message = lines.next().expect("error message line");
        assert!(message.contains("`B`"), "got: {message}");
    }

    #[tokio::test]
    async fn session_survives_a_miss_between_hits() {
        let response = run_session(relay_with(&[("A", b"hello")]), "A\nB\nA\n").await;
        let text = String::from_utf8(response).unwrap();
        assert!(text.starts_with("hello"), "got: {text}");
        assert!(text.ends_with("hello"), "got: {text}");
        assert!(text.contains(INVALID_RESOURCE_SENTINEL), "got: {text}");
    }

    #[tokio::test]
    async fn multi_line_resource_is_sent_before_flush() {
        let response = run_session(relay_with(&[("A", b"line1\nline2\n")]), "A\n").await;
        assert_eq!(response, b"line1\nline2\n");
    }

    #[tokio::test]
    async fn crlf_terminated_request_is_served() {
        let response = run_session(relay_with(&[("A", b"hello")]), "A\r\n").await;
        assert_eq!(response, b"hello");
    }

    #[tokio::test]
    async fn empty_request_line_is_a_miss_not_a_disconnect() {
        let response = run_session(relay_with(&[("A", b"hello")]), "\nA\n").await;
        let text = String::from_utf8(response).unwrap();
        assert!(text.starts_with(INVALID_RESOURCE_SENTINEL), "got: {text}");
        assert!(text.ends_with("hello"), "got: {text}");
    }

    #[tokio::test]
    async fn io_error_lookup_is_reported_on_one_line() {
        let mut catalog = ResourceCatalog::new();
        catalog.insert_file("Gone", std::path::PathBuf::from("/nonexistent/packhost/res"));
        let relay = ResourceRelay::new(Arc::new(catalog), "test");
        let response = run_session(relay, "Gone\n").await;
        let text = String::from_utf8(response).unwrap();
        assert_eq!(text.lines().count(), 2, "got: {text}");
        assert!(text.starts_with(INVALID_RESOURCE_SENTINEL), "got: {text}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn serve_accepts_one_socket_connection_and_serves_it() {
        use tokio::net::UnixStream;

        let token = format!("serve-test-{}", std::process::id());
        let relay = ResourceRelay::new(
            Arc::new(ResourceCatalog::from_entries(&[("A", b"hello")])),
            &token,
        );
        let path = socket_path(&token);
        let server = tokio::spawn(relay.serve());

        // The listener may not be bound yet; retry briefly.
        let mut stream = loop {
            match UnixStream::connect(&path).await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(10)).await,
            }
        };
        stream.write_all(b"A\n").await.unwrap();
        stream.shutdown().await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert_eq!(response, b"hello");
        server.await.unwrap().expect("serve should end cleanly");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stale_socket_from_a_dead_predecessor_is_replaced() {
        use tokio::net::UnixStream;

        let token = format!("stale-test-{}", std::process::id());
        let path = socket_path(&token);
        // A bound-then-dropped listener leaves its socket file behind.
        drop(tokio::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let relay = ResourceRelay::new(
            Arc::new(ResourceCatalog::from_entries(&[("A", b"hello")])),
            &token,
        );
        let server = tokio::spawn(relay.serve());

        let mut stream = loop {
            match UnixStream::connect(&path).await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(10)).await,
            }
        };
        stream.write_all(b"A\n").await.unwrap();
        stream.shutdown().await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert_eq!(response, b"hello");
        server.await.unwrap().expect("serve should end cleanly");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn second_instance_on_a_live_channel_reports_the_bind_collision() {
        use tokio::net::UnixStream;

        let token = format!("collision-test-{}", std::process::id());
        let first = ResourceRelay::new(
            Arc::new(ResourceCatalog::from_entries(&[("A", b"from-first")])),
            &token,
        );
        let path = socket_path(&token);
        let server = tokio::spawn(first.serve());

        let mut stream = loop {
            match UnixStream::connect(&path).await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(10)).await,
            }
        };

        let second = ResourceRelay::new(Arc::new(ResourceCatalog::new()), &token);
        let err = second.serve().await.unwrap_err();
        assert!(matches!(err, RelayError::Bind(_)), "got: {err:?}");

        // The first instance's session is untouched by the failed sibling.
        stream.write_all(b"A\n").await.unwrap();
        stream.shutdown().await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert_eq!(response, b"from-first");
        server.await.unwrap().expect("first relay should end cleanly");
    }

    #[test]
    fn channel_name_is_prefix_plus_token() {
        assert_eq!(channel_name("abc123"), "packhost-abc123");
    }
}
