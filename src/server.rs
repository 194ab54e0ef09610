use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{self, Duration};
use tracing::{debug, error, info, instrument, warn};

use crate::codec::{CommandCodec, ProtocolError};
use crate::commands;
use crate::config::Config;
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Result;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(config: Config) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((config.bind, config.port)).await?;

    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, Store::new(), config.max_bulk_len).await
}

/// Accepts connections from `listener` forever, each one served by its own task against the
/// shared `store`.
pub async fn serve(listener: TcpListener, store: Store, max_bulk_len: usize) -> Result<()> {
    loop {
        let (socket, client_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                // Errors such as running out of file descriptors persist for a while.
                time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let store = store.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, store, max_bulk_len).await {
                error!("Connection failed: {}", e);
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, store, max_bulk_len),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    max_bulk_len: usize,
) -> Result<()> {
    let mut conn = Connection::new(stream, CommandCodec::new(max_bulk_len));

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    loop {
        let args = match conn.read_command().await {
            Ok(Some(args)) => args,
            Ok(None) => break,
            Err(ProtocolError::Io(e)) => return Err(e.into()),
            Err(e) => {
                // The stream position is unknown after a framing error, so the client gets a
                // single error reply and the connection is dropped.
                warn!("Closing connection after protocol error: {}", e);
                conn.write_frame(Frame::Error(format!("ERR {}", e))).await?;
                return Ok(());
            }
        };

        debug!("Received command from client: {:?}", args);
        let res = commands::execute(args, &store);
        debug!("Sending response to client: {:?}", res);

        conn.write_frame(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
