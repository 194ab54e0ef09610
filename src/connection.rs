use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::{CommandCodec, ProtocolError};
use crate::frame::Frame;

/// A client socket, read as a stream of commands and written as a sink of reply frames.
pub struct Connection {
    pub id: Uuid,
    // Partially received commands stay in the framed read buffer, and the codec remembers how far
    // it got, until the rest of the bytes arrive.
    framed: Framed<TcpStream, CommandCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream, codec: CommandCodec) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, codec),
        }
    }

    /// Waits for the next complete command. `Ok(None)` means the peer closed the connection
    /// between two commands.
    pub async fn read_command(&mut self) -> Result<Option<Vec<Bytes>>, ProtocolError> {
        self.framed.next().await.transpose()
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), ProtocolError> {
        self.framed.send(frame).await
    }
}
