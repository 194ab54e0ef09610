// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

static CRLF: &[u8; 2] = b"\r\n";

/// A reply sent back to the client. Commands build frames, they never write wire bytes directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    NullBulkString,
    Array(Vec<Frame>),
    NullArray,
}

impl Frame {
    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }

    /// Builds an array of bulk strings, the shape of every list reply.
    pub fn bulks<I>(items: I) -> Frame
    where
        I: IntoIterator<Item = Bytes>,
    {
        Frame::Array(items.into_iter().map(Frame::Bulk).collect())
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = BytesMut::new();
        self.write_to(&mut bytes);
        bytes.to_vec()
    }

    /// Appends the wire representation of the frame to `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        match self {
            Frame::Simple(s) => {
                dst.put_u8(DataType::SimpleString.into());
                dst.put_slice(s.as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Error(s) => {
                dst.put_u8(DataType::SimpleError.into());
                dst.put_slice(s.as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Integer(i) => {
                dst.put_u8(DataType::Integer.into());
                dst.put_slice(i.to_string().as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Bulk(bytes) => {
                dst.put_u8(DataType::BulkString.into());
                dst.put_slice(bytes.len().to_string().as_bytes());
                dst.put_slice(CRLF);
                dst.put_slice(bytes);
                dst.put_slice(CRLF);
            }
            // RESP2 encodes null bulk strings and null arrays differently, clients tell them apart.
            Frame::NullBulkString => {
                dst.put_u8(DataType::BulkString.into());
                dst.put_slice(b"-1");
                dst.put_slice(CRLF);
            }
            Frame::Array(arr) => {
                dst.put_u8(DataType::Array.into());
                dst.put_slice(arr.len().to_string().as_bytes());
                dst.put_slice(CRLF);
                for frame in arr {
                    frame.write_to(dst);
                }
            }
            Frame::NullArray => {
                dst.put_u8(DataType::Array.into());
                dst.put_slice(b"-1");
                dst.put_slice(CRLF);
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::NullBulkString => write!(f, "$-1"),
            Frame::Array(arr) => {
                write!(f, "*{}", arr.len())?;
                for frame in arr {
                    write!(f, " {}", frame)?;
                }
                Ok(())
            }
            Frame::NullArray => write!(f, "*-1"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_simple_string() {
        assert_eq!(Frame::ok().serialize(), b"+OK\r\n");
    }

    #[test]
    fn serialize_error() {
        let frame = Frame::Error("ERR unknown command 'foo'".to_string());
        assert_eq!(frame.serialize(), b"-ERR unknown command 'foo'\r\n");
    }

    #[test]
    fn serialize_integers() {
        assert_eq!(Frame::Integer(42).serialize(), b":42\r\n");
        assert_eq!(Frame::Integer(-2).serialize(), b":-2\r\n");
    }

    #[test]
    fn serialize_bulk_string() {
        let frame = Frame::Bulk(Bytes::from("foobar"));
        assert_eq!(frame.serialize(), b"$6\r\nfoobar\r\n");
    }

    #[test]
    fn null_bulk_string_differs_from_empty_bulk_string() {
        assert_eq!(Frame::NullBulkString.serialize(), b"$-1\r\n");
        assert_eq!(Frame::Bulk(Bytes::new()).serialize(), b"$0\r\n\r\n");
    }

    #[test]
    fn null_array_differs_from_empty_array() {
        assert_eq!(Frame::NullArray.serialize(), b"*-1\r\n");
        assert_eq!(Frame::Array(vec![]).serialize(), b"*0\r\n");
    }

    #[test]
    fn serialize_nested_array() {
        let frame = Frame::Array(vec![
            Frame::bulks([Bytes::from("a"), Bytes::from("b")]),
            Frame::Integer(1),
            Frame::NullBulkString,
        ]);

        assert_eq!(
            frame.serialize(),
            b"*3\r\n*2\r\n$1\r\na\r\n$1\r\nb\r\n:1\r\n$-1\r\n"
        );
    }

    #[test]
    fn binary_bulk_string_is_length_prefixed() {
        let frame = Frame::Bulk(Bytes::from_static(b"a\r\nb\0"));
        assert_eq!(frame.serialize(), b"$5\r\na\r\nb\0\r\n");
    }
}
