use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Get the value of `key`. If the key does not exist the special value `nil` is returned. An
/// error is returned if the value stored at `key` is not a string.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let value = store.lock().get_string(&self.key)?;

        Ok(value.map_or(Frame::NullBulkString, Frame::Bulk))
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(2))?;
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::store::StoreError;
    use bytes::Bytes;

    #[test]
    fn existing_key() {
        let cmd = Command::try_from(vec![Bytes::from("GET"), Bytes::from("key1")]).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("key1")
            })
        );

        let store = Store::new();
        store.lock().set(String::from("key1"), Bytes::from("1"));

        let result = cmd.exec(store.clone()).unwrap();

        assert_eq!(result, Frame::Bulk(Bytes::from("1")));
    }

    #[test]
    fn missing_key() {
        let cmd = Command::try_from(vec![Bytes::from("GET"), Bytes::from("key1")]).unwrap();

        let result = cmd.exec(Store::new()).unwrap();

        assert_eq!(result, Frame::NullBulkString);
    }

    #[test]
    fn list_key() {
        let cmd = Command::try_from(vec![Bytes::from("GET"), Bytes::from("key1")]).unwrap();

        let store = Store::new();
        store
            .lock()
            .rpush("key1", vec![Bytes::from("a")])
            .unwrap();

        let err = cmd.exec(store.clone()).unwrap_err();

        assert_eq!(err, CommandError::Store(StoreError::WrongType));
        assert_eq!(store.lock().llen("key1"), Ok(1));
    }
}
