use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the length of the list stored at `key`. If `key` does not exist, it is interpreted as
/// an empty list and 0 is returned.
///
/// Ref: <https://redis.io/docs/latest/commands/llen/>
#[derive(Debug, PartialEq)]
pub struct Llen {
    pub key: String,
}

impl Executable for Llen {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let len = store.lock().llen(&self.key)?;
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Llen {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(2))?;
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;
    use crate::store::StoreError;

    #[test]
    fn existing_and_missing_lists() {
        let store = Store::new();
        store
            .lock()
            .rpush("list", vec![Bytes::from("a"), Bytes::from("b")])
            .unwrap();

        let llen = |key: &'static str| {
            Command::try_from(vec![Bytes::from("LLEN"), Bytes::from(key)])
                .unwrap()
                .exec(store.clone())
        };

        assert_eq!(llen("list"), Ok(Frame::Integer(2)));
        assert_eq!(llen("missing"), Ok(Frame::Integer(0)));

        store.lock().set(String::from("key1"), Bytes::from("1"));
        assert_eq!(llen("key1"), Err(CommandError::Store(StoreError::WrongType)));
    }
}
