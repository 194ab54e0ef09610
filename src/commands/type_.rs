use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the string representation of the type of the value stored at `key`.
///
/// Only `string` and `list` can be returned by this server. If the key does not exist, `none` is
/// returned.
///
/// Ref: <https://redis.io/docs/latest/commands/type/>
#[derive(Debug, PartialEq)]
pub struct Type {
    pub key: String,
}

impl Executable for Type {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let type_ = store.lock().value_type(&self.key).unwrap_or("none");

        Ok(Frame::Simple(type_.to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Type {
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

    fn type_of(store: &Store, key: &'static str) -> Frame {
        Command::try_from(vec![Bytes::from("TYPE"), Bytes::from(key)])
            .unwrap()
            .exec(store.clone())
            .unwrap()
    }

    #[test]
    fn string_and_list_keys() {
        let store = Store::new();
        store.lock().set(String::from("key1"), Bytes::from("1"));
        store.lock().lpush("key2", vec![Bytes::from("a")]).unwrap();

        assert_eq!(type_of(&store, "key1"), Frame::Simple("string".to_string()));
        assert_eq!(type_of(&store, "key2"), Frame::Simple("list".to_string()));
    }

    #[test]
    fn missing_key() {
        let store = Store::new();

        assert_eq!(type_of(&store, "key1"), Frame::Simple("none".to_string()));
    }
}
