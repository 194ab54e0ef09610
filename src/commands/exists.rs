use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the number of keys that exist among the ones specified. A key mentioned multiple
/// times is counted multiple times.
///
/// Ref: <https://redis.io/docs/latest/commands/exists>
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub keys: Vec<String>,
}

impl Executable for Exists {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let mut store = store.lock();
        let count = self.keys.iter().filter(|key| store.exists(key)).count();
        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Exists {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::AtLeast(2))?;
        let keys = parser.remaining_strings()?;
        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;

    #[test]
    fn counts_repeated_keys() {
        let store = Store::new();
        store.lock().set(String::from("key1"), Bytes::from("1"));

        let cmd = Command::try_from(vec![
            Bytes::from("EXISTS"),
            Bytes::from("key1"),
            Bytes::from("key1"),
            Bytes::from("key2"),
        ])
        .unwrap();

        let res = cmd.exec(store.clone()).unwrap();

        assert_eq!(res, Frame::Integer(2));
    }
}
