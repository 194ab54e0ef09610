use bytes::Bytes;
use tokio::time::{Duration, Instant};

use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Set `key` to hold the string `value`. If key already holds a value, it is overwritten,
/// regardless of its type, and any previous time to live is discarded.
///
/// Options:
/// - `PX milliseconds`: set the specified expire time, in milliseconds.
/// - `EX seconds`: set the specified expire time, in seconds.
///
/// Ref: <https://redis.io/docs/latest/commands/set>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub ttl: Option<Ttl>,
}

#[derive(Debug, PartialEq)]
pub enum Ttl {
    Ex(u64),
    Px(u64),
}

impl Ttl {
    pub fn duration(&self) -> Duration {
        match self {
            Ttl::Ex(seconds) => Duration::from_secs(*seconds),
            Ttl::Px(millis) => Duration::from_millis(*millis),
        }
    }
}

impl Executable for Set {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let mut store = store.lock();

        match self.ttl {
            Some(ttl) => store.set_with_ttl(self.key, self.value, ttl.duration()),
            None => store.set(self.key, self.value),
        }

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Between(3, 5))?;
        if parser.len == 4 {
            return Err(CommandError::WrongArity {
                command: "set".to_string(),
            });
        }

        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        if !parser.has_remaining() {
            return Ok(Self {
                key,
                value,
                ttl: None,
            });
        }

        let option = parser.next_string()?.to_uppercase();
        let invalid_expire_time = || CommandError::InvalidExpireTime {
            command: "set".to_string(),
            option: option.clone(),
        };

        let amount = parser
            .next_integer()
            .ok()
            .and_then(|amount| u64::try_from(amount).ok());

        let ttl = match option.as_str() {
            "PX" => Ttl::Px(amount.ok_or_else(invalid_expire_time)?),
            "EX" => Ttl::Ex(amount.ok_or_else(invalid_expire_time)?),
            _ => return Err(CommandError::Syntax),
        };

        if Instant::now().checked_add(ttl.duration()).is_none() {
            return Err(invalid_expire_time());
        }

        Ok(Self {
            key,
            value,
            ttl: Some(ttl),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::store::KeyTtl;
    use tokio::time;

    #[test]
    fn without_ttl() {
        let store = Store::new();
        let cmd = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
        ])
        .unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("key1"),
                value: Bytes::from("value"),
                ttl: None,
            })
        );

        let res = cmd.exec(store.clone()).unwrap();

        assert_eq!(res, Frame::ok());
        assert_eq!(
            store.lock().get_string("key1"),
            Ok(Some(Bytes::from("value")))
        );
        assert_eq!(store.lock().ttl("key1"), KeyTtl::Persistent);
    }

    #[tokio::test(start_paused = true)]
    async fn with_px() {
        let store = Store::new();
        let cmd = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("px"),
            Bytes::from("1500"),
        ])
        .unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("key1"),
                value: Bytes::from("value"),
                ttl: Some(Ttl::Px(1500)),
            })
        );

        cmd.exec(store.clone()).unwrap();

        assert_eq!(
            store.lock().ttl("key1"),
            KeyTtl::Expires(Duration::from_millis(1500))
        );

        time::advance(Duration::from_millis(1500)).await;

        assert_eq!(store.lock().get_string("key1"), Ok(None));
    }

    #[test]
    fn with_ex() {
        let cmd = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("EX"),
            Bytes::from("10"),
        ])
        .unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("key1"),
                value: Bytes::from("value"),
                ttl: Some(Ttl::Ex(10)),
            })
        );
    }

    #[test]
    fn overwrites_list() {
        let store = Store::new();
        store
            .lock()
            .rpush("key1", vec![Bytes::from("a")])
            .unwrap();

        let cmd = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
        ])
        .unwrap();
        cmd.exec(store.clone()).unwrap();

        assert_eq!(
            store.lock().get_string("key1"),
            Ok(Some(Bytes::from("value")))
        );
    }

    #[test]
    fn invalid_px() {
        for amount in ["abc", "-1", "1.5"] {
            let err = Command::try_from(vec![
                Bytes::from("SET"),
                Bytes::from("key1"),
                Bytes::from("value"),
                Bytes::from("PX"),
                Bytes::from(amount),
            ])
            .unwrap_err();

            assert_eq!(
                err.to_string(),
                "ERR invalid expire time in 'set' command (PX)"
            );
        }
    }

    #[test]
    fn expire_time_out_of_clock_range() {
        let store = Store::new();

        let err = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("EX"),
            Bytes::from("9223372036854775807"),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "ERR invalid expire time in 'set' command (EX)"
        );
        assert_eq!(store.lock().get_string("key1"), Ok(None));

        let cmd = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("PX"),
            Bytes::from("9223372036854775807"),
        ])
        .unwrap();

        assert_eq!(cmd.exec(store.clone()).unwrap(), Frame::ok());
        assert!(matches!(store.lock().ttl("key1"), KeyTtl::Expires(_)));
    }

    #[test]
    fn unknown_option() {
        let err = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("KEEPTTL"),
            Bytes::from("1"),
        ])
        .unwrap_err();

        assert_eq!(err, CommandError::Syntax);
    }

    #[test]
    fn wrong_number_of_arguments() {
        let err = Command::try_from(vec![Bytes::from("SET"), Bytes::from("key1")]).unwrap_err();

        assert_eq!(
            err,
            CommandError::WrongArity {
                command: "set".to_string()
            }
        );

        let err = Command::try_from(vec![
            Bytes::from("SET"),
            Bytes::from("key1"),
            Bytes::from("value"),
            Bytes::from("PX"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            CommandError::WrongArity {
                command: "set".to_string()
            }
        );
    }
}
