//! Command handler for the line-oriented shell

use std::fmt;

use ringcache::{Error, SharedCache};

/// Reply to a single command line
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Value(String),
    Nil,
    Integer(i64),
    List(Vec<String>),
    Text(String),
    Error(String),
    Quit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(v) => write!(f, "\"{}\"", v),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::List(items) if items.is_empty() => write!(f, "(empty)"),
            Reply::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) \"{}\"", i + 1, item)?;
                }
                Ok(())
            }
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Error(msg) => write!(f, "ERR {}", msg),
            Reply::Quit => write!(f, "BYE"),
        }
    }
}

const HELP: &str = "\
SET key value   store value (moves key to front)
GET key         fetch value (moves key to front)
DEL key [..]    remove keys
EXISTS key [..] count resident keys (no promotion)
LEN             number of entries
KEYS            keys, most recent first
CLEAR           drop every entry
STATS           hit/miss/eviction counters
QUIT            exit";

pub struct CommandHandler {
    cache: SharedCache<String, String>,
}

impl CommandHandler {
    pub fn new(cache: SharedCache<String, String>) -> Self {
        Self { cache }
    }

    pub fn handle(&self, line: &str) -> Option<Reply> {
        let mut parts = line.split_whitespace();
        let command = parts.next()?.to_uppercase();
        let args: Vec<&str> = parts.collect();

        let reply = match command.as_str() {
            "SET" => self.handle_set(&args),
            "GET" => self.handle_get(&args),
            "DEL" => self.handle_del(&args),
            "EXISTS" => self.handle_exists(&args),
            "LEN" => Reply::Integer(self.cache.len() as i64),
            "KEYS" => self.handle_keys(),
            "CLEAR" => {
                self.cache.clear();
                Reply::Ok
            }
            "STATS" => self.handle_stats(),
            "HELP" => Reply::Text(HELP.to_string()),
            "QUIT" | "EXIT" => Reply::Quit,
            _ => Reply::Error(format!("unknown command '{}'", command)),
        };
        Some(reply)
    }

    fn handle_set(&self, args: &[&str]) -> Reply {
        if args.len() < 2 {
            return Reply::Error("wrong number of arguments for 'set' command".to_string());
        }

        self.cache.set(args[0].to_string(), args[1..].join(" "));
        Reply::Ok
    }

    fn handle_get(&self, args: &[&str]) -> Reply {
        if args.len() != 1 {
            return Reply::Error("wrong number of arguments for 'get' command".to_string());
        }

        match self.cache.get(args[0]) {
            Ok(value) => Reply::Value(value),
            Err(Error::NotFound) => Reply::Nil,
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn handle_del(&self, args: &[&str]) -> Reply {
        if args.is_empty() {
            return Reply::Error("wrong number of arguments for 'del' command".to_string());
        }

        let deleted = args
            .iter()
            .filter(|key| self.cache.remove(**key).is_some())
            .count();
        Reply::Integer(deleted as i64)
    }

    fn handle_exists(&self, args: &[&str]) -> Reply {
        if args.is_empty() {
            return Reply::Error("wrong number of arguments for 'exists' command".to_string());
        }

        let count = args.iter().filter(|key| self.cache.contains(**key)).count();
        Reply::Integer(count as i64)
    }

    fn handle_keys(&self) -> Reply {
        Reply::List(self.cache.with(|c| c.keys().cloned().collect()))
    }

    fn handle_stats(&self) -> Reply {
        let info = self.cache.with(|c| {
            let stats = c.stats();
            format!(
                "len:{}\n\
                 capacity:{}\n\
                 hits:{}\n\
                 misses:{}\n\
                 inserts:{}\n\
                 updates:{}\n\
                 evictions:{}\n\
                 hit_ratio:{:.2}",
                c.len(),
                c.capacity(),
                stats.hits(),
                stats.misses(),
                stats.inserts(),
                stats.updates(),
                stats.evictions(),
                stats.hit_ratio(),
            )
        });
        Reply::Text(info)
    }
}
