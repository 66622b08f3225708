//! Splits a raw argument vector into option keys and positional tokens.
//!
//! This layer knows nothing about declared commands: `--port 80` binds `80`
//! to `port`, `--port=80` does the same, a trailing `--port` binds `true`.
//! The only declaration-aware knob is [`Parser::switch`], naming keys that
//! never consume the following token.
use tracing::trace;

use crate::value::Value;

/// Tokenized argv: option keys (dashes stripped) in order of appearance,
/// and the remaining positional tokens.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tokens {
    pub options: Vec<(String, Value)>,
    pub commands: Vec<String>,
}

impl Tokens {
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.options.iter().map(|(k, _)| k.as_str())
    }

    fn push_option(&mut self, key: String, value: Value) {
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Value::List(items))) => items.push(value),
            Some((_, prev)) => {
                let first = std::mem::replace(prev, Value::Bool(false));
                *prev = Value::List(vec![first, value]);
            }
            None => self.options.push((key, value)),
        }
    }
}

pub struct Parser {
    after_double_dash: bool,
    switches: Vec<String>,
    rargs: Vec<String>,
}

impl Parser {
    pub fn new(mut args: Vec<String>) -> Self {
        args.reverse();
        Self { after_double_dash: false, switches: Vec::new(), rargs: args }
    }

    pub fn new_from_env() -> Self {
        let args = std::env::args_os().map(|it| it.to_string_lossy().into_owned()).collect();
        let mut res = Parser::new(args);
        let _progn = res.next();
        res
    }

    /// Marks `key` as a switch: it binds `true` and never takes the next
    /// token as its value.
    pub fn switch(mut self, key: impl Into<String>) -> Self {
        self.switches.push(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rargs.is_empty()
    }

    /// `Ok` for something that looks like a flag, `Err` for a positional
    /// token.
    pub fn pop_flag(&mut self) -> Option<Result<String, String>> {
        if self.after_double_dash {
            return self.next().map(Err);
        }
        let arg = self.next()?;
        if arg == "--" {
            self.after_double_dash = true;
            return self.next().map(Err);
        }
        if arg.starts_with('-') && arg != "-" && !is_negative_number(&arg) {
            Some(Ok(arg))
        } else {
            Some(Err(arg))
        }
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn at_value(&self) -> bool {
        match self.rargs.last() {
            Some(next) => !next.starts_with('-') || is_negative_number(next),
            None => false,
        }
    }

    pub fn tokenize(mut self) -> Tokens {
        let mut res = Tokens::default();
        while let Some(arg) = self.pop_flag() {
            match arg {
                Ok(flag) => {
                    let body = flag.trim_start_matches('-');
                    let (key, inline) = match body.split_once('=') {
                        Some((key, value)) => (key, Some(value)),
                        None => (body, None),
                    };
                    if key.is_empty() {
                        res.commands.push(flag);
                        continue;
                    }
                    let value = match inline {
                        Some(value) => Value::Str(value.to_string()),
                        None if self.switches.iter().any(|it| it == key) => Value::Bool(true),
                        None if self.at_value() => match self.next() {
                            Some(value) => Value::Str(value),
                            None => Value::Bool(true),
                        },
                        None => Value::Bool(true),
                    };
                    trace!(key, %value, "option token");
                    res.push_option(key.to_string(), value);
                }
                Err(positional) => {
                    trace!(%positional, "positional token");
                    res.commands.push(positional);
                }
            }
        }
        res
    }
}

fn is_negative_number(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) => !rest.is_empty() && rest.parse::<f64>().is_ok(),
        None => false,
    }
}
