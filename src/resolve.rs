//! Maps tokens onto declared commands and flags.
//!
//! Lookups are linear in declaration order and the first match wins. For
//! commands, word names are checked across the whole list before any alias,
//! so an alias never shadows another command's real name.
use tracing::debug;

use crate::{
    command::{Argument, Command, HELP_SLOT},
    flag::Flag,
    program::{HELP, VERSION},
    rt::Tokens,
    value::Value,
};

pub fn find_command<'c, 'a>(commands: &'c [Command<'a>], token: &str) -> Option<&'c Command<'a>> {
    command_index(commands, token).map(|idx| &commands[idx])
}

/// `token` must already be dash-stripped.
pub fn find_flag<'f>(flags: &'f [Flag], token: &str) -> Option<&'f Flag> {
    flags.iter().find(|it| it.matches(token))
}

pub(crate) fn command_index(commands: &[Command<'_>], token: &str) -> Option<usize> {
    let name = token.trim_start_matches('-');
    commands
        .iter()
        .position(|it| it.word_name() == name)
        .or_else(|| commands.iter().position(|it| it.aliases().iter().any(|alias| alias == name)))
}

/// A command found among the positional tokens, with the tokens it
/// consumed as argument values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invoked {
    pub(crate) command: usize,
    pub(crate) token: String,
    pub(crate) values: Vec<String>,
}

impl Invoked {
    /// First required argument that did not receive a value.
    pub(crate) fn missing<'c>(&self, command: &'c Command<'_>) -> Option<&'c Argument> {
        command.args().iter().skip(self.values.len()).find(|arg| arg.is_required)
    }

    /// Pairs declared arguments with consumed values; a variadic argument
    /// takes the rest as a list.
    pub(crate) fn bindings<'c>(&self, command: &'c Command<'_>) -> Vec<(&'c str, Value)> {
        let mut res = Vec::new();
        for (i, arg) in command.args().iter().enumerate() {
            if arg.is_variadic {
                let rest = self.values.get(i..).unwrap_or_default();
                if !rest.is_empty() {
                    res.push((arg.name.as_str(), Value::from(rest.to_vec())));
                }
                break;
            }
            match self.values.get(i) {
                Some(value) => res.push((arg.name.as_str(), Value::Str(value.clone()))),
                None => break,
            }
        }
        res
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub(crate) invoked: Vec<Invoked>,
    pub(crate) unknown: Vec<String>,
}

impl Invocation {
    /// Walks positional tokens left to right. A token naming a command
    /// consumes the tokens its arguments need; consumed tokens are never
    /// looked up as commands themselves.
    pub(crate) fn resolve(commands: &[Command<'_>], positionals: &[String]) -> Invocation {
        let mut res = Invocation::default();
        let mut i = 0;
        while i < positionals.len() {
            let token = &positionals[i];
            i += 1;
            let command = match command_index(commands, token) {
                Some(it) => it,
                None => {
                    res.unknown.push(token.clone());
                    continue;
                }
            };
            let mut values = Vec::new();
            for arg in commands[command].args() {
                if arg.is_variadic {
                    values.extend(positionals[i..].iter().cloned());
                    i = positionals.len();
                    break;
                }
                match positionals.get(i) {
                    Some(next) if arg.is_required || command_index(commands, next).is_none() => {
                        values.push(next.clone());
                        i += 1;
                    }
                    _ => break,
                }
            }
            debug!(command = commands[command].word_name(), ?values, "resolved command");
            res.invoked.push(Invoked { command, token: token.clone(), values });
        }
        res
    }

    pub(crate) fn contains(&self, command: usize) -> bool {
        self.invoked.iter().any(|it| it.command == command)
    }
}

/// Where an option key resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    Command { command: usize, flag: usize },
    Base(usize),
}

impl Owner {
    pub(crate) fn builtin(self) -> Option<Builtin> {
        match self {
            Owner::Base(HELP) => Some(Builtin::Help),
            Owner::Base(VERSION) => Some(Builtin::Version),
            Owner::Command { command, flag: HELP_SLOT } => Some(Builtin::CommandHelp(command)),
            _ => None,
        }
    }
}

/// Flags that stop the parse instead of binding a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    Version,
    CommandHelp(usize),
}

/// Option tokens grouped by the flag they resolved to, in order of first
/// appearance. Values given under both names of one flag merge into a list.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Given {
    pub(crate) owned: Vec<(Owner, Value)>,
    pub(crate) unowned: Vec<(String, Value)>,
}

impl Given {
    pub(crate) fn group(commands: &[Command<'_>], invocation: &Invocation, base: &[Flag], tokens: &Tokens) -> Given {
        let mut res = Given::default();
        for (key, raw) in &tokens.options {
            let owner = match flag_owner(commands, invocation, base, key) {
                Some(it) => it,
                None => {
                    res.unowned.push((key.clone(), raw.clone()));
                    continue;
                }
            };
            match res.owned.iter_mut().find(|(it, _)| *it == owner) {
                Some((_, prev)) => merge(prev, raw),
                None => res.owned.push((owner, raw.clone())),
            }
        }
        res
    }

    pub(crate) fn contains(&self, owner: Owner) -> bool {
        self.owned.iter().any(|(it, _)| *it == owner)
    }

    pub(crate) fn builtins(&self) -> impl Iterator<Item = Builtin> + '_ {
        self.owned.iter().filter_map(|(owner, _)| owner.builtin())
    }
}

fn merge(prev: &mut Value, next: &Value) {
    let mut items = match std::mem::replace(prev, Value::Bool(false)) {
        Value::List(it) => it,
        it => vec![it],
    };
    match next {
        Value::List(more) => items.extend(more.iter().cloned()),
        it => items.push(it.clone()),
    }
    *prev = Value::List(items);
}

/// Invoked commands' own flags are searched first, in invocation order,
/// then the program-level flags.
pub(crate) fn flag_owner(commands: &[Command<'_>], invocation: &Invocation, base: &[Flag], key: &str) -> Option<Owner> {
    for invoked in &invocation.invoked {
        let flags = commands[invoked.command].flags();
        if let Some(flag) = flags.iter().position(|it| it.matches(key)) {
            return Some(Owner::Command { command: invoked.command, flag });
        }
    }
    base.iter().position(|it| it.matches(key)).map(Owner::Base)
}
