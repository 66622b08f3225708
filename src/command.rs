use std::fmt;

use crate::{
    action::{Action, IntoAction},
    flag::{Flag, VALUE_REQUIRED},
    Error, Result,
};

/// Every command's flag list starts with its implicit help flag.
pub(crate) const HELP_SLOT: usize = 0;

/// A positional argument declared in brackets after the command name.
///
/// `[name]` is required, `[name?]` optional, `[name...]` consumes every
/// remaining positional token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub is_required: bool,
    pub is_variadic: bool,
    pub description: String,
}

impl Argument {
    fn parse(token: &str) -> Result<Argument> {
        let malformed = || Error::Configuration(format!("malformed argument `{token}`"));
        let inner = token.strip_prefix('[').and_then(|it| it.strip_suffix(']')).ok_or_else(malformed)?;
        let (inner, is_optional) = match inner.strip_suffix('?') {
            Some(it) => (it, true),
            None => (inner, false),
        };
        let (name, is_variadic) = match inner.strip_suffix("...") {
            Some(it) => (it, true),
            None => (inner, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return Err(malformed());
        }
        Ok(Argument {
            name: name.to_string(),
            is_required: !is_optional,
            is_variadic,
            description: String::new(),
        })
    }
}

/// A declared command: word name, aliases, positional arguments, its own
/// options and an optional action.
pub struct Command<'a> {
    value: String,
    word_name: String,
    aliases: Vec<String>,
    args: Vec<Argument>,
    flags: Vec<Flag>,
    description: String,
    pub(crate) action: Option<Action<'a>>,
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("value", &self.value)
            .field("word_name", &self.word_name)
            .field("aliases", &self.aliases)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl<'a> Command<'a> {
    /// # Panics
    ///
    /// Panics on a malformed declaration, see [`Command::parse`].
    pub fn new(value: &str) -> Command<'a> {
        match Command::parse(value) {
            Ok(it) => it,
            Err(err) => panic!("{err}"),
        }
    }

    /// Parses `"name"`, `"clone [repo]"`, `"copy [src] [dest?]"` or
    /// `"add [files...]"`.
    pub fn parse(value: &str) -> Result<Command<'a>> {
        let value = value.trim();
        let mut parts = value.split_whitespace();
        let word_name = match parts.next() {
            Some(it) => it,
            None => return Err(Error::Configuration(VALUE_REQUIRED.to_string())),
        };
        if word_name.starts_with('-') || word_name.starts_with('[') {
            return Err(Error::Configuration(format!("malformed command name `{word_name}`")));
        }

        let mut args: Vec<Argument> = Vec::new();
        for part in parts {
            let arg = Argument::parse(part)?;
            if args.iter().any(|it| it.is_variadic) {
                return Err(Error::Configuration(format!("variadic argument must be last in `{value}`")));
            }
            if args.iter().any(|it| it.name == arg.name) {
                return Err(Error::Configuration(format!("duplicate name `{}`", arg.name)));
            }
            args.push(arg);
        }

        Ok(Command {
            value: value.to_string(),
            word_name: word_name.to_string(),
            aliases: Vec::new(),
            args,
            flags: vec![Flag::help()],
            description: String::new(),
            action: None,
        })
    }

    pub fn description(mut self, text: &str) -> Command<'a> {
        self.set_description(text);
        self
    }

    /// # Panics
    ///
    /// Panics if `name` is empty or already names this command.
    pub fn alias(mut self, name: &str) -> Command<'a> {
        if let Err(err) = self.try_alias(name) {
            panic!("{err}")
        }
        self
    }

    /// # Panics
    ///
    /// Panics if `flag` reuses a name already declared on this command.
    pub fn add_option(mut self, flag: Flag) -> Command<'a> {
        if let Err(err) = self.try_add_option(flag) {
            panic!("{err}")
        }
        self
    }

    pub fn action<M>(mut self, f: impl IntoAction<'a, M>) -> Command<'a> {
        self.action = Some(f.into_action());
        self
    }

    pub(crate) fn set_description(&mut self, text: &str) {
        self.description = text.to_string();
    }

    pub fn try_alias(&mut self, name: &str) -> Result<()> {
        let name = name.trim().trim_start_matches('-');
        if name.is_empty() {
            return Err(Error::Configuration(VALUE_REQUIRED.to_string()));
        }
        if self.is_named(name) {
            return Err(Error::Configuration(format!("duplicate name `{name}`")));
        }
        self.aliases.push(name.to_string());
        Ok(())
    }

    pub fn try_add_option(&mut self, flag: Flag) -> Result<()> {
        if let Some(name) = self.flags.iter().find_map(|it| it.shares_name(&flag)) {
            return Err(Error::Configuration(format!("duplicate name `{name}`")));
        }
        self.flags.push(flag);
        Ok(())
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn word_name(&self) -> &str {
        &self.word_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn require_command_value(&self) -> bool {
        self.args.iter().any(|it| it.is_required)
    }

    /// Names the command answers to: the word name, then the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.word_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub(crate) fn is_named(&self, name: &str) -> bool {
        self.names().any(|it| it == name)
    }

    pub(crate) fn help_flag(&self) -> &Flag {
        &self.flags[HELP_SLOT]
    }

    /// Declared options, without the implicit help flag.
    pub(crate) fn user_flags(&self) -> &[Flag] {
        &self.flags[HELP_SLOT + 1..]
    }
}
