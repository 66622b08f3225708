use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    command::Command,
    flag::Flag,
    resolve::{command_index, Given, Invocation, Owner},
    Error, Result,
};

/// A named validation rule. Rules run in the order given and the first
/// failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Every `.on()` target names a declared command or program-level
    /// option.
    OnCommands,
    /// Every positional token is a declared command (or consumed as an
    /// argument value), every option key a reachable flag.
    NonDeclaredArgs,
    /// Invoked commands received their required arguments.
    RequiredValues,
    /// Required flags were given, unless help or version was asked for.
    RequiredOptions,
    /// Values of flags with a choice set are members of it.
    OptionChoices,
}

impl Rule {
    pub const DEFAULT: [Rule; 5] =
        [Rule::OnCommands, Rule::NonDeclaredArgs, Rule::RequiredValues, Rule::RequiredOptions, Rule::OptionChoices];

    pub fn name(self) -> &'static str {
        match self {
            Rule::OnCommands => "on_commands",
            Rule::NonDeclaredArgs => "non_declared_args",
            Rule::RequiredValues => "required_values",
            Rule::RequiredOptions => "required_options",
            Rule::OptionChoices => "option_choices",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Rule> {
        Rule::DEFAULT.into_iter().find(|it| it.name() == s).ok_or_else(|| Error::InvalidRule(s.to_string()))
    }
}

/// Everything a rule looks at.
pub(crate) struct Context<'p, 'a> {
    pub(crate) commands: &'p [Command<'a>],
    pub(crate) base: &'p [Flag],
    pub(crate) listeners: Vec<&'p str>,
    pub(crate) given: &'p Given,
    pub(crate) invocation: &'p Invocation,
    /// Help or version was requested.
    pub(crate) bypass: bool,
}

pub(crate) fn validate(rules: &[Rule], cx: &Context<'_, '_>) -> Result<()> {
    for &rule in rules {
        debug!(%rule, "validating");
        let res = match rule {
            Rule::OnCommands => on_commands(cx),
            Rule::NonDeclaredArgs => non_declared_args(cx),
            Rule::RequiredValues => required_values(cx),
            Rule::RequiredOptions => required_options(cx),
            Rule::OptionChoices => option_choices(cx),
        };
        if let Err(err) = res {
            debug!(%rule, %err, "validation failed");
            return Err(err);
        }
    }
    Ok(())
}

fn on_commands(cx: &Context<'_, '_>) -> Result<()> {
    for &arg in &cx.listeners {
        let name = arg.trim_start_matches('-');
        let declared = command_index(cx.commands, arg).is_some() || cx.base.iter().any(|it| it.matches(name));
        if !declared {
            return Err(Error::CommandNotFound(arg.to_string()));
        }
    }
    Ok(())
}

fn non_declared_args(cx: &Context<'_, '_>) -> Result<()> {
    if let Some(token) = cx.invocation.unknown.first() {
        return Err(Error::CommandNotFound(token.clone()));
    }
    match cx.given.unowned.first() {
        Some((key, _)) => Err(Error::OptionNotFound(key.clone())),
        None => Ok(()),
    }
}

fn required_values(cx: &Context<'_, '_>) -> Result<()> {
    if cx.bypass {
        return Ok(());
    }
    for invoked in &cx.invocation.invoked {
        if let Some(arg) = invoked.missing(&cx.commands[invoked.command]) {
            return Err(Error::RequiredValueNotFound(arg.name.clone()));
        }
    }
    Ok(())
}

fn required_options(cx: &Context<'_, '_>) -> Result<()> {
    if cx.bypass {
        return Ok(());
    }
    let base = cx.base.iter().enumerate().map(|(flag, it)| (Owner::Base(flag), it));
    let commands = cx.commands;
    let invoked = cx.invocation.invoked.iter().flat_map(move |invoked| {
        let command = invoked.command;
        commands[command].flags().iter().enumerate().map(move |(flag, it)| (Owner::Command { command, flag }, it))
    });
    for (owner, flag) in base.chain(invoked) {
        if flag.is_required() && !cx.given.contains(owner) {
            return Err(Error::RequiredOptionNotFound(flag.flags().to_string()));
        }
    }
    Ok(())
}

fn option_choices(cx: &Context<'_, '_>) -> Result<()> {
    for (owner, raw) in &cx.given.owned {
        let flag = match *owner {
            Owner::Command { command, flag } => &cx.commands[command].flags()[flag],
            Owner::Base(flag) => &cx.base[flag],
        };
        flag.check_choice(raw)?;
    }
    Ok(())
}
