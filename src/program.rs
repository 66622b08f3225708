use std::fmt;

use tracing::debug;

use crate::{
    action::IntoAction,
    command::Command,
    exec::Flow,
    flag::Flag,
    help,
    resolve::{find_command, Given, Invocation},
    rt,
    validate::{self, Context, Rule},
    value::{Matches, Value},
    Error, Result,
};

pub(crate) const HELP: usize = 0;
pub(crate) const VERSION: usize = 1;

/// How a parse that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every stage ran; these are the bound values.
    Complete(Matches),
    /// Help, version or an option listener asked to stop with this status.
    Exit(i32),
}

pub(crate) struct Listener<'a> {
    pub(crate) arg: String,
    pub(crate) f: Box<dyn FnMut(&Value) + 'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    Command(usize),
    Option(usize),
}

/// The declared command surface plus the settings of one parse.
///
/// Builder methods apply to the most recently declared command or option.
/// A program is consumed by parsing, so each instance parses exactly once.
pub struct Program<'a> {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) version: Option<String>,
    /// Slots `HELP` and `VERSION` hold the built-in flags, user options
    /// follow.
    pub(crate) base: Vec<Flag>,
    pub(crate) commands: Vec<Command<'a>>,
    pub(crate) listeners: Vec<Listener<'a>>,
    rules: Vec<Rule>,
    throw_errors: bool,
    last: Last,
}

impl fmt::Debug for Program<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("base", &self.base)
            .field("commands", &self.commands)
            .field("rules", &self.rules)
            .field("throw_errors", &self.throw_errors)
            .finish_non_exhaustive()
    }
}

macro_rules! or_panic {
    ($e:expr) => {
        if let Err(err) = $e {
            panic!("{err}")
        }
    };
}

impl<'a> Program<'a> {
    pub fn new(name: &str) -> Program<'a> {
        Program {
            name: name.to_string(),
            description: String::new(),
            version: None,
            base: vec![Flag::help(), Flag::new("-V, --version").description("output the version number")],
            commands: Vec::new(),
            listeners: Vec::new(),
            rules: Rule::DEFAULT.to_vec(),
            throw_errors: false,
            last: Last::Nothing,
        }
    }

    /// Makes `parse` return validation errors instead of printing them and
    /// exiting with status 1.
    pub fn throw_errors(mut self, yes: bool) -> Program<'a> {
        self.throw_errors = yes;
        self
    }

    pub fn rules(mut self, rules: &[Rule]) -> Program<'a> {
        self.rules = rules.to_vec();
        self
    }

    /// Describes the most recent declaration, or the program itself before
    /// anything is declared.
    pub fn description(mut self, text: &str) -> Program<'a> {
        match self.last {
            Last::Nothing => self.description = text.to_string(),
            Last::Command(idx) => self.commands[idx].set_description(text),
            Last::Option(idx) => {
                let flag = self.base[idx].clone();
                self.base[idx] = flag.description(text);
            }
        }
        self
    }

    /// # Panics
    ///
    /// Panics if `flags` is malformed or reuses a program-level name.
    pub fn option(self, flags: &str, description: &str) -> Program<'a> {
        self.add_option(Flag::new(flags).description(description))
    }

    /// Like [`Program::option`], but validation fails when the flag is
    /// missing.
    pub fn required_option(self, flags: &str, description: &str) -> Program<'a> {
        self.add_option(Flag::new(flags).description(description).required())
    }

    /// Adds `flag` to the most recent command, or to the program-level
    /// options when no command is declared yet.
    ///
    /// # Panics
    ///
    /// Panics if the flag reuses a name of its target.
    pub fn add_option(mut self, flag: Flag) -> Program<'a> {
        or_panic!(self.try_add_option(flag));
        self
    }

    pub fn try_add_option(&mut self, flag: Flag) -> Result<()> {
        match self.last {
            Last::Command(idx) => self.commands[idx].try_add_option(flag),
            Last::Nothing | Last::Option(_) => {
                self.check_base(&flag, None)?;
                self.base.push(flag);
                self.last = Last::Option(self.base.len() - 1);
                Ok(())
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `value` is malformed or its name is taken.
    pub fn command(mut self, value: &str) -> Program<'a> {
        or_panic!(Command::parse(value).and_then(|cmd| self.try_add_command(cmd)));
        self
    }

    pub fn add_command(mut self, command: Command<'a>) -> Program<'a> {
        or_panic!(self.try_add_command(command));
        self
    }

    pub fn try_add_command(&mut self, command: Command<'a>) -> Result<()> {
        if let Some(name) = command.names().find(|it| self.commands.iter().any(|cmd| cmd.is_named(it))) {
            return Err(Error::Configuration(format!("duplicate name `{name}`")));
        }
        self.commands.push(command);
        self.last = Last::Command(self.commands.len() - 1);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if no command is declared yet or `name` is taken.
    pub fn alias(mut self, name: &str) -> Program<'a> {
        or_panic!(self.try_alias(name));
        self
    }

    pub fn try_alias(&mut self, name: &str) -> Result<()> {
        let idx = self.last_command("alias")?;
        let bare = name.trim().trim_start_matches('-');
        if self.commands.iter().any(|it| it.is_named(bare)) {
            return Err(Error::Configuration(format!("duplicate name `{bare}`")));
        }
        self.commands[idx].try_alias(name)
    }

    /// # Panics
    ///
    /// Panics if no command is declared yet.
    pub fn action<M>(mut self, f: impl IntoAction<'a, M>) -> Program<'a> {
        match self.last_command("action") {
            Ok(idx) => self.commands[idx].action = Some(f.into_action()),
            Err(err) => panic!("{err}"),
        }
        self
    }

    /// Calls `f` when `arg` (a command name or program-level flag) shows up
    /// in the invocation. For a flag, `f` gets the bound value and the parse
    /// stops with status 0 right after.
    pub fn on(mut self, arg: &str, f: impl FnMut(&Value) + 'a) -> Program<'a> {
        self.listeners.push(Listener { arg: arg.to_string(), f: Box::new(f) });
        self
    }

    /// Replaces the built-in help flag.
    pub fn set_help(mut self, flags: &str, description: &str) -> Program<'a> {
        let flag = Flag::new(flags).description(description);
        or_panic!(self.check_base(&flag, Some(HELP)));
        self.base[HELP] = flag;
        self
    }

    /// Sets the version string and replaces the built-in version flag.
    pub fn set_version(mut self, version: &str, flags: &str, description: &str) -> Program<'a> {
        let flag = Flag::new(flags).description(description);
        or_panic!(self.check_base(&flag, Some(VERSION)));
        self.base[VERSION] = flag;
        self.version = Some(version.to_string());
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_commands(&self) -> &[Command<'a>] {
        &self.commands
    }

    /// Program-level flags, help and version first.
    pub fn get_options(&self) -> &[Flag] {
        &self.base
    }

    pub fn help_text(&self) -> String {
        help::render_program(self)
    }

    pub fn version_text(&self) -> String {
        help::render_version(self)
    }

    /// Help text of the command named (or aliased) `name`.
    pub fn command_help(&self, name: &str) -> Option<String> {
        find_command(&self.commands, name).map(|cmd| help::render_command(self, cmd))
    }

    pub(crate) fn help_flag(&self) -> &Flag {
        &self.base[HELP]
    }

    pub(crate) fn version_flag(&self) -> &Flag {
        &self.base[VERSION]
    }

    /// Names of the built-in flags that never take a value. A name some
    /// declared option also answers to is left out, so that option can
    /// still take one.
    fn switches(&self) -> Vec<&str> {
        let declared = self.base[VERSION + 1..]
            .iter()
            .chain(self.commands.iter().flat_map(|it| it.user_flags()))
            .collect::<Vec<_>>();
        let builtin = [self.help_flag(), self.version_flag()]
            .into_iter()
            .chain(self.commands.iter().map(|it| it.help_flag()));
        builtin.flat_map(|it| it.names()).filter(|name| !declared.iter().any(|it| it.matches(name))).collect()
    }

    fn last_command(&self, what: &str) -> Result<usize> {
        match self.last {
            Last::Command(idx) => Ok(idx),
            _ => Err(Error::Configuration(format!("{what} requires a command"))),
        }
    }

    fn check_base(&self, flag: &Flag, skip: Option<usize>) -> Result<()> {
        for (idx, other) in self.base.iter().enumerate() {
            if Some(idx) == skip {
                continue;
            }
            if let Some(name) = flag.shares_name(other) {
                return Err(Error::Configuration(format!("duplicate name `{name}`")));
            }
        }
        Ok(())
    }

    /// Runs the pipeline without touching the process: help, version and
    /// option listeners report [`Outcome::Exit`], failures come back as
    /// errors regardless of `throw_errors`.
    pub fn try_parse_from<I, T>(mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        debug!(program = %self.name, ?args, "parsing");

        let mut parser = rt::Parser::new(args);
        for name in self.switches() {
            parser = parser.switch(name);
        }
        let tokens = parser.tokenize();
        let invocation = Invocation::resolve(&self.commands, &tokens.commands);
        let given = Given::group(&self.commands, &invocation, &self.base, &tokens);
        {
            let cx = Context {
                commands: &self.commands,
                base: &self.base,
                listeners: self.listeners.iter().map(|it| it.arg.as_str()).collect(),
                given: &given,
                invocation: &invocation,
                bypass: given.builtins().next().is_some(),
            };
            validate::validate(&self.rules, &cx)?;
        }

        let mut matches = Matches::default();
        let res = match self.execute(&given, &invocation, &mut matches)? {
            Flow::Continue => Outcome::Complete(matches),
            Flow::Exit(code) => Outcome::Exit(code),
        };
        Ok(res)
    }

    /// Parses `args`, printing help or version and exiting where asked to.
    /// Failures are printed and exit with status 1, unless `throw_errors`
    /// is set.
    pub fn parse_from<I, T>(self, args: I) -> Result<Matches>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let name = self.name.clone();
        let throw_errors = self.throw_errors;
        match self.try_parse_from(args) {
            Ok(Outcome::Complete(matches)) => Ok(matches),
            Ok(Outcome::Exit(code)) => std::process::exit(code),
            Err(err) if throw_errors => Err(err),
            Err(err) => err.exit(&name),
        }
    }

    /// [`Program::parse_from`] over the process arguments.
    pub fn parse(self) -> Result<Matches> {
        let args = std::env::args_os().skip(1).map(|it| it.to_string_lossy().into_owned());
        self.parse_from(args)
    }
}
