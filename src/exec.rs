//! Binding and dispatch, run after validation passed.
//!
//! Order matters and is observable:
//!
//! 1. a command's own help flag prints that command's help and stops,
//! 2. invoked commands and their arguments are bound,
//! 3. given option values are converted and bound,
//! 4. defaults fill the options that were not given,
//! 5. `.on()` listeners fire; a listener on an option stops the parse,
//! 6. program-level version and help stop the parse,
//! 7. command actions fire in invocation order.
use tracing::debug;

use crate::{
    flag::Flag,
    help,
    program::Program,
    resolve::{command_index, Builtin, Given, Invocation, Owner},
    value::{Matches, Value, Values},
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit(i32),
}

fn bind_flag(matches: &mut Matches, scope: Option<&str>, flag: &Flag, value: Value) {
    for name in flag.names() {
        matches.bind(scope, name, value.clone());
    }
}

impl<'a> Program<'a> {
    pub(crate) fn execute(&mut self, given: &Given, invocation: &Invocation, matches: &mut Matches) -> Result<Flow> {
        let command_help = given.builtins().find_map(|it| match it {
            Builtin::CommandHelp(command) => Some(command),
            _ => None,
        });
        if let Some(command) = command_help {
            let command = &self.commands[command];
            debug!(command = command.word_name(), "command help requested");
            println!("{}", help::render_command(self, command));
            return Ok(Flow::Exit(0));
        }

        let args = self.bind_commands(invocation, matches);
        let bound = self.bind_options(given, matches);
        self.fill_defaults(given, invocation, matches);

        if let Flow::Exit(code) = self.fire_listeners(&bound, invocation) {
            return Ok(Flow::Exit(code));
        }

        if given.builtins().any(|it| it == Builtin::Version) {
            println!("{}", self.version_text());
            return Ok(Flow::Exit(0));
        }
        if given.builtins().any(|it| it == Builtin::Help) {
            let text = match invocation.invoked.first() {
                Some(invoked) => help::render_command(self, &self.commands[invoked.command]),
                None => self.help_text(),
            };
            println!("{text}");
            return Ok(Flow::Exit(0));
        }

        for (invoked, args) in invocation.invoked.iter().zip(&args) {
            let command = &mut self.commands[invoked.command];
            let name = command.word_name().to_string();
            if let Some(action) = &mut command.action {
                debug!(command = %name, params = action.params(), "running action");
                action.call(&name, args, matches)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// The flag `owner` points at, with the scope its values bind in.
    fn owned_flag(&self, owner: Owner) -> (Option<&str>, &Flag) {
        match owner {
            Owner::Command { command, flag } => {
                let command = &self.commands[command];
                (Some(command.word_name()), &command.flags()[flag])
            }
            Owner::Base(flag) => (None, &self.base[flag]),
        }
    }

    /// Returns the argument values of each invoked command, in invocation
    /// order.
    fn bind_commands(&self, invocation: &Invocation, matches: &mut Matches) -> Vec<Values> {
        let mut res = Vec::new();
        for invoked in &invocation.invoked {
            let command = &self.commands[invoked.command];
            let scope = command.word_name();
            matches.bind(None, scope, Value::Bool(true));
            let mut args = Values::new();
            for (name, value) in invoked.bindings(command) {
                debug!(command = scope, arg = name, %value, "binding argument");
                matches.bind(Some(scope), name, value.clone());
                args.insert(name, value);
            }
            res.push(args);
        }
        res
    }

    /// Converts and binds every given flag once, all spellings merged.
    /// Returns the bound values.
    fn bind_options(&self, given: &Given, matches: &mut Matches) -> Vec<(Owner, Value)> {
        for (key, raw) in &given.unowned {
            matches.bind(None, key, raw.map_scalars(&mut Value::from_raw));
        }
        let mut res = Vec::new();
        for &(owner, ref raw) in &given.owned {
            let (scope, flag) = self.owned_flag(owner);
            let value = flag.convert(raw);
            debug!(flag = flag.flags(), %value, "binding option");
            bind_flag(matches, scope, flag, value.clone());
            res.push((owner, value));
        }
        res
    }

    /// Only program-level flags and flags of invoked commands get defaults.
    fn fill_defaults(&self, given: &Given, invocation: &Invocation, matches: &mut Matches) {
        let base = (0..self.base.len()).map(Owner::Base);
        let invoked = invocation.invoked.iter().flat_map(|it| {
            let command = it.command;
            (0..self.commands[command].flags().len()).map(move |flag| Owner::Command { command, flag })
        });
        for owner in base.chain(invoked) {
            if given.contains(owner) {
                continue;
            }
            let (scope, flag) = self.owned_flag(owner);
            let default = match flag.get_default() {
                Some(it) => it,
                None => continue,
            };
            let value = flag.convert_default(default);
            debug!(flag = flag.flags(), %value, "binding default");
            bind_flag(matches, scope, flag, value);
        }
    }

    fn fire_listeners(&mut self, bound: &[(Owner, Value)], invocation: &Invocation) -> Flow {
        let Program { commands, base, listeners, .. } = self;
        for listener in listeners.iter_mut() {
            if let Some(command) = command_index(commands, &listener.arg) {
                if invocation.contains(command) {
                    debug!(arg = %listener.arg, "firing command listener");
                    (listener.f)(&Value::Bool(true));
                }
                continue;
            }
            let name = listener.arg.trim_start_matches('-');
            let value = match base.iter().position(|it| it.matches(name)) {
                Some(flag) => bound.iter().find(|(owner, _)| *owner == Owner::Base(flag)).map(|(_, it)| it),
                None => None,
            };
            if let Some(value) = value {
                debug!(arg = %listener.arg, "firing option listener");
                (listener.f)(value);
                return Flow::Exit(0);
            }
        }
        Flow::Continue
    }
}
