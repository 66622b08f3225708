use crate::{
    value::{Matches, Values},
    Error, Result,
};

/// A command callback together with its declared parameter shape.
///
/// Closures pick their shape through [`IntoAction`]:
///
/// - `|| ..` takes no parameters,
/// - `|args: &Values| ..` takes the command's bound arguments,
/// - `|args: &Values, matches: &Matches| ..` additionally gets everything
///   the parse bound.
///
/// [`Action::with_params`] accepts a shape known only at runtime; anything
/// above one parameter fails at dispatch with `TooManyParameters`.
pub struct Action<'a> {
    params: usize,
    f: Box<dyn FnMut(&Values, &Matches) + 'a>,
}

impl<'a> Action<'a> {
    pub fn with_params(params: usize, f: impl FnMut(&Values, &Matches) + 'a) -> Action<'a> {
        Action { params, f: Box::new(f) }
    }

    pub fn params(&self) -> usize {
        self.params
    }

    pub(crate) fn call(&mut self, command: &str, args: &Values, matches: &Matches) -> Result<()> {
        match self.params {
            0 | 1 => {
                (self.f)(args, matches);
                Ok(())
            }
            params => Err(Error::TooManyParameters { command: command.to_string(), params }),
        }
    }
}

pub trait IntoAction<'a, Shape> {
    fn into_action(self) -> Action<'a>;
}

pub struct NoArgs;
pub struct Args;
pub struct ArgsAndMatches;

impl<'a> IntoAction<'a, ()> for Action<'a> {
    fn into_action(self) -> Action<'a> {
        self
    }
}

impl<'a, F: FnMut() + 'a> IntoAction<'a, NoArgs> for F {
    fn into_action(mut self) -> Action<'a> {
        Action::with_params(0, move |_: &Values, _: &Matches| self())
    }
}

impl<'a, F: FnMut(&Values) + 'a> IntoAction<'a, Args> for F {
    fn into_action(mut self) -> Action<'a> {
        Action::with_params(1, move |args: &Values, _: &Matches| self(args))
    }
}

impl<'a, F: FnMut(&Values, &Matches) + 'a> IntoAction<'a, ArgsAndMatches> for F {
    fn into_action(self) -> Action<'a> {
        Action::with_params(1, self)
    }
}
