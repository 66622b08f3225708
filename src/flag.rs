use std::{fmt, rc::Rc};

use crate::{value::Value, Error, Result};

pub(crate) const VALUE_REQUIRED: &str = "command value required";

/// Short and long names parsed out of a flag declaration such as
/// `"-p --port"` or `"-h, --help"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSpec {
    pub letter: Option<String>,
    pub word: Option<String>,
}

impl FlagSpec {
    /// Splits on the first delimiter present, in priority order `,`, `|`,
    /// space. A name one character long after stripping dashes is the short
    /// flag, anything longer is the long flag.
    pub fn parse(flags: &str) -> Result<FlagSpec> {
        let flags = flags.trim();
        let tokens: Vec<&str> = if flags.contains(',') {
            flags.split(',').map(str::trim).filter(|it| !it.is_empty()).collect()
        } else if flags.contains('|') {
            flags.split('|').map(str::trim).filter(|it| !it.is_empty()).collect()
        } else {
            flags.split_whitespace().collect()
        };
        if tokens.len() > 2 {
            return Err(Error::Configuration(format!("too many names in `{flags}`")));
        }

        let mut res = FlagSpec::default();
        for token in tokens {
            let name = token.trim_start_matches('-');
            if name.is_empty() {
                return Err(Error::Configuration(VALUE_REQUIRED.to_string()));
            }
            if name.contains(char::is_whitespace) {
                return Err(Error::Configuration(format!("malformed flag `{token}`")));
            }
            let slot = if name.chars().count() == 1 { &mut res.letter } else { &mut res.word };
            if slot.is_some() {
                return Err(Error::Configuration(format!("duplicate name kind in `{flags}`")));
            }
            *slot = Some(name.to_string());
        }
        if res.letter.is_none() && res.word.is_none() {
            return Err(Error::Configuration(VALUE_REQUIRED.to_string()));
        }
        Ok(res)
    }
}

type Converter = Rc<dyn Fn(&str) -> Value>;

/// A declared option.
#[derive(Clone)]
pub struct Flag {
    flags: String,
    spec: FlagSpec,
    description: String,
    is_required: bool,
    converter: Option<Converter>,
    default_value: Option<Value>,
    choices: Option<Vec<Value>>,
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("flags", &self.flags)
            .field("spec", &self.spec)
            .field("is_required", &self.is_required)
            .field("default_value", &self.default_value)
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}

impl Flag {
    /// # Panics
    ///
    /// Panics if `flags` does not name at least one flag.
    pub fn new(flags: &str) -> Flag {
        match Flag::parse(flags) {
            Ok(it) => it,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn parse(flags: &str) -> Result<Flag> {
        let spec = FlagSpec::parse(flags)?;
        Ok(Flag {
            flags: flags.trim().to_string(),
            spec,
            description: String::new(),
            is_required: false,
            converter: None,
            default_value: None,
            choices: None,
        })
    }

    pub(crate) fn help() -> Flag {
        Flag::new("-h, --help").description("output usage information")
    }

    pub fn description(mut self, text: &str) -> Flag {
        self.description = text.to_string();
        self
    }

    pub fn required(mut self) -> Flag {
        self.is_required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Flag {
        self.default_value = Some(value.into());
        self
    }

    /// Applied once to the raw string when the value is bound, and to the
    /// default value when the flag is not given.
    pub fn converter(mut self, f: impl Fn(&str) -> Value + 'static) -> Flag {
        self.converter = Some(Rc::new(f));
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Flag
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn letter(&self) -> Option<&str> {
        self.spec.letter.as_deref()
    }

    pub fn word(&self) -> Option<&str> {
        self.spec.word.as_deref()
    }

    /// The long name, or the short one for short-only flags.
    pub fn name(&self) -> &str {
        self.word().or_else(|| self.letter()).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.word().into_iter().chain(self.letter())
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn get_default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn get_choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    /// Exact match against either name; `token` must already be
    /// dash-stripped.
    pub fn matches(&self, token: &str) -> bool {
        self.names().any(|it| it == token)
    }

    pub(crate) fn shares_name(&self, other: &Flag) -> Option<&str> {
        self.names().find(|it| other.matches(it))
    }

    /// Runs the converter over every scalar of `raw`; without one, the
    /// literals `true`/`false` become booleans.
    pub(crate) fn convert(&self, raw: &Value) -> Value {
        match &self.converter {
            Some(f) => raw.map_scalars(&mut |it| f(it)),
            None => raw.map_scalars(&mut Value::from_raw),
        }
    }

    /// Defaults are typed already; only an explicit converter touches them.
    pub(crate) fn convert_default(&self, default: &Value) -> Value {
        match &self.converter {
            Some(f) => default.map_scalars(&mut |it| f(it)),
            None => default.clone(),
        }
    }

    pub(crate) fn check_choice(&self, raw: &Value) -> Result<()> {
        let choices = match &self.choices {
            Some(it) => it,
            None => return Ok(()),
        };
        let scalars = match raw {
            Value::List(items) => items.iter().collect::<Vec<_>>(),
            it => vec![it],
        };
        for value in scalars {
            let value = value.to_string();
            if !choices.iter().any(|it| it.to_string() == value) {
                let allowed = choices.iter().map(|it| it.to_string()).collect::<Vec<_>>();
                return Err(Error::OptionChoiceInvalid {
                    flag: self.flags.clone(),
                    value,
                    allowed: allowed.join(", "),
                });
            }
        }
        Ok(())
    }
}
