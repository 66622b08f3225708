use std::fmt::Write;

use crate::{command::Command, flag::Flag, program::Program};

macro_rules! w {
    ($($tt:tt)*) => {
        {
            let _ = write!($($tt)*);
        }
    };
}

pub(crate) fn render_version(program: &Program<'_>) -> String {
    match &program.version {
        Some(version) => format!("{} {}", program.name, version),
        None => program.name.clone(),
    }
}

pub(crate) fn render_program(program: &Program<'_>) -> String {
    let mut buf = String::new();
    w!(buf, "{}\n", render_version(program));
    if !program.description.is_empty() {
        w!(buf, "  {}\n", program.description);
    }

    blank_line(&mut buf);
    w!(buf, "USAGE:\n    {} [OPTIONS]", program.name);
    if !program.commands.is_empty() {
        w!(buf, " <COMMAND>");
    }
    w!(buf, "\n");

    flags_section(&mut buf, &program.base);

    if !program.commands.is_empty() {
        blank_line(&mut buf);
        w!(buf, "COMMANDS:\n");
        let mut blank = "";
        for cmd in &program.commands {
            w!(buf, "{}", blank);
            blank = "\n";

            w!(buf, "    {}", cmd.value());
            if !cmd.aliases().is_empty() {
                w!(buf, " (aliases: {})", cmd.aliases().join(", "));
            }
            w!(buf, "\n");
            if !cmd.get_description().is_empty() {
                w!(buf, "      {}\n", cmd.get_description());
            }
        }
    }
    buf
}

pub(crate) fn render_command(program: &Program<'_>, cmd: &Command<'_>) -> String {
    let mut buf = String::new();
    w!(buf, "{} {}\n", program.name, cmd.word_name());
    if !cmd.get_description().is_empty() {
        w!(buf, "  {}\n", cmd.get_description());
    }
    if !cmd.aliases().is_empty() {
        w!(buf, "  aliases: {}\n", cmd.aliases().join(", "));
    }

    if !cmd.args().is_empty() {
        blank_line(&mut buf);
        w!(buf, "ARGS:\n");
        let mut blank = "";
        for arg in cmd.args() {
            w!(buf, "{}", blank);
            blank = "\n";

            let (l, r) = match (arg.is_required, arg.is_variadic) {
                (false, false) => ("[", "]"),
                (true, false) => ("<", ">"),
                (false, true) => ("[", "]..."),
                (true, true) => ("<", ">..."),
            };
            w!(buf, "    {}{}{}\n", l, arg.name, r);
            if !arg.description.is_empty() {
                w!(buf, "      {}\n", arg.description);
            }
        }
    }

    flags_section(&mut buf, cmd.flags());
    buf
}

fn flags_section(buf: &mut String, flags: &[Flag]) {
    if flags.is_empty() {
        return;
    }
    blank_line(buf);
    w!(buf, "OPTIONS:\n");

    let mut blank = "";
    for flag in flags {
        w!(buf, "{}", blank);
        blank = "\n";

        match (flag.letter(), flag.word()) {
            (Some(short), Some(long)) => w!(buf, "    -{}, --{}", short, long),
            (Some(short), None) => w!(buf, "    -{}", short),
            (None, Some(long)) => w!(buf, "    --{}", long),
            (None, None) => (),
        }
        if flag.is_required() {
            w!(buf, " (required)");
        }
        w!(buf, "\n");

        let mut doc = flag.get_description().to_string();
        if let Some(choices) = flag.get_choices() {
            let choices = choices.iter().map(|it| it.to_string()).collect::<Vec<_>>();
            w!(doc, " [choices: {}]", choices.join(", "));
        }
        if let Some(default) = flag.get_default() {
            w!(doc, " [default: {}]", default);
        }
        let doc = doc.trim();
        if !doc.is_empty() {
            w!(buf, "      {}\n", doc);
        }
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
