mod binding;
mod dispatch;
mod validation;

use argot::{Matches, Outcome, Program};
use expect_test::Expect;

fn parse(program: Program<'_>, args: &str) -> argot::Result<Outcome> {
    let args = args.split_ascii_whitespace().collect::<Vec<_>>();
    program.throw_errors(true).try_parse_from(args)
}

fn check(program: Program<'_>, args: &str, expect: Expect) {
    match parse(program, args) {
        Ok(Outcome::Complete(matches)) => expect.assert_eq(&render(&matches)),
        Ok(Outcome::Exit(code)) => expect.assert_eq(&format!("exit {code}")),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

fn render(matches: &Matches) -> String {
    matches.iter().map(|(name, value)| format!("{name} = {value:?}\n")).collect()
}

fn complete(program: Program<'_>, args: &str) -> Matches {
    match parse(program, args) {
        Ok(Outcome::Complete(matches)) => matches,
        other => panic!("expected a complete parse, got {other:?}"),
    }
}
