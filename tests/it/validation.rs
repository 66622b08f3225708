use argot::{ErrorKind, Flag, Program, Rule};
use expect_test::expect;

use crate::{check, parse};

fn upper() -> Program<'static> {
    Program::new("app")
        .command("upper")
        .add_option(Flag::new("-m --message").required().converter(|it| it.to_uppercase().into()))
}

#[test]
fn unknown_option() {
    let program = Program::new("app").command("serve").add_option(Flag::new("-p --port"));
    check(program, "serve -a 127.0.0.1", expect!["option not found: `a`"]);
}

#[test]
fn options_of_other_commands_are_unknown() {
    let program = Program::new("app").command("serve").add_option(Flag::new("-p --port")).command("build");
    check(program, "build --port 80", expect!["option not found: `port`"]);
}

#[test]
fn unknown_command() {
    let program = Program::new("git").command("clone [repo]");
    check(program, "push origin", expect!["command not found: `push`"]);
}

#[test]
fn required_option() {
    check(upper(), "upper", expect!["required option not found: `-m --message`"]);
    check(upper(), "upper -m hi --help", expect!["exit 0"]);
    check(upper(), "upper --help", expect!["exit 0"]);
}

#[test]
fn required_program_option() {
    let program = || Program::new("app").required_option("-c, --config", "config file");
    check(program(), "", expect!["required option not found: `-c, --config`"]);
    check(program(), "-V", expect!["exit 0"]);
}

#[test]
fn required_value() {
    let program = || Program::new("git").command("clone [repo]");
    check(program(), "clone", expect!["required value not found: `repo`"]);
    check(program(), "clone -h", expect!["exit 0"]);

    let program = Program::new("git").command("add [files...]");
    check(program, "add", expect!["required value not found: `files`"]);
}

#[test]
fn option_choices() {
    let program = || Program::new("app").add_option(Flag::new("--color").choices(["red", "green"]));
    check(
        program(),
        "--color green",
        expect![[r#"
            color = Str("green")
        "#]],
    );
    check(
        program(),
        "--color blue",
        expect!["invalid option choice: `blue` for `--color`, expected one of: red, green"],
    );
}

#[test]
fn numeric_choices_compare_by_text() {
    let program = || Program::new("app").add_option(Flag::new("-l --level").choices([1, 2]));
    assert!(parse(program(), "-l 2").is_ok());
    let err = parse(program(), "-l 3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OptionChoiceInvalid);
    assert_eq!(err.detail(), "3 for -l --level, expected one of: 1, 2");
}

#[test]
fn listeners_need_a_target() {
    let program = Program::new("app").command("serve").on("deploy", |_| ());
    check(program, "serve", expect!["command not found: `deploy`"]);

    let program = Program::new("app").option("-d --debug", "").on("--debug", |_| ()).on("serve", |_| ());
    check(program, "-d", expect!["command not found: `serve`"]);
}

#[test]
fn first_failing_rule_wins() {
    let program = || upper().command("serve");
    let args = "upper bogus";
    check(program(), args, expect!["command not found: `bogus`"]);

    let program = program().rules(&[Rule::RequiredOptions, Rule::NonDeclaredArgs]);
    check(program, args, expect!["required option not found: `-m --message`"]);
}

#[test]
fn rules_can_be_skipped() {
    let program = Program::new("app").rules(&[Rule::RequiredOptions]);
    check(
        program,
        "--anything goes",
        expect![[r#"
            anything = Str("goes")
        "#]],
    );
}

#[test]
fn rule_identifiers() {
    assert_eq!("option_choices".parse::<Rule>(), Ok(Rule::OptionChoices));
    let err = "choices".parse::<Rule>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRule);
}
