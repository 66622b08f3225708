use std::cell::{Cell, RefCell};

use argot::{Action, Command, ErrorKind, Flag, Matches, Outcome, Program, Value, Values};
use expect_test::expect;

use crate::{check, parse};

#[test]
fn action_shapes() {
    let bare = Cell::new(0);
    let repo = RefCell::new(None);
    let port = RefCell::new(None);

    let program = Program::new("git")
        .command("status")
        .action(|| bare.set(bare.get() + 1))
        .command("clone [repo]")
        .action(|args: &Values| *repo.borrow_mut() = args.get_str("repo").map(String::from))
        .command("serve")
        .add_option(Flag::new("-p --port"))
        .action(|_: &Values, matches: &Matches| *port.borrow_mut() = matches.get_str("port").map(String::from));

    assert!(matches!(parse(program, "status clone x serve -p 80"), Ok(Outcome::Complete(_))));
    assert_eq!(bare.get(), 1);
    assert_eq!(repo.borrow().as_deref(), Some("x"));
    assert_eq!(port.borrow().as_deref(), Some("80"));
}

#[test]
fn actions_only_for_invoked_commands() {
    let ran = RefCell::new(Vec::new());
    let program = Program::new("app")
        .command("a")
        .action(|| ran.borrow_mut().push("a"))
        .command("b")
        .action(|| ran.borrow_mut().push("b"));
    parse(program, "b").unwrap();
    assert_eq!(*ran.borrow(), ["b"]);
}

#[test]
fn too_many_parameters() {
    let program = Program::new("app").command("serve").action(Action::with_params(3, |_, _| ()));
    check(program, "serve", expect!["too many parameters: `serve` takes 3"]);
}

#[test]
fn prebuilt_commands() {
    let seen = RefCell::new(Vec::new());
    let deploy = Command::new("deploy [env]")
        .description("ship it")
        .alias("d")
        .add_option(Flag::new("--dry-run"))
        .action(|args: &Values| seen.borrow_mut().push(args.get_str("env").unwrap_or_default().to_string()));
    let program = Program::new("app").add_command(deploy);
    parse(program, "d prod --dry-run").unwrap();
    assert_eq!(*seen.borrow(), ["prod"]);
}

#[test]
fn command_listener_keeps_going() {
    let heard = Cell::new(false);
    let acted = Cell::new(false);
    let program = Program::new("app").command("serve").action(|| acted.set(true)).on("serve", |value: &Value| {
        assert_eq!(value, &Value::Bool(true));
        heard.set(true);
    });
    assert!(matches!(parse(program, "serve"), Ok(Outcome::Complete(_))));
    assert!(heard.get());
    assert!(acted.get());
}

#[test]
fn option_listener_short_circuits() {
    let heard = RefCell::new(None);
    let acted = Cell::new(false);
    let program = Program::new("app")
        .add_option(Flag::new("-l --level").converter(|it| Value::Num(it.parse().unwrap_or(0.0))))
        .command("serve")
        .action(|| acted.set(true))
        .on("--level", |value: &Value| *heard.borrow_mut() = Some(value.clone()));
    assert_eq!(parse(program, "serve --level 3"), Ok(Outcome::Exit(0)));
    assert_eq!(*heard.borrow(), Some(Value::Num(3.0)));
    assert!(!acted.get());
}

#[test]
fn listener_on_help_runs_before_help() {
    let heard = Cell::new(false);
    let program = Program::new("app").on("help", |_| heard.set(true));
    assert_eq!(parse(program, "--help"), Ok(Outcome::Exit(0)));
    assert!(heard.get());
}

fn versioned(acted: &Cell<bool>) -> Program<'_> {
    Program::new("app")
        .set_version("1.2.3", "-v, --version", "print the version")
        .command("serve")
        .action(move || acted.set(true))
}

#[test]
fn help_and_version_stop_before_actions() {
    let acted = Cell::new(false);
    check(versioned(&acted), "--version", expect!["exit 0"]);
    check(versioned(&acted), "serve -v", expect!["exit 0"]);
    check(versioned(&acted), "serve --help", expect!["exit 0"]);
    check(versioned(&acted), "--help", expect!["exit 0"]);
    assert!(!acted.get());
}

#[test]
fn command_flag_shadows_version_letter() {
    let verbose = || Program::new("app").command("serve").add_option(Flag::new("-V --verbose"));
    check(
        verbose(),
        "serve -V",
        expect![[r#"
            V = Bool(true)
            serve = Bool(true)
            verbose = Bool(true)
            serve.V = Bool(true)
            serve.verbose = Bool(true)
        "#]],
    );
    check(verbose(), "serve --version", expect!["exit 0"]);
    check(verbose(), "-V", expect!["exit 0"]);

    let vendor = Program::new("app").command("serve").add_option(Flag::new("-V --vendor"));
    check(
        vendor,
        "serve -V acme",
        expect![[r#"
            V = Str("acme")
            serve = Bool(true)
            vendor = Str("acme")
            serve.V = Str("acme")
            serve.vendor = Str("acme")
        "#]],
    );
}

#[test]
fn shadowed_letter_does_not_skip_required_options() {
    let program = Program::new("app")
        .command("serve")
        .add_option(Flag::new("-V --verbose"))
        .add_option(Flag::new("-p --port").required());
    check(program, "serve -V", expect!["required option not found: `-p --port`"]);
}

#[test]
fn custom_help_flag() {
    let program = || Program::new("app").set_help("-?, --usage", "show usage").option("-h --host", "bind address");
    check(program(), "--usage", expect!["exit 0"]);
    check(
        program(),
        "-h 0.0.0.0",
        expect![[r#"
            h = Str("0.0.0.0")
            host = Str("0.0.0.0")
        "#]],
    );
}

#[test]
fn declaration_errors() {
    let mut program = Program::new("git").command("clone [repo]");
    let err = program.try_add_command(Command::new("clone")).unwrap_err();
    assert_eq!(err.to_string(), "duplicate name `clone`");
    let err = program.try_alias("clone").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(program.try_alias("cl").is_ok());

    let err = Command::parse("").unwrap_err();
    assert_eq!(err.to_string(), "command value required");
    let err = Flag::parse("--").unwrap_err();
    assert_eq!(err.to_string(), "command value required");

    let mut program = Program::new("app");
    let err = program.try_add_option(Flag::new("-h --host")).unwrap_err();
    assert_eq!(err.to_string(), "duplicate name `h`");
    let err = program.try_alias("x").unwrap_err();
    assert_eq!(err.to_string(), "alias requires a command");
}

#[test]
#[should_panic(expected = "command value required")]
fn empty_command_panics() {
    let _ = Program::new("app").command(" ");
}

#[test]
#[should_panic(expected = "action requires a command")]
fn action_without_command_panics() {
    let _ = Program::new("app").option("-v --verbose", "").action(|| ());
}

#[test]
#[should_panic(expected = "duplicate name `c`")]
fn colliding_alias_panics() {
    let _ = Program::new("git").command("c").command("clone").alias("c");
}
