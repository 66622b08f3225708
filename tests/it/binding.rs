use argot::{Flag, Program, Value};
use expect_test::expect;

use crate::{check, complete};

fn serve() -> Program<'static> {
    Program::new("app").command("serve").add_option(Flag::new("-p --port"))
}

#[test]
fn option_binds_under_every_name() {
    check(
        serve(),
        "serve --port=8080",
        expect![[r#"
            p = Str("8080")
            port = Str("8080")
            serve = Bool(true)
            serve.p = Str("8080")
            serve.port = Str("8080")
        "#]],
    );
    check(
        serve(),
        "serve -p 8080",
        expect![[r#"
            p = Str("8080")
            port = Str("8080")
            serve = Bool(true)
            serve.p = Str("8080")
            serve.port = Str("8080")
        "#]],
    );
}

#[test]
fn converter_applies_once() {
    let program = Program::new("app")
        .command("upper")
        .add_option(Flag::new("-m --message").required().converter(|it| it.to_uppercase().into()));
    check(
        program,
        "upper --message=test",
        expect![[r#"
            m = Str("TEST")
            message = Str("TEST")
            upper = Bool(true)
            upper.m = Str("TEST")
            upper.message = Str("TEST")
        "#]],
    );
}

#[test]
fn zero_like_argument_is_verbatim() {
    check(
        Program::new("app").command("foo [bar]"),
        "foo 0",
        expect![[r#"
            bar = Str("0")
            foo = Bool(true)
            foo.bar = Str("0")
        "#]],
    );
}

#[test]
fn boolean_literals() {
    let program = Program::new("app").option("--dry-run", "").option("--name", "");
    check(
        program,
        "--dry-run=false --name true",
        expect![[r#"
            dry-run = Bool(false)
            name = Bool(true)
        "#]],
    );
}

#[test]
fn defaults_lose_to_explicit_values() {
    let program = || Program::new("app").add_option(Flag::new("-l --level").default_value(1));
    let matches = complete(program(), "");
    assert_eq!(matches.get("level"), Some(&Value::Num(1.0)));
    assert_eq!(matches.get("l"), Some(&Value::Num(1.0)));

    let matches = complete(program(), "--level 2");
    assert_eq!(matches.get_str("level"), Some("2"));
    let matches = complete(program(), "-l 2");
    assert_eq!(matches.get_str("level"), Some("2"));
}

#[test]
fn defaults_go_through_the_converter() {
    let program = Program::new("app").add_option(
        Flag::new("-j --jobs")
            .default_value(4)
            .converter(|it| it.parse::<f64>().map(Value::Num).unwrap_or_else(|_| Value::from(it))),
    );
    let matches = complete(program, "");
    assert_eq!(matches.get_f64("jobs"), Some(4.0));
}

#[test]
fn defaults_only_for_invoked_commands() {
    let program = || {
        Program::new("app")
            .command("serve")
            .add_option(Flag::new("-p --port").default_value(80))
            .command("build")
            .add_option(Flag::new("--target").default_value("debug"))
    };
    check(
        program(),
        "serve",
        expect![[r#"
            p = Num(80.0)
            port = Num(80.0)
            serve = Bool(true)
            serve.p = Num(80.0)
            serve.port = Num(80.0)
        "#]],
    );
    check(
        program(),
        "build --target release",
        expect![[r#"
            build = Bool(true)
            target = Str("release")
            build.target = Str("release")
        "#]],
    );
}

#[test]
fn alias_binds_like_the_name() {
    let program = || Program::new("git").command("clone [repo]").alias("aliasClone");
    let by_alias = complete(program(), "aliasClone x");
    let by_name = complete(program(), "clone x");
    assert_eq!(by_alias, by_name);
    assert_eq!(by_name.get_str("repo"), Some("x"));
}

#[test]
fn variadic_and_optional_arguments() {
    check(
        Program::new("git").command("add [files...]"),
        "add a.rs b.rs",
        expect![[r#"
            add = Bool(true)
            files = List([Str("a.rs"), Str("b.rs")])
            add.files = List([Str("a.rs"), Str("b.rs")])
        "#]],
    );
    check(
        Program::new("git").command("log [count?]").command("status"),
        "log status",
        expect![[r#"
            log = Bool(true)
            status = Bool(true)
        "#]],
    );
}

#[test]
fn repeated_options() {
    let program = Program::new("app").add_option(Flag::new("-t --tag").converter(|it| it.to_uppercase().into()));
    check(
        program,
        "-t a --tag b",
        expect![[r#"
            t = List([Str("A"), Str("B")])
            tag = List([Str("A"), Str("B")])
        "#]],
    );
    let program = Program::new("app").add_option(Flag::new("-t --tag"));
    check(
        program,
        "--tag a --tag b",
        expect![[r#"
            t = List([Str("a"), Str("b")])
            tag = List([Str("a"), Str("b")])
        "#]],
    );
}
