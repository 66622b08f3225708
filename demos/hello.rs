//! Try `cargo run --example hello -- greet world --shout`, or
//! `RUST_LOG=debug` to watch the pipeline.
use argot::{Flag, Program, Value, Values};

fn main() {
    tracing_subscriber::fmt::init();

    let matches = Program::new("hello")
        .description("says hello")
        .set_version(env!("CARGO_PKG_VERSION"), "-V, --version", "output the version number")
        .option("-q --quiet", "print nothing")
        .command("greet [name?]")
        .description("greet someone")
        .alias("g")
        .add_option(Flag::new("-s --shout").description("use capitals"))
        .action(|args: &Values, matches: &argot::Matches| {
            if matches.get_bool("quiet") == Some(true) {
                return;
            }
            let name = args.get_str("name").unwrap_or("stranger");
            let greeting = format!("hello, {name}!");
            match matches.get("shout") {
                Some(Value::Bool(true)) => println!("{}", greeting.to_uppercase()),
                _ => println!("{greeting}"),
            }
        })
        .command("count [words...]")
        .description("count words")
        .action(|args: &Values| {
            let n = args.get_list("words").map_or(0, |it| it.len());
            println!("{n}");
        })
        .parse();

    if let Ok(matches) = matches {
        tracing::debug!(entries = matches.iter().count(), "done");
    }
}
