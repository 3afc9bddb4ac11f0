//! todolist is a small to-do manager for the terminal
//!
//! - the list lives in one human-readable JSON file (`todo.json` by default)
//! - without a subcommand it runs a numbered menu; saving is explicit
//! - with a subcommand it runs that one operation and saves straight away
//! - titles are the handle for every item; the first matching title wins
//!
use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

mod app;
mod larch;
mod menu;
mod search;
mod todo;

use app::{Flags, Model, Msg, TodoApp};
use larch::LarchMinimal;
use search::Pattern;

fn cli() -> App<'static, 'static> {
    App::new("todolist")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Simon Janes <spjanes@protonmail.com>")
        .about("Keeps a to-do list in a JSON file")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("PATH")
                .help("Sets the to-do file to use")
                .takes_value(true)
                .default_value(todo::DEFAULT_FILE),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Logs more; repeat for debug output"),
        )
        .arg(
            Arg::with_name("no-color")
                .long("no-color")
                .help("Disables colored output"),
        )
        .subcommand(
            SubCommand::with_name("add")
                .about("Adds a new item")
                .arg(title_arg("TITLE", "Title of the new item")),
        )
        .subcommand(
            SubCommand::with_name("finish")
                .about("Marks an item as completed")
                .arg(title_arg("TITLE", "Title of the item to complete")),
        )
        .subcommand(
            SubCommand::with_name("edit")
                .about("Renames an item")
                .arg(title_arg("TITLE", "Title of the item to rename"))
                .arg(
                    Arg::with_name("NEW_TITLE")
                        .help("The new title")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Deletes an item")
                .arg(title_arg("TITLE", "Title of the item to delete")),
        )
        .subcommand(SubCommand::with_name("list").about("Shows the to-do list"))
        .subcommand(
            SubCommand::with_name("search")
                .about("Shows items whose title matches a pattern")
                .arg(
                    Arg::with_name("PATTERN")
                        .help("Keyword (case-insensitive) or regex with --regex")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("regex")
                        .short("r")
                        .long("regex")
                        .help("Treats PATTERN as a regular expression"),
                ),
        )
}

fn title_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).help(help).required(true).index(1)
}

fn init_logging(verbosity: u64) -> Result<(), log::SetLoggerError> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn arg(args: &ArgMatches, name: &str) -> String {
    args.value_of(name).unwrap_or_default().trim().to_string()
}

/// Message for a one-shot subcommand, `None` when no subcommand was given.
fn batch_msg(matches: &ArgMatches) -> Option<Msg> {
    match matches.subcommand() {
        ("add", Some(args)) => Some(Msg::Create(arg(args, "TITLE"))),
        ("finish", Some(args)) => Some(Msg::Finish(arg(args, "TITLE"))),
        ("edit", Some(args)) => Some(Msg::Edit {
            title: arg(args, "TITLE"),
            new_title: arg(args, "NEW_TITLE"),
        }),
        ("delete", Some(args)) => Some(Msg::Delete(arg(args, "TITLE"))),
        ("list", Some(_)) => Some(Msg::Show),
        ("search", Some(args)) => {
            let text = args.value_of("PATTERN").unwrap_or_default().to_string();
            let pattern = if args.is_present("regex") {
                Pattern::Regex(text)
            } else {
                Pattern::Keyword(text)
            };
            Some(Msg::Search(pattern))
        }
        _ => None,
    }
}

/// Writes the outcome of a one-shot command and flushes it. True when the
/// command failed.
fn report<W: Write>(model: &Model, out: &mut W) -> std::io::Result<bool> {
    write!(out, "{}", TodoApp::view(model))?;
    out.flush()?;
    Ok(model.has_failures())
}

fn main() -> Result<(), anyhow::Error> {
    let matches = cli().get_matches();
    init_logging(matches.occurrences_of("verbose"))?;
    if matches.is_present("no-color") {
        colored::control::set_override(false);
    }
    let path = PathBuf::from(matches.value_of("file").unwrap_or(todo::DEFAULT_FILE));

    match batch_msg(&matches) {
        Some(msg) => {
            let model = TodoApp::init(Flags {
                path,
                autosave: true,
            });
            let model = TodoApp::dispatch(msg, model)?;
            let stdout = std::io::stdout();
            if report(&model, &mut stdout.lock())? {
                process::exit(1);
            }
        }
        None => {
            let model = TodoApp::init(Flags {
                path,
                autosave: false,
            });
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            menu::run(model, &mut stdin.lock(), &mut stdout.lock())?;
        }
    }
    Ok(())
}
