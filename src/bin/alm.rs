extern crate almanac as lib;

use flexi_logger::{FileSpec, Logger};
use lib::config::load_suitable_config;
use lib::date::CalendarDate;
use lib::interpreter::{Interpreter, Session};
use lib::prompt::Console;
use lib::render::Renderer;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "alm", about = "Almanac - a month calendar for the terminal.")]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(
        short = "d",
        long = "date",
        help = "start at this date (yyyy/mm/dd) instead of today"
    )]
    pub date: Option<CalendarDate>,

    #[structopt(long = "plain", help = "do not use colors")]
    pub plain: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    // Anything chattier than warnings would end up between the prompts
    const DEFAULT_LOG_LEVEL: &str = "warn";
    const FILE_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = if args.log_file.is_some() {
        Logger::try_with_env_or_str(FILE_LOG_LEVEL)?
    } else {
        Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
    };

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        println!("{}", termion::style::Reset);

        println!("Almanac ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = load_suitable_config(args.configfile.as_deref())?;
    if args.plain {
        config.theme.colors = false;
    }

    let cursor = args.date.unwrap_or_else(CalendarDate::today);
    let renderer = Renderer::new(config.theme.clone());
    let mut session = Session::new(cursor, config.overflow);

    if args.show {
        println!("{}", renderer.render(cursor, &session.store));
        return Ok(());
    }

    let stdin = stdin();
    let stdout = stdout();
    let console = Console::new(stdin.lock(), stdout.lock(), config.clear_screen);

    let mut interpreter = Interpreter::new(&mut session, &renderer, console);
    if let Err(e) = interpreter.run() {
        log::error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}
