//! # Command Line Interface
//!
//! Simple subcommands are directly in `main.rs`.
//! More elaborate subcommands are in the `commands` module.

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use gimekit::commands;
use gimekit::img::ImageFormat;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();
    let long_help =
"gimekit is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
PowerShell users may need to wrap the pipeline in a native shell.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
show metadata:        `gimekit catalog -f pic.cm3 --indent 2`
hex dump:             `gimekit dump -f pic.mge`
decode to pixmap:     `gimekit convert -f pic.cm3 -o pic.ppm`
decode from pipe:     `cat pic.mge | gimekit convert -o pic.ppm`
re-encode a pixmap:   `gimekit pack -f pic.ppm -t hrs -o pic.hrs`
extract a palette:    `gimekit palette -f pic.mge -o pic.pal`";

    let matches = gimekit::cli::build_cli().after_long_help(long_help).get_matches();

    if let Some(cmd) = matches.subcommand_matches("catalog") {
        let img = match cmd.get_one::<String>("file") {
            Some(path) => gimekit::create_image_from_file(path)?,
            None => gimekit::create_image_from_stdin()?
        };
        println!("{}",img.get_metadata(cmd.get_one::<u16>("indent").copied()));
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("dump") {
        let bytes = commands::get_input_bytes(cmd)?;
        gimekit::display_block(0,&bytes);
        return Ok(());
    }

    if let Some(cmd) = matches.subcommand_matches("convert") {
        return commands::convert::convert(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("pack") {
        return commands::pack::pack(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("palette") {
        return commands::palette::palette(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(gimekit::cli::build_cli(),cmd);
    }

    error!("No subcommand was found, try `gimekit --help`");
    return Err(Box::new(commands::CommandError::InvalidCommand));
}
