use clap::{value_parser, crate_version, Arg, Command, ValueHint};

const IN_HELP: &str = "if the image is piped, omit `--file` option";
const T_LONG_HELP: &str = "Output types are `ppm` for a binary portable pixmap, or `rgba`
for raw 8 bit RGBA rows with no header.";
const PACK_LONG_HELP: &str = "The input is a binary portable pixmap (P6).  Every pixel must
match the target palette exactly, there is no nearest-color matching.  If no palette file is
given, one is derived from the colors in order of first appearance.";
const PAL_LONG_HELP: &str = "Bare palette files keep the colorspace they declare.  Decoded
images always answer with an RGB palette.  Only the composite to RGB conversion direction
is supported.";

fn file_arg(help: &'static str,req: bool) -> Arg {
    Arg::new("file").short('f').long("file").value_name("PATH").required(req).help(help)
        .value_hint(ValueHint::FilePath)
}

fn out_arg() -> Arg {
    Arg::new("out").short('o').long("out").value_name("PATH").help("output path, omit to pipe")
        .value_hint(ValueHint::FilePath)
        .required(false)
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

pub fn build_cli() -> Command {
    let img_types = ["hrs","mge","vef","rat"];
    let out_types = ["ppm","rgba"];
    let colorspaces = ["rgb","cmp"];
    Command::new("gimekit")
        .about("Converts retro images with emphasis on Color Computer 3.")
        .version(crate_version!())
        .subcommand(Command::new("catalog")
            .visible_alias("cat")
            .visible_alias("dir")
            .arg(file_arg("path to native image",false))
            .arg(indent_arg())
            .about("display image metadata as JSON")
            .after_help(IN_HELP))
        .subcommand(Command::new("dump")
            .arg(file_arg("path to native image",false))
            .about("display raw file bytes in hex and ascii")
            .after_help(IN_HELP))
        .subcommand(Command::new("convert")
            .arg(file_arg("path to native image",false))
            .arg(out_arg())
            .arg(Arg::new("type").short('t').long("type").value_name("TYPE")
                .help("output type")
                .long_help(T_LONG_HELP)
                .value_parser(out_types)
                .default_value("ppm"))
            .about("decode a native image to a universal form")
            .after_help(IN_HELP))
        .subcommand(Command::new("pack")
            .arg(file_arg("path to portable pixmap",false))
            .arg(out_arg())
            .arg(Arg::new("type").short('t').long("type").value_name("TYPE")
                .help("native format to create")
                .value_parser(img_types)
                .required(true))
            .arg(Arg::new("palette").long("palette").value_name("PATH")
                .help("palette file giving the native palette order")
                .value_hint(ValueHint::FilePath)
                .required(false))
            .about("encode a portable pixmap into a native image")
            .long_about(PACK_LONG_HELP))
        .subcommand(Command::new("palette")
            .arg(file_arg("path to native image or palette",false))
            .arg(out_arg())
            .arg(Arg::new("colorspace").short('c').long("colorspace").value_name("SPACE")
                .help("convert the palette to this colorspace")
                .value_parser(colorspaces)
                .required(false))
            .about("extract a palette as text")
            .long_about(PAL_LONG_HELP))
        .subcommand(Command::new("completions")
            .arg(Arg::new("shell").short('s').long("shell").value_name("SHELL")
                .help("shell to generate completions for")
                .value_parser(["bash","elv","fish","ps1","zsh"])
                .required(true))
            .about("write completions script to stdout for the specified shell"))
}
