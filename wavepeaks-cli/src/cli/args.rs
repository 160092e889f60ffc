//! CLI argument definitions for `wavepeaks`.

use clap::{value_parser, Arg, ArgAction, Command};

fn input_arg() -> Arg {
    Arg::new("INPUT")
        .help("The input audio file, or - to use standard input")
        .required(true)
        .index(1)
}

fn range_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("SECONDS")
                .default_value("0")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .help("Start of the range in seconds"),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .value_name("SECONDS")
                .default_value("0")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .help("End of the range in seconds (0 = end of the audio)"),
        )
}

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    let root = Command::new("wavepeaks")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate waveform peak data from audio files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("INPUT")
                .help("The input audio file, or - to use standard input")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .help("Write the JSON to a file instead of stdout"),
        )
        .arg(
            Arg::new("zoom")
                .long("zoom")
                .short('z')
                .value_name("SAMPLES")
                .default_value("256")
                .value_parser(value_parser!(usize))
                .help("Samples per pixel"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .value_name("PIXELS")
                .value_parser(value_parser!(usize))
                .help("Target width in pixels (overrides --zoom)"),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .action(ArgAction::SetTrue)
                .help("Emit single-line JSON"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .arg(
            Arg::new("bench-extract")
                .long("bench-extract")
                .action(ArgAction::SetTrue)
                .help("Run a synthetic peak extraction benchmark and exit"),
        )
        .arg(
            Arg::new("bench-seconds")
                .long("bench-seconds")
                .value_name("SECONDS")
                .default_value("600.0")
                .value_parser(value_parser!(f32))
                .help("Length of the synthetic audio in seconds"),
        )
        .arg(
            Arg::new("bench-channels")
                .long("bench-channels")
                .value_name("COUNT")
                .default_value("2")
                .value_parser(value_parser!(u16))
                .help("Channel count of the synthetic audio"),
        )
        .arg(
            Arg::new("bench-zoom")
                .long("bench-zoom")
                .value_name("SAMPLES")
                .default_value("256")
                .value_parser(value_parser!(usize))
                .help("Samples per pixel for the benchmark"),
        )
        .arg(
            Arg::new("bench-iterations")
                .long("bench-iterations")
                .value_name("COUNT")
                .default_value("5")
                .value_parser(value_parser!(usize))
                .help("Number of timed iterations"),
        );

    range_args(root)
        .subcommand(
            range_args(
                Command::new("plot")
                    .about("Render the waveform to a PNG or JPEG image")
                    .arg(input_arg())
                    .arg(
                        Arg::new("OUTPUT")
                            .help("Output image path (.png, .jpg or .jpeg)")
                            .required(true)
                            .index(2),
                    ),
            )
            .arg(
                Arg::new("width")
                    .long("width")
                    .value_name("PIXELS")
                    .default_value("800")
                    .value_parser(value_parser!(u32))
                    .help("Image width"),
            )
            .arg(
                Arg::new("height")
                    .long("height")
                    .value_name("PIXELS")
                    .default_value("400")
                    .value_parser(value_parser!(u32))
                    .help("Image height"),
            )
            .arg(
                Arg::new("background")
                    .long("background")
                    .value_name("HEX")
                    .default_value("#ffffff")
                    .help("Background colour"),
            )
            .arg(
                Arg::new("foreground")
                    .long("foreground")
                    .value_name("HEX")
                    .default_value("#0064c8")
                    .help("Waveform colour"),
            )
            .arg(
                Arg::new("title")
                    .long("title")
                    .value_name("TEXT")
                    .default_value("")
                    .help("Plot title (drawn with the plot-labels feature)"),
            )
            .arg(
                Arg::new("zoom-duration")
                    .long("zoom-duration")
                    .value_name("SECONDS")
                    .value_parser(value_parser!(f64))
                    .conflicts_with("end")
                    .help("Plot this many seconds from --start, or centred if no start"),
            )
            .arg(
                Arg::new("resolution")
                    .long("resolution")
                    .value_name("FACTOR")
                    .default_value("1.0")
                    .value_parser(value_parser!(f64))
                    .allow_negative_numbers(true)
                    .help("Envelope pixels per image pixel"),
            )
            .arg(
                Arg::new("no-timestamp")
                    .long("no-timestamp")
                    .action(ArgAction::SetTrue)
                    .help("Do not draw the time axis"),
            )
            .arg(
                Arg::new("hide-x-axis")
                    .long("hide-x-axis")
                    .action(ArgAction::SetTrue)
                    .help("Hide the x axis"),
            )
            .arg(
                Arg::new("hide-y-axis")
                    .long("hide-y-axis")
                    .action(ArgAction::SetTrue)
                    .help("Hide the y axis"),
            ),
        )
        .subcommand(
            Command::new("view")
                .about("Browse the waveform in the terminal")
                .arg(input_arg())
                .arg(
                    Arg::new("print")
                        .long("print")
                        .action(ArgAction::SetTrue)
                        .help("Print one frame to stdout instead of opening the TUI"),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .value_name("COLUMNS")
                        .default_value("80")
                        .value_parser(value_parser!(usize))
                        .help("Frame width for --print"),
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .value_name("ROWS")
                        .default_value("12")
                        .value_parser(value_parser!(usize))
                        .help("Frame height for --print"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Print format details of an audio file")
                .arg(input_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as JSON"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn json_mode_defaults() {
        let matches = build_cli()
            .try_get_matches_from(["wavepeaks", "in.wav"])
            .expect("parse");
        assert_eq!(matches.get_one::<usize>("zoom"), Some(&256));
        assert_eq!(matches.get_one::<f64>("end"), Some(&0.0));
        assert_eq!(matches.get_one::<usize>("width"), None);
        assert!(!matches.get_flag("compact"));
    }

    #[test]
    fn plot_subcommand_parses_typed_values() {
        let matches = build_cli()
            .try_get_matches_from([
                "wavepeaks",
                "plot",
                "in.wav",
                "out.png",
                "--width",
                "640",
                "--zoom-duration",
                "2.5",
                "--hide-y-axis",
            ])
            .expect("parse");
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "plot");
        assert_eq!(sub.get_one::<u32>("width"), Some(&640));
        assert_eq!(sub.get_one::<f64>("zoom-duration"), Some(&2.5));
        assert!(sub.get_flag("hide-y-axis"));
        assert!(!sub.get_flag("no-timestamp"));
    }

    #[test]
    fn rejects_non_numeric_zoom() {
        assert!(build_cli()
            .try_get_matches_from(["wavepeaks", "in.wav", "--zoom", "lots"])
            .is_err());
    }
}
