use clap::Parser;
use jenusb_cat::IndicationParser;

/// `cat` for indications of the Jennic IEEE 802.15.4 coprocessor.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The indication to parse, as read from the interrupt endpoint.
    #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
    input: String,
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    match IndicationParser::parse_hex(&args.input) {
        Ok(output) => {
            print!("{output}");
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::ExitCode::FAILURE
        }
    }
}
