use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use move2rust::driver::default_output_path;
use move2rust::pass::HoistScope;
use move2rust::{Destination, Driver, Status};

/// A lexical translator from Move smart contracts to Rust source
#[derive(Parser)]
#[clap(author, version, about)]
#[clap(after_help = AFTER_HELP)]
struct Cli {
    /// Path to the Move source file to translate
    #[clap(name = "INPUT_FILE")]
    input_file: PathBuf,
    /// Print the translation to stdout instead of writing it to a file
    #[clap(long = "stdout", conflicts_with = "OUTPUT_FILE")]
    stdout: bool,
    /// Path to write the translation to
    ///
    /// Defaults to the input path with its extension replaced by `rs`, and its
    /// first directory named `move` replaced by `rust`.
    #[clap(short = 'o', long = "output", name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,
    /// Write the translation even if some rewrite rules could not be applied
    #[clap(long = "allow-partial")]
    allow_partial: bool,
    /// Where to move struct and constant declarations found inside blocks
    #[clap(long = "hoist", value_enum, default_value_t = Hoist::Item)]
    hoist: Hoist,
}

const AFTER_HELP: &str = "\
Examples:

  $ move2rust move/sources/hero.move
  $ move2rust --stdout sources/hero.move
  $ move2rust --hoist file -o hero.rs sources/hero.move
";

#[derive(Copy, Clone, ValueEnum)]
enum Hoist {
    /// Before the top-level item that encloses the declaration
    Item,
    /// At the start of the file
    File,
}

impl From<Hoist> for HoistScope {
    fn from(hoist: Hoist) -> HoistScope {
        match hoist {
            Hoist::Item => HoistScope::Item,
            Hoist::File => HoistScope::File,
        }
    }
}

fn unwrap_or_exit<T>(option: Option<T>) -> T {
    option.unwrap_or_else(|| std::process::exit(Status::InputNotFound.exit_code()))
}

fn main() -> ! {
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        // `--help` and `--version` also arrive here, on stdout.
        if !error.use_stderr() {
            error.exit();
        }
        let _ = error.print();
        std::process::exit(Status::UsageError.exit_code());
    });

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter("MOVE2RUST_LOG")
            .write_style("MOVE2RUST_LOG_STYLE"),
    )
    .init();

    let mut driver = Driver::new();
    driver.install_panic_hook();
    driver.set_allow_partial(cli.allow_partial);
    driver.set_hoist_scope(cli.hoist.into());

    let destination = match (cli.stdout, cli.output_file) {
        (true, _) => Destination::Stdout,
        (false, Some(output_file)) => Destination::Path(output_file),
        (false, None) => Destination::Path(default_output_path(&cli.input_file)),
    };

    let file_id = unwrap_or_exit(driver.load_source_path(&cli.input_file));
    let status = driver.translate_and_emit(file_id, &destination);

    std::process::exit(status.exit_code());
}
