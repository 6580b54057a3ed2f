use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use loxy::ExitStatus;
use loxy::driver::{self, Options};

/// Parse loxy expressions and print their syntax trees.
#[derive(Parser)]
#[command(name = "loxy", version)]
struct Cli {
  /// Script to parse; starts an interactive prompt when omitted.
  path: Option<PathBuf>,

  /// List every token before printing the tree.
  #[arg(long)]
  tokens: bool,

  /// When to color diagnostics.
  #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
  color: ColorMode,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
  Auto,
  Always,
  Never,
}

impl From<ColorMode> for ColorChoice {
  fn from(mode: ColorMode) -> Self {
    match mode {
      ColorMode::Auto => ColorChoice::Auto,
      ColorMode::Always => ColorChoice::Always,
      ColorMode::Never => ColorChoice::Never,
    }
  }
}

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // --help and --version also arrive here, on stdout.
      let code = match err.print() {
        Err(_) => ExitStatus::Runtime.code(),
        Ok(()) if err.use_stderr() => ExitStatus::Usage.code(),
        Ok(()) => 0,
      };
      process::exit(code);
    }
  };

  let options = Options {
    dump_tokens: cli.tokens,
  };
  let mut err = StandardStream::stderr(cli.color.into());
  let mut out = io::stdout().lock();

  let result = match &cli.path {
    Some(path) => driver::run_file(path, options, &mut out, &mut err)
      .map(|had_error| had_error.then_some(ExitStatus::Compile)),
    None => driver::run_prompt(&mut io::stdin().lock(), options, &mut out, &mut err).map(|()| None),
  }
  .and_then(|status| driver::flush(&mut out).map(|()| status));

  match result {
    Ok(None) => {}
    Ok(Some(status)) => process::exit(status.code()),
    Err(error) => {
      eprintln!("{error}");
      process::exit(error.exit_status().code());
    }
  }
}
