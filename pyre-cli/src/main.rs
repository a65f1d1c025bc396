use clap::Parser;
use pyre::dfa::CompileError;
use pyre::regex::Regex;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};
use thiserror::Error;

/// Searches a file for matches of a regular expression, built on Brzozowski derivatives.
/// The pattern syntax supports intersection (&) and complement (~) on top of the usual
/// operators. Prints one line per match; exits with 0 if at least one match was found,
/// 1 if none was, and 2 on a malformed pattern or an I/O failure.
#[derive(Debug, Parser)]
#[command(name = "pyre", version)]
struct PyreArgs {
    /// Print the compiled DFA and the capture group spans of each match
    #[arg(long)]
    debug: bool,
    /// The pattern to search for
    regex: String,
    /// The file to search in
    file: PathBuf,
}

#[derive(Debug, Error)]
enum Error<'a> {
    #[error("Error loading file {}: {}", .0.display(), .1)]
    File(&'a Path, io::Error),
    #[error("Error parsing regex: {0}")]
    RegexParse(nom::error::Error<&'a str>),
    #[error("Error compiling regex: {0}")]
    RegexCompile(#[from] CompileError),
}

fn main() -> ExitCode {
    let args = PyreArgs::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(2)
        }
    }
}

fn run<'a>(args: &'a PyreArgs) -> Result<bool, Error<'a>> {
    let contents =
        fs::read_to_string(&args.file).map_err(|e| Error::File(args.file.as_path(), e))?;
    let parsed = pyre::parser::regex(&args.regex).map_err(Error::RegexParse)?;
    let regex = Regex::from(parsed);
    let dfa = regex.compile()?;

    #[allow(unused_variables)]
    let log = |s: &str| {
        if args.debug {
            println!("{s}")
        }
    };
    macro_rules! log {
        ($($t:tt)*) => (log(&format!($($t)*)))
    }

    log!("Pattern compiled to {} states:", dfa.states().len());
    log!("{}", dfa.to_table());

    let matches = dfa.search_all(&contents);
    for found in matches.iter() {
        let (start, end) = found.span();
        println!("{start}..{end}: {}", &contents[start..end]);
        for (group, span) in found.groups().enumerate().skip(1) {
            match span {
                Some((start, end)) => log!("  group {group}: {start}..{end}"),
                None => log!("  group {group}: no match"),
            }
        }
    }
    Ok(!matches.is_empty())
}
