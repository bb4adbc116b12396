//! JackAnalyzer CLI - Syntax analyzer for the Jack programming language.

use clap::Parser as ClapParser;
use jack_analyzer::error::Diagnostic;
use jack_analyzer::{analyze_source, jack_files_in, token_output_path, xml_output_path};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(name = "JackAnalyzer")]
#[command(version)]
#[command(about = "Syntax analyzer for the Jack programming language")]
struct Args {
    /// Input file (.jack) or directory containing .jack files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Also write the token listing (fooT.xml) for each input
    #[arg(short, long)]
    tokens: bool,

    /// Output directory (defaults to writing beside each input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let inputs = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        match jack_files_in(&args.input) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        return ExitCode::from(2);
    };

    for input in &inputs {
        if process_file(input, &args).is_err() {
            return ExitCode::from(1);
        }
    }

    ExitCode::SUCCESS
}

/// Read, analyze, and write the outputs for one file. Diagnostics go to
/// stderr; the first failing file aborts the whole run, leaving any
/// outputs already written on disk.
fn process_file(input: &PathBuf, args: &Args) -> Result<(), ()> {
    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", input.display(), e);
            return Err(());
        }
    };

    let analysis = match analyze_source(&source) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("{}:", input.display());
            eprintln!("{}", Diagnostic::new(&e).with_source(&source));
            return Err(());
        }
    };

    let xml_path = xml_output_path(input, args.output.as_deref());
    if let Err(e) = fs::write(&xml_path, &analysis.parse_xml) {
        eprintln!("Error writing {}: {}", xml_path.display(), e);
        return Err(());
    }

    if args.tokens {
        let token_path = token_output_path(input, args.output.as_deref());
        if let Err(e) = fs::write(&token_path, &analysis.token_xml) {
            eprintln!("Error writing {}: {}", token_path.display(), e);
            return Err(());
        }
    }

    Ok(())
}
