//! VM Translator CLI.
//!
//! Translates every `.vm` file in a directory into a single `.asm`
//! program written inside that directory.
//!
//! # Usage
//!
//! ```bash
//! VMTranslator FibonacciElement/
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use vm_translator::{VmError, output_path, translate_directory};

fn main() {
    let args: Vec<String> = env::args().collect();
    let inputs: Vec<&String> = args[1..]
        .iter()
        .filter(|a| !a.starts_with('-'))
        .collect();

    if inputs.len() != 1 {
        eprintln!("Usage: VMTranslator <directory> [-d]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -d, --debug      Prepend // <vm line> comments to each emission");
        eprintln!("  -v, --verbose    Show detailed output");
        process::exit(1);
    }

    let debug = args.iter().any(|a| a == "-d" || a == "--debug");
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let input = Path::new(inputs[0]);

    if !input.is_dir() {
        eprintln!(
            "Error: {}",
            VmError::NotADirectory {
                path: input.display().to_string()
            }
        );
        process::exit(1);
    }

    match run(input, debug, verbose) {
        Ok(output) => println!("{}", output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(input: &Path, debug: bool, verbose: bool) -> Result<std::path::PathBuf, VmError> {
    if verbose {
        eprintln!("Translating directory: {}", input.display());
    }

    let asm = translate_directory(input, debug)?;
    let output = output_path(input);

    fs::write(&output, &asm).map_err(|e| VmError::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    if verbose {
        eprintln!("Generated {} lines of assembly", asm.lines().count());
    }

    Ok(output)
}
