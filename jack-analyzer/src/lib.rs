//! Jack Analyzer - Syntax analyzer for the Jack programming language.
//!
//! Tokenizes and parses Jack source into a concrete parse tree and renders
//! it as the spec-conformant XML accepted by the nand2tetris comparison
//! harness. Processing is single-threaded and sequential; the first error
//! in a file aborts that file.
//!
//! # Usage
//!
//! ```no_run
//! use jack_analyzer::analyze_source;
//!
//! let analysis = analyze_source("class Main { }")?;
//! println!("{}", analysis.parse_xml);
//! # Ok::<(), jack_analyzer::error::JackError>(())
//! ```

pub mod error;
pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod tree;
pub mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{JackError, Result};
use crate::parser::Parser;
use crate::tokenizer::Tokenizer;

/// Analyzed output of one Jack source file.
#[derive(Debug)]
pub struct Analysis {
    /// Parse tree XML in the spec-conformant output format (`*.xml`).
    pub parse_xml: String,
    /// Flat token listing (`*T.xml`).
    pub token_xml: String,
}

/// Analyze Jack source code: tokenize, parse, and render both XML forms.
pub fn analyze_source(source: &str) -> Result<Analysis> {
    let mut tokens = Tokenizer::new(source).tokenize()?;
    let token_xml = xml::tokens_to_xml(tokens.tokens());
    let classes = Parser::new(&mut tokens).parse()?;
    let parse_xml = xml::tree_to_spec_xml(&classes);

    Ok(Analysis {
        parse_xml,
        token_xml,
    })
}

/// Enumerate the `.jack` files directly inside `dir`, sorted by file name
/// so runs are reproducible. Errors if the directory has none.
pub fn jack_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| JackError::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jack"))
        .collect();

    if files.is_empty() {
        return Err(JackError::NoJackFiles {
            path: dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Output path for the parse tree XML: `foo.jack` -> `foo.xml`, placed in
/// `output_dir` when given, otherwise beside the input.
pub fn xml_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut path = match output_dir {
        Some(dir) => dir.join(input.file_name().unwrap_or_default()),
        None => input.to_path_buf(),
    };
    path.set_extension("xml");
    path
}

/// Output path for the token XML: `foo.jack` -> `fooT.xml`.
pub fn token_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = format!("{}T.xml", stem);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_source() {
        let analysis = analyze_source("class Main { function void main() { return; } }").unwrap();
        assert!(analysis.token_xml.starts_with("<tokens>\n"));
        assert!(analysis.parse_xml.starts_with("<class>\n"));
        assert!(analysis.parse_xml.ends_with("</class>\n"));
    }

    #[test]
    fn test_analyze_source_syntax_error() {
        let err = analyze_source("class Main { function void main() { let x = ; } }").unwrap_err();
        assert!(matches!(err, JackError::Syntax { .. }));
    }

    #[test]
    fn test_analyze_source_lexical_error() {
        let err = analyze_source("class Main { let x = 99999; }").unwrap_err();
        assert!(matches!(err, JackError::Lexical { .. }));
    }

    #[test]
    fn test_output_paths() {
        let input = Path::new("project/Main.jack");
        assert_eq!(xml_output_path(input, None), Path::new("project/Main.xml"));
        assert_eq!(
            xml_output_path(input, Some(Path::new("out"))),
            Path::new("out/Main.xml")
        );
        assert_eq!(
            token_output_path(input, None),
            Path::new("project/MainT.xml")
        );
        assert_eq!(
            token_output_path(input, Some(Path::new("out"))),
            Path::new("out/MainT.xml")
        );
    }
}
