//! Property-based tests for the Jack analyzer.
//!
//! Generates valid and arbitrary Jack-like source and checks the analyzer's
//! structural invariants: no panics, strictly increasing token offsets,
//! balanced XML, and the tokenize -> render -> tokenize round-trip law.

use jack_analyzer::analyze_source;
use jack_analyzer::token::Token;
use jack_analyzer::tokenizer::Tokenizer;
use proptest::prelude::*;

/// Render a token sequence back to compilable text (comments and
/// whitespace are already gone; strings get their quotes back).
fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| **t != Token::Eof)
        .map(|t| match t {
            Token::StringConstant(s) => format!("\"{}\"", s),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,10}"
        .prop_filter("identifiers must not collide with keywords", |s| {
            jack_analyzer::token::Keyword::parse_keyword(s).is_none()
        })
}

fn arb_class_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,10}"
}

fn arb_simple_term() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..32768).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 .,!?]{0,20}".prop_map(|s| format!("\"{}\"", s)),
        Just("true".to_string()),
        Just("null".to_string()),
        arb_identifier(),
    ]
}

fn arb_expression() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_simple_term(),
        1 => (arb_simple_term(), "[+\\-*/&|<>=]", arb_simple_term())
            .prop_map(|(a, op, b)| format!("{} {} {}", a, op, b)),
        1 => arb_simple_term().prop_map(|t| format!("~({})", t)),
    ]
}

fn arb_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (arb_identifier(), arb_expression())
            .prop_map(|(v, e)| format!("let {} = {};", v, e)),
        1 => (arb_identifier(), arb_expression())
            .prop_map(|(v, e)| format!("let {}[{}] = 0;", v, e)),
        2 => (arb_identifier(), arb_identifier())
            .prop_map(|(obj, m)| format!("do {}.{}();", obj, m)),
        1 => arb_expression().prop_map(|e| format!("while ({}) {{ }}", e)),
        1 => (arb_expression(), arb_expression())
            .prop_map(|(c, e)| format!("if ({}) {{ }} else {{ let x = {}; }}", c, e)),
        2 => Just("return;".to_string()),
        1 => arb_expression().prop_map(|e| format!("return {};", e)),
    ]
}

fn arb_class() -> impl Strategy<Value = String> {
    (
        arb_class_name(),
        prop::collection::vec(
            (arb_identifier()).prop_map(|n| format!("field int {};", n)),
            0..3,
        ),
        prop::collection::vec(arb_statement(), 0..6),
    )
        .prop_map(|(name, fields, stmts)| {
            format!(
                "class {} {{\n    {}\n    function void run() {{\n        {}\n        return;\n    }}\n}}",
                name,
                fields.join("\n    "),
                stmts.join("\n        ")
            )
        })
}

fn arb_jack_like_input() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_class(),
        1 => "// [a-zA-Z0-9 ]{0,50}",
        1 => "/\\* [a-zA-Z0-9 ]{0,50} \\*/",
        1 => Just(String::new()),
        1 => "[ \t\n]{0,20}",
        1 => arb_class_name().prop_map(|name| format!("class {} {{", name)),
        1 => "[a-zA-Z0-9+\\-*/{}();,<>\"@#$ \n]{0,100}",
    ]
}

proptest! {

    /// Valid generated classes always analyze cleanly.
    #[test]
    fn test_valid_class_analyzes(source in arb_class()) {
        let analysis = analyze_source(&source);
        prop_assert!(analysis.is_ok(), "failed on:\n{}\n{:?}", source, analysis.err());
    }

    /// The analyzer never panics, whatever the input.
    #[test]
    fn test_no_panic_on_arbitrary_input(source in arb_jack_like_input()) {
        let _ = analyze_source(&source);
    }

    /// Token byte offsets are strictly increasing and within the source.
    #[test]
    fn test_offsets_strictly_increasing(source in arb_class()) {
        let stream = Tokenizer::new(&source).tokenize().unwrap();
        let offsets = stream.offsets();
        prop_assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(offsets.iter().all(|&o| o <= source.len()));
    }

    /// Tokenize -> render-as-text -> tokenize yields the same sequence.
    #[test]
    fn test_token_round_trip(source in arb_class()) {
        let first = Tokenizer::new(&source).tokenize().unwrap();
        let rendered = render_tokens(first.tokens());
        let second = Tokenizer::new(&rendered).tokenize().unwrap();
        prop_assert_eq!(first.tokens(), second.tokens());
    }

    /// Open and close tags in the output XML balance and nest.
    #[test]
    fn test_xml_tags_balance(source in arb_class()) {
        let analysis = analyze_source(&source).unwrap();
        let mut stack: Vec<String> = Vec::new();
        for line in analysis.parse_xml.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("</") {
                let tag = trimmed[2..trimmed.len() - 1].to_string();
                prop_assert_eq!(stack.pop(), Some(tag));
            } else if !trimmed.contains(' ') {
                stack.push(trimmed[1..trimmed.len() - 1].to_string());
            }
        }
        prop_assert!(stack.is_empty());
    }

    /// Integer boundaries: 0..=32767 accepted, larger rejected.
    #[test]
    fn test_integer_boundaries(n in 0u32..70000) {
        let source = format!("class T {{ function void f() {{ let x = {}; return; }} }}", n);
        let analysis = analyze_source(&source);
        if n <= 32767 {
            prop_assert!(analysis.is_ok());
        } else {
            prop_assert!(analysis.is_err());
        }
    }

    /// Unbalanced input errors out instead of panicking or looping.
    #[test]
    fn test_truncated_class_errors(name in arb_class_name()) {
        let source = format!("class {} {{ function void f() {{", name);
        prop_assert!(analyze_source(&source).is_err());
    }
}
