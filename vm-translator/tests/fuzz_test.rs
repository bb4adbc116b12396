//! Property-based tests for the VM translator.

use proptest::prelude::*;
use vm_translator::parser::{VmCommand, parse_line};
use vm_translator::translate;

fn arb_segment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("local"),
        Just("argument"),
        Just("this"),
        Just("that"),
        Just("constant"),
        Just("static"),
    ]
}

fn arb_symbol_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_.]{0,12}"
}

fn arb_command() -> impl Strategy<Value = String> {
    prop_oneof![
        prop_oneof![
            Just("add"), Just("sub"), Just("neg"), Just("eq"), Just("gt"),
            Just("lt"), Just("and"), Just("or"), Just("not"),
        ]
        .prop_map(str::to_string),
        (arb_segment(), 0u16..256).prop_map(|(s, i)| format!("push {} {}", s, i)),
        (arb_segment(), 0u16..256).prop_filter_map("pop constant is invalid", |(s, i)| {
            (s != "constant").then(|| format!("pop {} {}", s, i))
        }),
        (0u16..2).prop_map(|i| format!("push pointer {}", i)),
        (0u16..8).prop_map(|i| format!("pop temp {}", i)),
        arb_symbol_name().prop_map(|l| format!("label {}", l)),
        arb_symbol_name().prop_map(|l| format!("goto {}", l)),
        arb_symbol_name().prop_map(|l| format!("if-goto {}", l)),
        (arb_symbol_name(), 0u16..8).prop_map(|(n, k)| format!("function {} {}", n, k)),
        (arb_symbol_name(), 0u16..8).prop_map(|(n, k)| format!("call {} {}", n, k)),
        Just("return".to_string()),
    ]
}

fn arb_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_command(), 0..30).prop_map(|cmds| cmds.join("\n"))
}

proptest! {

    /// Valid command streams always translate.
    #[test]
    fn test_valid_programs_translate(program in arb_program()) {
        let result = translate(&program, "Test", false);
        prop_assert!(result.is_ok(), "failed on:\n{}\n{:?}", program, result.err());
    }

    /// The parser never panics on arbitrary single lines.
    #[test]
    fn test_no_panic_on_arbitrary_line(line in "[a-zA-Z0-9\\-./ \t]{0,40}") {
        let _ = parse_line(&line, 1, "Test.vm");
    }

    /// Every translated program only references the Hack register set,
    /// numeric addresses, user labels, function names, or generated
    /// `<file>.<line>` site labels.
    #[test]
    fn test_symbol_discipline(program in arb_program()) {
        let asm = translate(&program, "File", false).unwrap();
        for line in asm.lines() {
            if let Some(symbol) = line.strip_prefix('@') {
                let hack_register = matches!(
                    symbol,
                    "SP" | "LCL" | "ARG" | "THIS" | "THAT" | "R13" | "R14" | "R15"
                );
                let numeric = !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit());
                let site_label = symbol.starts_with("File.");
                // Anything else must be a user-supplied name.
                let user_name = symbol
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                prop_assert!(
                    hack_register || numeric || site_label || user_name,
                    "unexpected symbol {symbol}"
                );
            }
        }
    }

    /// Translation output grows with input and each command emits at
    /// least one instruction.
    #[test]
    fn test_every_command_emits_code(program in arb_program()) {
        let command_count = program
            .lines()
            .filter(|l| parse_line(l, 1, "Test.vm").ok().flatten().is_some())
            .count();
        let asm = translate(&program, "Test", false).unwrap();
        prop_assert!(asm.lines().count() >= command_count);
    }

    /// Comment and whitespace lines never produce commands.
    #[test]
    fn test_comment_lines_yield_nothing(text in "[a-zA-Z0-9 ]{0,30}") {
        prop_assert_eq!(parse_line(&format!("// {}", text), 1, "T.vm").unwrap(), None);
    }

    /// Debug mode echoes exactly one comment line per command.
    #[test]
    fn test_debug_comment_per_command(program in arb_program()) {
        let command_count = program
            .lines()
            .filter(|l| parse_line(l, 1, "Test.vm").ok().flatten().is_some())
            .count();
        let asm = translate(&program, "Test", true).unwrap();
        let comment_count = asm.lines().filter(|l| l.starts_with("// ")).count();
        prop_assert_eq!(comment_count, command_count);
    }

    /// Out-of-range pointer/temp indexes are rejected, in-range accepted.
    #[test]
    fn test_pointer_index_range(i in 0u16..16) {
        let ok = parse_line(&format!("push pointer {}", i), 1, "T.vm").is_ok();
        prop_assert_eq!(ok, i <= 1);
    }

    #[test]
    fn test_temp_index_range(i in 0u16..16) {
        let ok = parse_line(&format!("push temp {}", i), 1, "T.vm").is_ok();
        prop_assert_eq!(ok, i <= 7);
    }
}

#[test]
fn test_parse_line_matches_translate_acceptance() {
    // A line the parser accepts must never fail at emission time.
    let lines = [
        "push constant 0",
        "pop static 7",
        "label A.B$C", // '$' is fine inside user label names
        "function f 0",
        "call f 0",
        "return",
    ];
    for line in lines {
        if let Ok(Some(cmd)) = parse_line(line, 1, "T.vm") {
            let program = line.to_string();
            assert!(translate(&program, "T", false).is_ok(), "{line}: {cmd:?}");
        }
    }
}
