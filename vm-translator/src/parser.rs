//! VM command parser.
//!
//! Turns each non-comment source line into a typed command. Mnemonics and
//! segment names are case-sensitive.

use crate::error::{Result, VmError};

/// Arithmetic and logical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// Memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
}

/// VM command variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommand {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label { name: String },
    Goto { label: String },
    IfGoto { label: String },
    Function { name: String, num_locals: u16 },
    Call { name: String, num_args: u16 },
    Return,
}

/// Strip a trailing `// ...` comment and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

/// Parse a single VM line into a command.
///
/// Returns `Ok(None)` for empty lines and comments, `Ok(Some(cmd))` for
/// valid commands, and `Err` on the first syntactic problem.
pub fn parse_line(line: &str, line_num: usize, filename: &str) -> Result<Option<VmCommand>> {
    let statement = strip_comment(line);
    if statement.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = statement.split_whitespace().collect();

    let command = match parts[0] {
        "add" => VmCommand::Arithmetic(ArithmeticOp::Add),
        "sub" => VmCommand::Arithmetic(ArithmeticOp::Sub),
        "neg" => VmCommand::Arithmetic(ArithmeticOp::Neg),
        "eq" => VmCommand::Arithmetic(ArithmeticOp::Eq),
        "gt" => VmCommand::Arithmetic(ArithmeticOp::Gt),
        "lt" => VmCommand::Arithmetic(ArithmeticOp::Lt),
        "and" => VmCommand::Arithmetic(ArithmeticOp::And),
        "or" => VmCommand::Arithmetic(ArithmeticOp::Or),
        "not" => VmCommand::Arithmetic(ArithmeticOp::Not),
        "return" => VmCommand::Return,

        "push" | "pop" => {
            let (segment_name, index_str) = two_args(&parts, line_num, filename)?;
            let segment = parse_segment(segment_name, line_num, filename)?;
            let index = parse_index(index_str, line_num, filename)?;
            validate_segment_index(segment, index, line_num, filename)?;
            if parts[0] == "push" {
                VmCommand::Push { segment, index }
            } else {
                if segment == Segment::Constant {
                    return Err(VmError::PopToConstant {
                        line: line_num,
                        file: filename.to_string(),
                    });
                }
                VmCommand::Pop { segment, index }
            }
        }

        "label" | "goto" | "if-goto" => {
            let target = one_arg(&parts, line_num, filename)?.to_string();
            match parts[0] {
                "label" => VmCommand::Label { name: target },
                "goto" => VmCommand::Goto { label: target },
                _ => VmCommand::IfGoto { label: target },
            }
        }

        "function" | "call" => {
            let (name, count_str) = two_args(&parts, line_num, filename)?;
            let count = parse_index(count_str, line_num, filename)?;
            if parts[0] == "function" {
                VmCommand::Function {
                    name: name.to_string(),
                    num_locals: count,
                }
            } else {
                VmCommand::Call {
                    name: name.to_string(),
                    num_args: count,
                }
            }
        }

        other => {
            return Err(VmError::InvalidCommand {
                line: line_num,
                file: filename.to_string(),
                command: other.to_string(),
            });
        }
    };

    Ok(Some(command))
}

fn one_arg<'a>(parts: &[&'a str], line_num: usize, filename: &str) -> Result<&'a str> {
    parts.get(1).copied().ok_or_else(|| VmError::MissingArgument {
        line: line_num,
        file: filename.to_string(),
        command: parts[0].to_string(),
    })
}

fn two_args<'a>(parts: &[&'a str], line_num: usize, filename: &str) -> Result<(&'a str, &'a str)> {
    match (parts.get(1), parts.get(2)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(VmError::MissingArgument {
            line: line_num,
            file: filename.to_string(),
            command: parts[0].to_string(),
        }),
    }
}

fn parse_segment(s: &str, line_num: usize, filename: &str) -> Result<Segment> {
    match s {
        "constant" => Ok(Segment::Constant),
        "local" => Ok(Segment::Local),
        "argument" => Ok(Segment::Argument),
        "this" => Ok(Segment::This),
        "that" => Ok(Segment::That),
        "pointer" => Ok(Segment::Pointer),
        "temp" => Ok(Segment::Temp),
        "static" => Ok(Segment::Static),
        _ => Err(VmError::InvalidSegment {
            line: line_num,
            file: filename.to_string(),
            segment: s.to_string(),
        }),
    }
}

fn parse_index(s: &str, line_num: usize, filename: &str) -> Result<u16> {
    s.parse::<u16>().map_err(|_| VmError::InvalidNumber {
        line: line_num,
        file: filename.to_string(),
        value: s.to_string(),
    })
}

fn validate_segment_index(
    segment: Segment,
    index: u16,
    line_num: usize,
    filename: &str,
) -> Result<()> {
    match segment {
        Segment::Pointer if index > 1 => Err(VmError::InvalidPointerIndex {
            line: line_num,
            file: filename.to_string(),
            index,
        }),
        Segment::Temp if index > 7 => Err(VmError::InvalidTempIndex {
            line: line_num,
            file: filename.to_string(),
            index,
        }),
        _ => Ok(()),
    }
}
