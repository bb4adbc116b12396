//! Hack assembly emission for every VM command.
//!
//! Generated labels embed the source location directly — comparison
//! branches use `<file>.<line>.T<OP>` and calls use
//! `<file>.<line>.RETURN_ADDRESS` — so every command site yields globally
//! unique labels across a compilation unit. R13-R15 are reserved scratch:
//! R15 holds pop target addresses, R14 the return frame, R13 the saved
//! return address.

use crate::memory::{SegmentAccess, segment_access};
use crate::parser::{ArithmeticOp, Segment, VmCommand};

/// Push the value in D onto the stack.
const PUSH_TAIL: &str = "@SP\nAM=M+1\nA=A-1\nM=D\n";

/// Pop the stack top into the address saved in R15.
const POP_TAIL: &str = "@SP\nAM=M-1\nD=M\n@R15\nA=M\nM=D\n";

/// Code generator for Hack assembly.
///
/// One generator translates a whole compilation unit; the current source
/// filename scopes `static` references and label generation.
pub struct CodeGenerator {
    static_filename: String,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            static_filename: String::new(),
        }
    }

    /// Set the current source filename (without extension).
    pub fn set_filename(&mut self, filename: &str) {
        self.static_filename = filename.to_string();
    }

    /// Translate one command into `buf`. `line` is the command's 1-based
    /// source line, used for per-site label uniquing.
    pub fn translate(&mut self, cmd: &VmCommand, line: usize, buf: &mut String) {
        match cmd {
            VmCommand::Arithmetic(op) => self.translate_arithmetic(*op, line, buf),
            VmCommand::Push { segment, index } => self.translate_push(*segment, *index, buf),
            VmCommand::Pop { segment, index } => self.translate_pop(*segment, *index, buf),
            VmCommand::Label { name } => {
                buf.push('(');
                buf.push_str(name);
                buf.push_str(")\n");
            }
            VmCommand::Goto { label } => {
                buf.push('@');
                buf.push_str(label);
                buf.push_str("\n0;JMP\n");
            }
            VmCommand::IfGoto { label } => {
                buf.push_str("@SP\nAM=M-1\nD=M\n@");
                buf.push_str(label);
                buf.push_str("\nD;JNE\n");
            }
            VmCommand::Function { name, num_locals } => {
                self.translate_function(name, *num_locals, buf)
            }
            VmCommand::Call { name, num_args } => self.translate_call(name, *num_args, line, buf),
            VmCommand::Return => self.translate_return(buf),
        }
    }

    // =========================================================================
    // Arithmetic and logical commands
    // =========================================================================

    fn translate_arithmetic(&mut self, op: ArithmeticOp, line: usize, buf: &mut String) {
        match op {
            ArithmeticOp::Add => self.translate_binary_op('+', buf),
            ArithmeticOp::Sub => self.translate_binary_op('-', buf),
            ArithmeticOp::And => self.translate_binary_op('&', buf),
            ArithmeticOp::Or => self.translate_binary_op('|', buf),
            ArithmeticOp::Neg => self.translate_unary_op('-', buf),
            ArithmeticOp::Not => self.translate_unary_op('!', buf),
            ArithmeticOp::Eq => self.translate_comparison("JEQ", "TEQ", line, buf),
            ArithmeticOp::Gt => self.translate_comparison("JGT", "TGT", line, buf),
            ArithmeticOp::Lt => self.translate_comparison("JLT", "TLT", line, buf),
        }
    }

    /// Pop y into D, then rewrite the new stack top with `x op y`.
    fn translate_binary_op(&self, op: char, buf: &mut String) {
        buf.push_str("@SP\nAM=M-1\nD=M\nA=A-1\nM=M");
        buf.push(op);
        buf.push_str("D\n");
    }

    /// Rewrite the stack top in place.
    fn translate_unary_op(&self, op: char, buf: &mut String) {
        buf.push_str("@SP\nA=M-1\nM=");
        buf.push(op);
        buf.push_str("M\n");
    }

    /// Compute `x - y`, write true (-1) optimistically, and jump over the
    /// false (0) overwrite when the condition holds.
    fn translate_comparison(&mut self, jump: &str, suffix: &str, line: usize, buf: &mut String) {
        buf.push_str("@SP\nAM=M-1\nD=M\nA=A-1\nD=M-D\nM=-1\n@");
        self.write_site_label(suffix, line, buf);
        buf.push_str("\nD;");
        buf.push_str(jump);
        buf.push_str("\n@SP\nA=M-1\nM=0\n(");
        self.write_site_label(suffix, line, buf);
        buf.push_str(")\n");
    }

    /// Write a per-site label: `<file>.<line>.<suffix>`.
    fn write_site_label(&self, suffix: &str, line: usize, buf: &mut String) {
        buf.push_str(&self.static_filename);
        buf.push('.');
        write_number(line, buf);
        buf.push('.');
        buf.push_str(suffix);
    }

    // =========================================================================
    // Memory access commands
    // =========================================================================

    fn translate_push(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_access(segment) {
            SegmentAccess::Constant => {
                buf.push('@');
                write_number(index as usize, buf);
                buf.push_str("\nD=A\n");
            }
            SegmentAccess::Indirect(base) => {
                buf.push('@');
                write_number(index as usize, buf);
                buf.push_str("\nD=A\n@");
                buf.push_str(base);
                buf.push_str("\nA=M+D\nD=M\n");
            }
            SegmentAccess::Direct(base) => {
                buf.push('@');
                write_number(index as usize, buf);
                buf.push_str("\nD=A\n@");
                write_number(base as usize, buf);
                buf.push_str("\nA=A+D\nD=M\n");
            }
            SegmentAccess::Static => {
                buf.push('@');
                self.write_static_name(index, buf);
                buf.push_str("\nD=M\n");
            }
        }
        buf.push_str(PUSH_TAIL);
    }

    fn translate_pop(&self, segment: Segment, index: u16, buf: &mut String) {
        match segment_access(segment) {
            // The parser rejects `pop constant`.
            SegmentAccess::Constant => debug_assert!(false, "pop to constant reached codegen"),
            SegmentAccess::Indirect(base) => {
                buf.push('@');
                write_number(index as usize, buf);
                buf.push_str("\nD=A\n@");
                buf.push_str(base);
                buf.push_str("\nD=D+M\n@R15\nM=D\n");
            }
            SegmentAccess::Direct(base) => {
                buf.push('@');
                write_number(index as usize, buf);
                buf.push_str("\nD=A\n@");
                write_number(base as usize, buf);
                buf.push_str("\nD=D+A\n@R15\nM=D\n");
            }
            SegmentAccess::Static => {
                buf.push('@');
                self.write_static_name(index, buf);
                buf.push_str("\nD=A\n@R15\nM=D\n");
            }
        }
        buf.push_str(POP_TAIL);
    }

    /// Write a static slot's symbolic name: `<file>.<index>`.
    fn write_static_name(&self, index: u16, buf: &mut String) {
        buf.push_str(&self.static_filename);
        buf.push('.');
        write_number(index as usize, buf);
    }

    // =========================================================================
    // Function commands
    // =========================================================================

    /// Emit the entry label, then zero `num_locals` slots and advance SP
    /// past them. A function with no locals gets the label only.
    fn translate_function(&self, name: &str, num_locals: u16, buf: &mut String) {
        buf.push('(');
        buf.push_str(name);
        buf.push_str(")\n");

        if num_locals == 0 {
            return;
        }

        buf.push_str("@SP\nA=M\n");
        for i in 0..num_locals {
            buf.push_str("M=0\n");
            if i + 1 < num_locals {
                buf.push_str("A=A+1\n");
            }
        }
        buf.push('@');
        write_number(num_locals as usize, buf);
        buf.push_str("\nD=A\n@SP\nM=M+D\n");
    }

    /// Push the return address and the caller's LCL, ARG, THIS, THAT;
    /// reposition ARG and LCL; jump to the callee; plant the return label.
    fn translate_call(&mut self, name: &str, num_args: u16, line: usize, buf: &mut String) {
        buf.push('@');
        self.write_site_label("RETURN_ADDRESS", line, buf);
        buf.push_str("\nD=A\n@SP\nA=M\nM=D\n");

        for saved in ["LCL", "ARG", "THIS", "THAT"] {
            buf.push('@');
            buf.push_str(saved);
            buf.push_str("\nD=M\n@SP\nAM=M+1\nM=D\n");
        }
        buf.push_str("@SP\nM=M+1\n");

        // ARG = SP - num_args - 5
        buf.push('@');
        write_number(num_args as usize + 5, buf);
        buf.push_str("\nD=-A\n@SP\nD=D+M\n@ARG\nM=D\n");

        // LCL = SP
        buf.push_str("@SP\nD=M\n@LCL\nM=D\n");

        buf.push('@');
        buf.push_str(name);
        buf.push_str("\n0;JMP\n(");
        self.write_site_label("RETURN_ADDRESS", line, buf);
        buf.push_str(")\n");
    }

    /// Unwind the frame: recover the return address from `*(frame - 5)`,
    /// leave the return value at `*ARG`, restore the caller's pointers
    /// from `frame - 1 .. frame - 4`, and jump back.
    fn translate_return(&self, buf: &mut String) {
        // frame = LCL
        buf.push_str("@LCL\nD=M\n@R14\nM=D\n");

        // R13 = *(frame - 5)
        buf.push_str("@5\nD=-A\n@R14\nA=M+D\nD=M\n@R13\nM=D\n");

        // *ARG = *(SP - 1); SP = ARG + 1
        buf.push_str("@SP\nA=M-1\nD=M\n@ARG\nA=M\nM=D\nD=A+1\n@SP\nM=D\n");

        // THAT, THIS, ARG, LCL from *(--frame)
        for restored in ["THAT", "THIS", "ARG", "LCL"] {
            buf.push_str("@R14\nAM=M-1\nD=M\n@");
            buf.push_str(restored);
            buf.push_str("\nM=D\n");
        }

        buf.push_str("@R13\nA=M\n0;JMP\n");
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a number to the buffer without allocating.
fn write_number(n: usize, buf: &mut String) {
    if n == 0 {
        buf.push('0');
        return;
    }

    let mut digits = [0u8; 20];
    let mut i = 0;
    let mut num = n;

    while num > 0 {
        digits[i] = (num % 10) as u8;
        num /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        buf.push((b'0' + digits[i]) as char);
    }
}
