//! Bootstrap prelude emitted before any translated code.

/// Generate the bootstrap: set `SP = 256`, then jump to `Sys.init`.
pub fn generate_bootstrap() -> &'static str {
    "@256\nD=A\n@SP\nM=D\n@Sys.init\n0;JMP\n"
}
