//! VM Translator - Stack VM to Hack assembly translator.
//!
//! Translates VM bytecode (`.vm`) to Hack assembly (`.asm`). A directory
//! of VM files becomes a single program: the bootstrap prelude followed by
//! each file's translation in lexicographic filename order.

pub mod bootstrap;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bootstrap::generate_bootstrap;
use crate::codegen::CodeGenerator;
pub use crate::error::{Result, VmError};
use crate::parser::{parse_line, strip_comment};

/// Rough output bytes per VM source line, for buffer pre-allocation.
const BYTES_PER_LINE: usize = 50;

/// Translate a single VM source string to Hack assembly.
///
/// `filename` (the stem, without extension) scopes static variables and
/// generated labels. With `debug` set, each command's emission is preceded
/// by a `// <source vm line>` comment.
pub fn translate(source: &str, filename: &str, debug: bool) -> Result<String> {
    let mut codegen = CodeGenerator::new();
    codegen.set_filename(filename);

    let mut output = String::with_capacity(source.lines().count() * BYTES_PER_LINE);

    for (num, line) in source.lines().enumerate() {
        let line_num = num + 1;
        if let Some(cmd) = parse_line(line, line_num, filename)? {
            if debug {
                output.push_str("// ");
                output.push_str(strip_comment(line));
                output.push('\n');
            }
            codegen.translate(&cmd, line_num, &mut output);
        }
    }

    Ok(output)
}

/// Translate every `.vm` file in a directory into one assembly program:
/// the bootstrap prelude, then each file's translation in lexicographic
/// filename order.
pub fn translate_directory(dir: &Path, debug: bool) -> Result<String> {
    let mut vm_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| VmError::FileRead {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if vm_files.is_empty() {
        return Err(VmError::NoVmFiles {
            path: dir.display().to_string(),
        });
    }

    vm_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut output = String::new();
    output.push_str(generate_bootstrap());

    for vm_file in &vm_files {
        let filename = vm_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown");

        let source = fs::read_to_string(vm_file).map_err(|e| VmError::FileRead {
            path: vm_file.display().to_string(),
            source: e,
        })?;

        output.push_str(&translate(&source, filename, debug)?);
    }

    Ok(output)
}

/// Output path for a directory input: `dir/` -> `dir/dir.asm`.
pub fn output_path(dir: &Path) -> PathBuf {
    let dir_name = dir
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    dir.join(format!("{}.asm", dir_name))
}
