//! Text post-processing for tool output
//!
//! Pure functions, no I/O. Eval-flow results come back from the network with
//! terminal color codes and escaped newlines; these helpers clean them up for
//! the calling agent. The Lua embedding helpers are how caller-supplied text
//! gets into generated code without being able to terminate it.

use std::sync::OnceLock;

use regex::Regex;

fn csi_pattern() -> &'static Regex {
    static CSI: OnceLock<Regex> = OnceLock::new();
    CSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid regex"))
}

fn package_pattern() -> &'static Regex {
    static PACKAGE: OnceLock<Regex> = OnceLock::new();
    PACKAGE.get_or_init(|| Regex::new(r"^[A-Za-z0-9@][A-Za-z0-9@/_.\-]*$").expect("valid regex"))
}

/// Remove ANSI CSI sequences (`ESC [ ... final-byte`) from process output.
pub fn strip_ansi(input: &str) -> String {
    csi_pattern().replace_all(input, "").into_owned()
}

/// Convert literal `\n` two-character sequences into real line breaks.
pub fn unescape_newlines(input: &str) -> String {
    input.replace("\\n", "\n")
}

/// Full cleanup applied to every eval-flow result.
pub fn clean_output(input: &str) -> String {
    unescape_newlines(&strip_ansi(input))
}

/// Embed arbitrary text in a Lua long-bracket string literal.
///
/// The bracket level is chosen longer than any run of `=` in the payload, so
/// no content can close the literal early. A newline follows the opening
/// bracket because Lua drops the first newline of a long string; this keeps
/// payloads that start with a line break intact.
pub fn lua_string_literal(payload: &str) -> String {
    let longest_eq_run = payload
        .split(|c| c != '=')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let level = "=".repeat(longest_eq_run + 1);
    format!("[{level}[\n{payload}]{level}]")
}

/// Package names reach generated code, so only a conservative character set
/// is accepted: letters, digits, `@ / _ . -`.
pub fn is_valid_package_name(name: &str) -> bool {
    package_pattern().is_match(name)
}
