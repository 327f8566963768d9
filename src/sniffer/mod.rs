//! Language sniffer (§4.7): given paste content, return a `syntax_type`
//! from the closed whitelist in §6.3.
//!
//! No off-the-shelf classifier crate fits this pack's dependency stack, so
//! detection is a hand-rolled cascade of cheap heuristics, checked in order
//! from most to least specific. The result is always a whitelist member;
//! anything unrecognized falls back to `plaintext`.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SYNTAX_TYPE: &str = "plaintext";

pub const SYNTAX_WHITELIST: &[&str] = &[
    "plaintext", "text", "markdown", "json", "xml", "html", "css", "javascript", "typescript",
    "python", "go", "golang", "java", "c", "cpp", "csharp", "ruby", "php", "rust", "swift",
    "kotlin", "scala", "sql", "bash", "shell", "powershell", "yaml", "toml", "ini", "dockerfile",
    "makefile", "nginx", "apache", "lua", "perl", "r", "matlab", "latex", "diff", "graphql",
    "protobuf", "haskell", "elixir", "erlang", "clojure", "lisp", "vim", "assembly",
];

pub fn is_whitelisted(syntax_type: &str) -> bool {
    SYNTAX_WHITELIST.contains(&syntax_type)
}

static SHEBANG_PYTHON: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#!.*python").unwrap());
static SHEBANG_SHELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#!.*(bash|/sh\b|/env sh)").unwrap());
static JSON_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*[\{\[][\s\S]*["']\s*:"#).unwrap());
static YAML_KEY_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[A-Za-z0-9_\-]+:\s").unwrap());
static PYTHON_DEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*def\s+\w+\s*\(.*\)\s*:").unwrap());
static GO_PACKAGE_FUNC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+\w+[\s\S]*\bfunc\s+\w+\s*\(").unwrap());
static JS_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(function|const|let)\b").unwrap());
static JAVA_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*public\s+class\s+\w+").unwrap());

/// Classify `content` into a whitelisted syntax type.
///
/// `filename_hint` is consulted first when present (extension match), then
/// the content-based cascade runs: shebang line, JSON/XML/HTML shape, YAML
/// shape, then language keyword heuristics. Defaults to `plaintext`.
pub fn sniff(content: &str, filename_hint: Option<&str>) -> String {
    if let Some(name) = filename_hint {
        if let Some(detected) = sniff_by_extension(name) {
            return detected.to_string();
        }
    }

    let trimmed = content.trim_start();

    if SHEBANG_PYTHON.is_match(trimmed) {
        return "python".to_string();
    }
    if SHEBANG_SHELL.is_match(trimmed) {
        return "bash".to_string();
    }

    if JSON_SHAPE.is_match(trimmed) && balanced_brackets(trimmed) {
        return "json".to_string();
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("<?xml") {
        return "xml".to_string();
    }
    if lower.contains("<!doctype html") || lower.starts_with("<html") {
        return "html".to_string();
    }

    if trimmed.starts_with("---") || count_matches(&YAML_KEY_VALUE, trimmed) >= 3 {
        return "yaml".to_string();
    }

    if PYTHON_DEF.is_match(trimmed) {
        return "python".to_string();
    }
    if GO_PACKAGE_FUNC.is_match(trimmed) {
        return "go".to_string();
    }
    if JAVA_CLASS.is_match(trimmed) {
        return "java".to_string();
    }
    if JS_KEYWORDS.is_match(trimmed) {
        return "javascript".to_string();
    }

    DEFAULT_SYNTAX_TYPE.to_string()
}

fn sniff_by_extension(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "py" => "python",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "rb" => "ruby",
        "php" => "php",
        "js" => "javascript",
        "ts" => "typescript",
        "json" => "json",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "md" => "markdown",
        "sh" => "bash",
        "sql" => "sql",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "cpp",
        "cs" => "csharp",
        _ => return None,
    })
}

fn balanced_brackets(s: &str) -> bool {
    let mut depth: i32 = 0;
    for ch in s.chars() {
        match ch {
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

fn count_matches(re: &Regex, s: &str) -> usize {
    re.find_iter(s).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_shebang() {
        assert_eq!(sniff("#!/usr/bin/env python\nprint('hi')", None), "python");
    }

    #[test]
    fn detects_python_def() {
        assert_eq!(sniff("def hello():\n    print('hi')", None), "python");
    }

    #[test]
    fn detects_bash_shebang() {
        assert_eq!(sniff("#!/bin/bash\necho hi", None), "bash");
    }

    #[test]
    fn detects_json() {
        assert_eq!(sniff(r#"{"key": "value", "n": 1}"#, None), "json");
    }

    #[test]
    fn detects_yaml() {
        let content = "name: gisty\nversion: 1\ndescription: test\n";
        assert_eq!(sniff(content, None), "yaml");
    }

    #[test]
    fn detects_go() {
        assert_eq!(
            sniff("package main\n\nfunc main() {\n}\n", None),
            "go"
        );
    }

    #[test]
    fn detects_javascript() {
        assert_eq!(sniff("const x = 1;\nfunction f() {}", None), "javascript");
    }

    #[test]
    fn detects_java() {
        assert_eq!(
            sniff("public class Main {\n  public static void main() {}\n}", None),
            "java"
        );
    }

    #[test]
    fn unrecognized_defaults_to_plaintext() {
        assert_eq!(sniff("just some prose, nothing special here", None), "plaintext");
    }

    #[test]
    fn filename_hint_takes_precedence() {
        assert_eq!(sniff("whatever content", Some("script.py")), "python");
    }

    #[test]
    fn whitelist_boundary() {
        assert!(is_whitelisted("go"));
        assert!(is_whitelisted("golang"));
        assert!(!is_whitelisted("brainfuck"));
    }
}
