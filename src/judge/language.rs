// src/judge/language.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages accepted by the judge.
///
/// The numeric ids are the remote execution service's language ids and must
/// be preserved exactly for wire compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Javascript,
    Cpp,
    C,
}

impl Language {
    /// Case-insensitive lookup with the aliases the frontend sends.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "python" | "python3" | "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "javascript" | "js" | "node" | "nodejs" => Some(Language::Javascript),
            "cpp" | "c++" => Some(Language::Cpp),
            "c" => Some(Language::C),
            _ => None,
        }
    }

    /// Remote execution service language id.
    pub fn backend_id(&self) -> u32 {
        match self {
            Language::Python => 71,
            Language::Java => 62,
            Language::Javascript => 63,
            Language::Cpp => 54,
            Language::C => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Javascript => "javascript",
            Language::Cpp => "cpp",
            Language::C => "c",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Language::parse("Python"), Some(Language::Python));
        assert_eq!(Language::parse("JAVA"), Some(Language::Java));
        assert_eq!(Language::parse("JavaScript"), Some(Language::Javascript));
        assert_eq!(Language::parse("C++"), Some(Language::Cpp));
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(Language::parse("js"), Some(Language::Javascript));
        assert_eq!(Language::parse("node"), Some(Language::Javascript));
        assert_eq!(Language::parse("py"), Some(Language::Python));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Language::parse("cobol"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn backend_ids_are_exact() {
        assert_eq!(Language::Python.backend_id(), 71);
        assert_eq!(Language::Java.backend_id(), 62);
        assert_eq!(Language::Javascript.backend_id(), 63);
        assert_eq!(Language::Cpp.backend_id(), 54);
        assert_eq!(Language::C.backend_id(), 50);
    }
}
