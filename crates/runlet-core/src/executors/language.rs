use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages with a registered runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "python3")]
    Python3,
    #[serde(rename = "nodejs")]
    NodeJs,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python3, Language::NodeJs];

    /// Exact, case-sensitive match on the wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "python3" => Some(Language::Python3),
            "nodejs" => Some(Language::NodeJs),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "py" => Some(Language::Python3),
            "js" | "mjs" => Some(Language::NodeJs),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python3 => "python3",
            Language::NodeJs => "nodejs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python3 => "Python",
            Language::NodeJs => "Node.js",
        }
    }

    pub fn default_binary(&self) -> &'static str {
        match self {
            Language::Python3 => "python3",
            Language::NodeJs => "node",
        }
    }

    pub fn file_suffix(&self) -> &'static str {
        match self {
            Language::Python3 => ".py",
            Language::NodeJs => ".js",
        }
    }

    /// Optional runtimes are probed at startup and refused at dispatch when missing.
    /// Python is assumed present; a missing interpreter shows up as a spawn failure.
    pub fn is_optional(&self) -> bool {
        matches!(self, Language::NodeJs)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
