//! Editor language modes.

use std::fmt;

/// Languages offered by the editor's language picker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    /// JavaScript (the default).
    #[default]
    JavaScript,
    /// Python.
    Python,
    /// Java.
    Java,
    /// C++.
    Cpp,
    /// HTML.
    Html,
    /// CSS.
    Css,
    /// SQL.
    Sql,
}

impl Language {
    /// Resolves a picker value, falling back to JavaScript for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "python" => Self::Python,
            "java" => Self::Java,
            "cpp" => Self::Cpp,
            "html" => Self::Html,
            "css" => Self::Css,
            "sql" => Self::Sql,
            _ => Self::JavaScript,
        }
    }

    /// Returns the syntax mode identifier understood by the editing surface.
    #[must_use]
    pub const fn mode(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "text/x-java",
            Self::Cpp => "text/x-c++src",
            Self::Html => "xml",
            Self::Css => "css",
            Self::Sql => "sql",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Html => "html",
            Self::Css => "css",
            Self::Sql => "sql",
        })
    }
}
