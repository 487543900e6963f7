//! Where a workbook comes from

use std::fmt;
use std::path::PathBuf;

/// A workbook location: local file, http(s) resource or bytes already in memory
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
    Bytes(Vec<u8>),
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        let lower = location.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(location.trim().to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::File(path)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
            Source::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_recognised_by_scheme() {
        assert_eq!(
            Source::parse("https://example.com/plan.xlsx"),
            Source::Url("https://example.com/plan.xlsx".into())
        );
        assert_eq!(
            Source::parse("HTTP://example.com/plan.xlsx"),
            Source::Url("HTTP://example.com/plan.xlsx".into())
        );
        assert!(Source::parse("http://localhost:8080/x").is_remote());
    }

    #[test]
    fn everything_else_is_a_path() {
        assert_eq!(Source::parse("plan.xlsx"), Source::File(PathBuf::from("plan.xlsx")));
        assert_eq!(
            Source::parse("./https/plan.xlsx"),
            Source::File(PathBuf::from("./https/plan.xlsx"))
        );
        assert!(!Source::parse("/tmp/plan.xlsx").is_remote());
    }

    #[test]
    fn display_names_the_location() {
        assert_eq!(Source::parse("plan.xlsx").to_string(), "plan.xlsx");
        assert_eq!(Source::Bytes(vec![0; 4]).to_string(), "<4 bytes>");
    }
}
