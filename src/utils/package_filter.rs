use crate::error::{Result, UpdaterError};
use regex::Regex;

/// Selects flake packages by attribute name.
///
/// The filter is a comma-separated list of names. A name matches exactly and
/// case-sensitively, like a flake attribute; `*` and `?` widen it into a glob
/// (`python3-*`).
#[derive(Debug, Clone)]
pub struct PackageFilter {
    patterns: Vec<Regex>,
}

impl PackageFilter {
    pub fn parse(spec: &str) -> Result<Self> {
        let patterns = spec
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(compile)
            .collect::<Result<Vec<_>>>()?;

        if patterns.is_empty() {
            return Err(UpdaterError::Configuration(
                "Package filter cannot be empty".to_string(),
            ));
        }
        Ok(Self { patterns })
    }

    pub fn matches(&self, package: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(package))
    }
}

fn is_attr_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '\'')
}

fn compile(name: &str) -> Result<Regex> {
    if let Some(bad) = name.chars().find(|&ch| !is_attr_char(ch) && ch != '*' && ch != '?') {
        return Err(UpdaterError::Configuration(format!(
            "'{name}' is not a package attribute name (unexpected '{bad}')"
        )));
    }

    let mut regex = String::from("^");
    for ch in name.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| {
        UpdaterError::Configuration(format!("Invalid package filter '{name}': {e}"))
    })
}
