use itertools::Itertools;
use regex::{Regex, RegexBuilder};

/// Case-insensitive `LIKE '%value%'` match over one or more values, with the
/// SQL wildcards `%` (any run) and `_` (any one character).
#[derive(Debug, Clone)]
pub struct Pattern {
    values: Vec<String>,
    /// `None` when there are no values, which matches nothing.
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new<I, S>(values: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(Self {
                values,
                regex: None,
            });
        }
        let pattern = values
            .iter()
            .map(|value| like_to_regex(&format!("%{value}%")))
            .join("|");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self {
            values,
            regex: Some(regex),
        })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(text))
    }
}

fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("^(?:");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            _ => {
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                regex.push_str(&regex::escape(encoded));
            }
        }
    }
    regex.push_str(")$");
    regex
}
