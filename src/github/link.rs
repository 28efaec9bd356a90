//! Pagination cursor extraction from the `Link` response header.
//!
//! GitHub Link headers look like:
//! `<https://api.github.com/repositories/1/pulls?page=2>; rel="next", <...&page=5>; rel="last"`

use std::str::FromStr;

use crate::error::ConfigError;

/// How a link segment is recognised as the next page.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum LinkMatch {
    /// Segment must carry a `rel` attribute whose value is exactly `next`
    #[default]
    Strict,
    /// Any segment containing the text `next` anywhere matches.
    ///
    /// Kept for parity with older tooling; a URL that merely contains "next"
    /// (a branch called `next`, say) is taken as the cursor.
    Loose,
}

impl FromStr for LinkMatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LinkMatch::Strict),
            "loose" => Ok(LinkMatch::Loose),
            other => Err(ConfigError::invalid(
                "link_match",
                format!("expected 'strict' or 'loose', got '{}'", other),
            )),
        }
    }
}

/// Returns the URL of the next page, or `None` at the end of a collection.
pub fn next_link(header: Option<&str>, mode: LinkMatch) -> Option<String> {
    let header = header?;
    let mut segments = header.split(',');

    match mode {
        LinkMatch::Strict => segments.find_map(|segment| {
            let mut url = None;
            let mut is_next = false;

            for attr in segment.split(';') {
                let attr = attr.trim();
                if attr.starts_with('<') && attr.ends_with('>') {
                    url = Some(&attr[1..attr.len() - 1]);
                } else if let Some((name, value)) = attr.split_once('=') {
                    // Parameter names and relation types are case-insensitive.
                    if name.trim().eq_ignore_ascii_case("rel") {
                        is_next = value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .any(|r| r.eq_ignore_ascii_case("next"));
                    }
                }
            }

            url.filter(|u| is_next && !u.is_empty()).map(String::from)
        }),
        LinkMatch::Loose => segments
            .filter(|segment| segment.contains("next"))
            .find_map(bracketed_url),
    }
}

/// First `<...>` span in a segment.
fn bracketed_url(segment: &str) -> Option<String> {
    let start = segment.find('<')? + 1;
    let len = segment[start..].find('>')?;
    Some(segment[start..start + len].to_string()).filter(|u| !u.is_empty())
}
