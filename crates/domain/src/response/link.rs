//! `Link` header parsing (RFC 8288).
//!
//! A response may carry several `Link` headers and each header value may
//! carry several comma-separated links. Both shapes are flattened into one
//! list of [`Link`] values in arrival order.

use serde::{Deserialize, Serialize};

/// A single parsed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URI, as written between the angle brackets.
    pub target: String,
    /// Relation types, one per space-separated token of the `rel` parameter.
    pub rels: Vec<String>,
    /// Remaining parameters with lower-cased names and unquoted values.
    pub params: Vec<(String, String)>,
}

impl Link {
    /// Returns true if this link carries the given relation type.
    ///
    /// Registered relation names compare case-insensitively; extension
    /// relations are URIs and compare exactly.
    #[must_use]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| {
            if rel.contains(':') {
                r == rel
            } else {
                r.eq_ignore_ascii_case(rel)
            }
        })
    }
}

/// Parses every link in one `Link` header value.
///
/// Entries that do not start with a `<URI>` are skipped.
#[must_use]
pub fn parse_link_header(value: &str) -> Vec<Link> {
    split_outside(value, ',')
        .into_iter()
        .filter_map(parse_link)
        .collect()
}

/// Parses and flattens several `Link` header values.
pub fn parse_link_headers<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Link> {
    values.into_iter().flat_map(parse_link_header).collect()
}

fn parse_link(entry: &str) -> Option<Link> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let close = rest.find('>')?;
    let target = rest[..close].trim().to_string();

    let mut rels = Vec::new();
    let mut params = Vec::new();
    for param in split_outside(&rest[close + 1..], ';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, value) = match param.split_once('=') {
            Some((name, value)) => (name.trim(), unquote(value.trim())),
            None => (param, String::new()),
        };
        let name = name.to_ascii_lowercase();
        if name == "rel" {
            rels.extend(value.split_whitespace().map(str::to_string));
        } else {
            params.push((name, value));
        }
    }

    Some(Link {
        target,
        rels,
        params,
    })
}

/// Splits on `sep` except inside `<...>` or double quotes.
fn split_outside(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_angle = false;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quote => escaped = true,
            '"' if !in_angle => in_quote = !in_quote,
            '<' if !in_quote => in_angle = true,
            '>' if !in_quote => in_angle = false,
            c if c == sep && !in_angle && !in_quote => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map_or_else(|| value.to_string(), |inner| inner.replace("\\\"", "\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONSTRAINED_BY: &str = "http://www.w3.org/ns/ldp#constrainedBy";

    #[test]
    fn test_single_link() {
        let links = parse_link_header(r#"<http://localhost/rest/a/fcr:metadata>; rel="describedby""#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "http://localhost/rest/a/fcr:metadata");
        assert_eq!(links[0].rels, vec!["describedby".to_string()]);
    }

    #[test]
    fn test_whitespace_around_separators() {
        let links = parse_link_header(r#"<http://x/c>  ;rel = "describedby" ; type = "text/turtle""#);
        assert_eq!(links.len(), 1);
        assert!(links[0].has_rel("describedby"));
        assert_eq!(
            links[0].params,
            vec![("type".to_string(), "text/turtle".to_string())]
        );

        let links = parse_link_header("<http://x/c>;rel=describes");
        assert!(links[0].has_rel("describes"));
    }

    #[test]
    fn test_multiple_links_in_one_value() {
        let value = format!(
            r#"<http://www.w3.org/ns/ldp#Resource>;rel="type", <http://x/static/constraints.rdf>; rel="{CONSTRAINED_BY}", <http://x/a,b>; rel="describedby""#
        );
        let links = parse_link_header(&value);
        assert_eq!(links.len(), 3);
        assert!(links[1].has_rel(CONSTRAINED_BY));
        assert_eq!(links[2].target, "http://x/a,b");
    }

    #[test]
    fn test_multiple_rel_tokens() {
        let links = parse_link_header(r#"<http://x/>; rel="type describedby""#);
        assert!(links[0].has_rel("type"));
        assert!(links[0].has_rel("DescribedBy"));
    }

    #[test]
    fn test_uri_relations_compare_exactly() {
        let links = parse_link_header(&format!("<http://x/>; rel=\"{CONSTRAINED_BY}\""));
        assert!(links[0].has_rel(CONSTRAINED_BY));
        assert!(!links[0].has_rel("http://www.w3.org/ns/ldp#ConstrainedBy"));
    }

    #[test]
    fn test_repeated_headers_flatten() {
        let links = parse_link_headers([
            r#"<http://x/1>; rel="type""#,
            r#"<http://x/2>; rel="describes""#,
        ]);
        let targets: Vec<_> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["http://x/1", "http://x/2"]);
    }

    #[test]
    fn test_garbage_entries_are_skipped() {
        let links = parse_link_header(r#"garbage, <http://x/ok>; rel="type", "#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "http://x/ok");
    }
}
