//! `Link` header parsing (RFC 8288 subset)

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub url: String,
    pub rels: Vec<String>,
}

impl LinkEntry {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Split a `Link` header into its `<url>; rel="..."` entries.
///
/// Entries without a `rel` parameter are kept with an empty relation list;
/// text that is not inside angle brackets is ignored.
pub fn parse_link_header(header: &str) -> Vec<LinkEntry> {
    let mut entries = Vec::new();
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let url = after[..end].trim();
        let tail = &after[end + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());

        let rels = tail[..params_end]
            .split(';')
            .filter_map(|param| param.split_once('='))
            .filter(|(name, _)| name.trim().eq_ignore_ascii_case("rel"))
            .flat_map(|(_, value)| {
                value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        entries.push(LinkEntry {
            url: url.to_string(),
            rels,
        });
        rest = &tail[params_end..];
    }

    entries
}

/// The `max_id` query parameter of the `rel="next"` URL, if both exist
pub fn next_max_id(header: &str) -> Option<u64> {
    let next = parse_link_header(header)
        .into_iter()
        .find(|entry| entry.has_rel("next"))?;
    let url = Url::parse(&next.url).ok()?;

    url.query_pairs()
        .find(|(name, _)| name == "max_id")
        .and_then(|(_, value)| value.parse().ok())
}
