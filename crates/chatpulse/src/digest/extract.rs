use crate::db::{Author, LinkMessage};
use crate::prelude::*;
use lazy_regex::regex;

/// Posts with longer snippets are cut to this many characters
const MAX_SNIPPET_LEN: usize = 100;

/// Hosts that make a URL eligible for the digest. The match is a
/// case-insensitive substring match over the whole URL.
const LINK_HOSTS: &[&str] = &["x.com", "twitter.com"];

/// Result of parsing the text of a single message
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ExtractedLinks {
    /// The text of the message without the links, possibly truncated
    pub(crate) snippet: String,

    /// Distinct links in the order of their first occurrence
    pub(crate) urls: Vec<String>,
}

/// Single entry of the digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedPost {
    pub(crate) author: String,
    pub(crate) snippet: String,
    pub(crate) urls: Vec<String>,
    pub(crate) timestamp: String,
}

pub(crate) fn extract_links(text: &str) -> ExtractedLinks {
    let matched: Vec<_> = regex!(r"https?://\S+")
        .find_iter(text)
        .map(|url| url.as_str())
        .filter(|url| is_link_to_post(url))
        .collect();

    let snippet = matched.iter().fold(text.to_owned(), |snippet, url| {
        snippet.replacen(url, "", 1).trim().to_owned()
    });

    let mut urls: Vec<String> = Vec::with_capacity(matched.len());
    for url in matched {
        if !urls.iter().any(|existing| existing == url) {
            urls.push(url.to_owned());
        }
    }

    ExtractedLinks {
        snippet: truncate(snippet),
        urls,
    }
}

fn is_link_to_post(url: &str) -> bool {
    let url = url.to_lowercase();
    LINK_HOSTS.iter().any(|host| url.contains(host))
}

fn truncate(snippet: String) -> String {
    match snippet.char_indices().nth(MAX_SNIPPET_LEN) {
        Some((end, _)) => format!("{}...", &snippet[..end]),
        None => snippet,
    }
}

/// Name of the author as it is displayed in the digest
pub(crate) fn display_name(author: &Author) -> String {
    if let Some(username) = non_empty(&author.username) {
        return format!("@{username}");
    }

    non_empty(&author.first_name)
        .unwrap_or("Unknown")
        .to_owned()
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|name| !name.is_empty())
}

impl ExtractedPost {
    /// Returns `None` if the message doesn't contain any links to posts
    pub(crate) fn from_message(message: &LinkMessage) -> Option<Self> {
        let ExtractedLinks { snippet, urls } = extract_links(&message.text);

        if urls.is_empty() {
            return None;
        }

        Some(Self {
            author: display_name(&message.author),
            snippet,
            urls,
            timestamp: message.created_at.to_short_human_readable(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;

    fn links(text: &str) -> ExtractedLinks {
        extract_links(text)
    }

    #[test]
    fn text_is_exactly_a_url() {
        assert_eq!(
            links("https://x.com/a/status/1"),
            ExtractedLinks {
                snippet: String::new(),
                urls: vec!["https://x.com/a/status/1".to_owned()],
            }
        );
    }

    #[test]
    fn url_is_stripped_from_the_snippet() {
        assert_eq!(
            links("check this out https://twitter.com/u/status/2 thoughts?"),
            ExtractedLinks {
                snippet: "check this out  thoughts?".to_owned(),
                urls: vec!["https://twitter.com/u/status/2".to_owned()],
            }
        );
    }

    #[test]
    fn long_snippet_is_truncated() {
        let text = format!("{} https://x.com/a/status/1", "a".repeat(150));
        let ExtractedLinks { snippet, urls } = links(&text);

        assert_eq!(snippet, format!("{}...", "a".repeat(100)));
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn snippet_of_exactly_max_len_is_kept() {
        let text = "б".repeat(100);
        assert_eq!(links(&text).snippet, text);
    }

    #[test]
    fn duplicate_urls() {
        assert_eq!(
            links("https://x.com/a/status/1 wow https://x.com/a/status/1"),
            ExtractedLinks {
                snippet: "wow".to_owned(),
                urls: vec!["https://x.com/a/status/1".to_owned()],
            }
        );
    }

    #[test]
    fn unrelated_urls_are_kept_in_the_snippet() {
        assert_eq!(
            links("see https://example.com and https://X.COM/Foo/status/3"),
            ExtractedLinks {
                snippet: "see https://example.com and".to_owned(),
                urls: vec!["https://X.COM/Foo/status/3".to_owned()],
            }
        );
    }

    #[test]
    fn plain_text_mention_has_no_links() {
        let message = LinkMessage {
            text: "I love x.com so much".to_owned(),
            created_at: Utc::now(),
            author: Author::default(),
        };

        assert_eq!(ExtractedPost::from_message(&message), None);
    }

    #[test]
    fn author_display_name() {
        let author = |username: Option<&str>, first_name: Option<&str>| Author {
            username: username.map(ToOwned::to_owned),
            first_name: first_name.map(ToOwned::to_owned),
        };

        assert_eq!(display_name(&author(Some("jane"), Some("Jane"))), "@jane");
        assert_eq!(display_name(&author(None, Some("Jane"))), "Jane");
        assert_eq!(display_name(&author(Some(""), Some("Jane"))), "Jane");
        assert_eq!(display_name(&author(None, None)), "Unknown");
    }
}
