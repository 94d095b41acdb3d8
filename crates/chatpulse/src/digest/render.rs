use super::ExtractedPost;
use std::fmt::Write;

/// Renders the digest message in the legacy Telegram Markdown syntax.
pub(crate) fn render_digest(posts: &[ExtractedPost]) -> String {
    let count = posts.len();
    let plural = if count == 1 { "" } else { "s" };

    let mut out = String::from("🐦 *X.com Posts from the Last 24 Hours*\n\n");

    // Writing to a `String` never fails
    let _ = writeln!(out, "Found {count} post{plural} shared by the community:\n");

    for (i, post) in posts.iter().enumerate() {
        let _ = writeln!(out, "{}. *{}* ({})", i + 1, post.author, post.timestamp);

        if !post.snippet.is_empty() {
            let _ = writeln!(out, "   _\"{}\"_", post.snippet);
        }

        for url in &post.urls {
            let _ = writeln!(out, "   🔗 {url}");
        }

        out.push('\n');
    }

    out.push_str("---\n_This is an automated summary posted every 12 hours_ 📊");

    out
}
