//! RSS 2.0 rendering: news items in, feed document out.
//!
//! The document is built by template concatenation, matching the fixed
//! structure the feed's consumers already parse. Titles and descriptions
//! travel as CDATA sections so embedded markup or reserved characters in
//! headlines cannot corrupt the XML; links and guids are plain URLs. The
//! `pubDate` on every item is the generation time, not anything the source
//! claims: the feed reports "last seen by this generator".

use crate::models::NewsItem;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

/// Format a timestamp the way RSS `pubDate` wants it (RFC 822, UTC),
/// e.g. `Wed, 02 Oct 2024 14:33:07 +0000`.
pub fn format_rfc822(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// Wrap text in a CDATA section.
///
/// A literal `]]>` inside the text would terminate the section early, so it
/// is split across two adjacent sections. Conformant parsers concatenate
/// adjacent character data, leaving the content byte-identical.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Render one `<item>` fragment per news record, concatenated in input
/// order. Records with neither headline nor link are skipped silently.
/// An empty input slice yields an empty string, not an error.
#[instrument(level = "info", skip_all)]
pub fn render_items(items: &[NewsItem], now: DateTime<Utc>) -> String {
    let pub_date = format_rfc822(now);
    let mut rendered = String::new();
    let mut skipped = 0usize;

    for item in items {
        if item.is_blank() {
            skipped += 1;
            debug!("Skipping item with neither headline nor link");
            continue;
        }

        let enclosure = match item.thumb.as_deref() {
            Some(thumb) if !thumb.is_empty() => {
                format!("\n        <enclosure url=\"{thumb}\" type=\"image/jpeg\"/>")
            }
            _ => String::new(),
        };

        rendered.push_str(&format!(
            r#"
    <item>
        <title>{title}</title>
        <link>{link}</link>
        <guid isPermaLink="true">{link}</guid>
        <description>{description}</description>{enclosure}
        <pubDate>{pub_date}</pubDate>
    </item>"#,
            title = cdata(&item.headline),
            link = item.url,
            description = cdata(&item.description),
        ));
    }

    info!(
        total = items.len(),
        rendered = items.len() - skipped,
        skipped,
        "Rendered RSS item fragments"
    );
    rendered
}

/// Wrap the item fragments in the fixed channel envelope.
pub fn render_channel(items_xml: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
    <title>Jugantor Latest News</title>
    <link>https://www.jugantor.com</link>
    <description>Latest news from Jugantor</description>{items_xml}
</channel>
</rss>
"#
    )
}

/// Full pipeline tail: items straight to the finished document.
pub fn render_feed(items: &[NewsItem], now: DateTime<Utc>) -> String {
    render_channel(&render_items(items, now))
}
