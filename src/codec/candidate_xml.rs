//! Candidate listings returned by the cut list service
//!
//! The listing is XML-like but not reliably well formed, so it is scanned
//! rather than parsed: every `<cutlist ...>` block is one candidate whose flat
//! `<tag>value</tag>` children become metadata.

const OPEN: &str = "<cutlist";
const CLOSE: &str = "</cutlist>";

/// Bodies of all `<cutlist ...> ... </cutlist>` blocks
pub fn split_candidates(xml: &str) -> Vec<&str> {
    let mut bodies = Vec::new();
    let mut rest = xml;

    while let Some(pos) = rest.find(OPEN) {
        let after_name = &rest[pos + OPEN.len()..];
        let is_element = after_name.starts_with('>') || after_name.starts_with(char::is_whitespace);
        if !is_element {
            // `<cutlists>` wrapper or similar
            rest = after_name;
            continue;
        }
        let Some(gt) = after_name.find('>') else {
            break;
        };
        let body = &after_name[gt + 1..];
        let Some(end) = body.find(CLOSE) else {
            break;
        };
        bodies.push(&body[..end]);
        rest = &body[end + CLOSE.len()..];
    }

    bodies
}

/// Flat `<tag>value</tag>` pairs of one candidate, in document order
pub fn extract_tags(fragment: &str) -> Vec<(String, String)> {
    let mut tags = Vec::new();
    let mut rest = fragment;

    while let Some(lt) = rest.find('<') {
        let after = &rest[lt + 1..];
        let Some(gt) = after.find('>') else {
            break;
        };
        let head = &after[..gt];
        let tail = &after[gt + 1..];

        if let Some(name) = head.strip_suffix('/') {
            let name = name.trim();
            if is_tag_name(name) {
                tags.push((name.to_string(), String::new()));
            }
            rest = tail;
            continue;
        }
        if !is_tag_name(head) {
            rest = tail;
            continue;
        }

        let closing = format!("</{}>", head);
        match tail.find(&closing) {
            Some(end) if !tail[..end].contains('<') => {
                tags.push((head.to_string(), decode_entities(tail[..end].trim())));
                rest = &tail[end + closing.len()..];
            }
            _ => rest = tail,
        }
    }

    tags
}

fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| matches!(c, '/' | '?' | '!'))
        && !name.contains(|c: char| c.is_whitespace())
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" encoding="iso-8859-1" ?>
<files count="2">
<cutlist row_index="0">
    <id>12345</id>
    <name>Show.mpg.avi.cutlist</name>
    <rating>4.50</rating>
    <ratingcount>12</ratingcount>
    <author>someone</author>
    <usercomment>Fine &amp; dandy</usercomment>
    <errors>000000</errors>
    <withframes/>
</cutlist>
<cutlist row_index="1">
    <id>12346</id>
    <rating></rating>
</cutlist>
</files>"#;

    #[test]
    fn test_split_candidates() {
        let bodies = split_candidates(LISTING);
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("<id>12345</id>"));
        assert!(bodies[1].contains("<id>12346</id>"));
    }

    #[test]
    fn test_wrapper_element_is_not_a_candidate() {
        let xml = "<cutlists><cutlist><id>1</id></cutlist></cutlists>";
        let bodies = split_candidates(xml);
        assert_eq!(bodies, vec!["<id>1</id>"]);
    }

    #[test]
    fn test_extract_tags() {
        let bodies = split_candidates(LISTING);
        let tags = extract_tags(bodies[0]);
        assert_eq!(tags[0], ("id".to_string(), "12345".to_string()));
        assert!(tags.contains(&("usercomment".to_string(), "Fine & dandy".to_string())));
        assert!(tags.contains(&("withframes".to_string(), String::new())));
        assert_eq!(tags.len(), 8);
    }

    #[test]
    fn test_empty_value_is_present() {
        let bodies = split_candidates(LISTING);
        let tags = extract_tags(bodies[1]);
        assert_eq!(
            tags,
            vec![
                ("id".to_string(), "12346".to_string()),
                ("rating".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_unclosed_tag_is_skipped() {
        let tags = extract_tags("<id>5</id><broken>value<author>me</author>");
        assert_eq!(
            tags,
            vec![
                ("id".to_string(), "5".to_string()),
                ("author".to_string(), "me".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_candidates() {
        assert!(split_candidates("<files count=\"0\"></files>").is_empty());
        assert!(split_candidates("").is_empty());
    }
}
