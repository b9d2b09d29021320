// src/analyzer/links.rs
// =============================================================================
// Splits the anchors of a page into internal and external links.
//
// Rules, applied to every <a> element in document order:
// 1. An empty href or a javascript: pseudo-URL is skipped entirely
// 2. href contains the page's host            -> internal, kept as is
// 3. href starts with '/', '#' or ':'         -> internal, rewritten to
//    http://{host}/{href with every '#' and '/' removed}
// 4. anything else                            -> external, kept as is
//
// Rule 3 deletes characters instead of joining paths, so "/cert/default.asp"
// becomes "http://host/certdefault.asp". Existing reports depend on exactly
// this output; do not swap it for Url::join.
// =============================================================================

use crate::fetch::Document;

use super::model::Link;

const SCRIPT_SCHEME: &str = "javascript:";

/// Links found on a page, partitioned by where they point.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
}

pub fn classify_links(document: &Document) -> ClassifiedLinks {
    let host = document.host();
    let mut links = ClassifiedLinks::default();

    for anchor in document.select("a") {
        // Decisions look at the trimmed href; verbatim links keep the raw one
        let raw = anchor.value().attr("href").unwrap_or("");
        let href = raw.trim();
        if href.is_empty() || href.to_ascii_lowercase().contains(SCRIPT_SCHEME) {
            continue;
        }

        let text: String = anchor.text().collect();
        let name = display_name(&text);

        if !host.is_empty() && href.contains(host) {
            links.internal.push(Link::new(name, raw));
        } else if href.starts_with(['/', '#', ':']) {
            links.internal.push(Link::new(name, rewrite_relative(host, href)));
        } else {
            links.external.push(Link::new(name, raw));
        }
    }

    links
}

// Newlines and tabs vanish completely; other whitespace is only trimmed
fn display_name(text: &str) -> String {
    text.replace(['\n', '\t'], "").trim().to_string()
}

fn rewrite_relative(host: &str, href: &str) -> String {
    let path: String = href.chars().filter(|c| *c != '#' && *c != '/').collect();
    format!("http://{}/{}", host, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(html: &str) -> ClassifiedLinks {
        classify_links(&Document::parse(html, "www.example.com"))
    }

    fn urls(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn test_relative_links_are_rewritten_by_stripping() {
        let links = classify(
            r#"<a href="/html/tryit.asp?filename=tryhtml_default">EXERCISES</a>
               <a href="/cert/default.asp">CERTIFICATES</a>"#,
        );
        assert_eq!(
            urls(&links.internal),
            vec![
                "http://www.example.com/htmltryit.asp?filename=tryhtml_default",
                "http://www.example.com/certdefault.asp",
            ]
        );
        assert!(links.external.is_empty());
    }

    #[test]
    fn test_hash_and_colon_prefixes_are_internal() {
        let links = classify(r##"<a href="#top">Top</a><a href=":weird">W</a>"##);
        assert_eq!(
            urls(&links.internal),
            vec!["http://www.example.com/top", "http://www.example.com/:weird"]
        );
    }

    #[test]
    fn test_protocol_relative_href_is_stripped_too() {
        let links = classify(r#"<a href="//cdn.other.net/lib.js">CDN</a>"#);
        assert_eq!(urls(&links.internal), vec!["http://www.example.com/cdn.other.netlib.js"]);
    }

    #[test]
    fn test_absolute_link_to_own_host_is_kept_verbatim() {
        let links = classify(r#"<a href="https://www.example.com/a/b">Self</a>"#);
        assert_eq!(urls(&links.internal), vec!["https://www.example.com/a/b"]);
    }

    #[test]
    fn test_other_hosts_are_external_and_verbatim() {
        let links = classify(
            r#"<a href="https://www.linkedin.com/company/w3schools.com/">LinkedIn</a>
               <a href="mailto:someone@else.org">Mail</a>"#,
        );
        assert_eq!(
            urls(&links.external),
            vec!["https://www.linkedin.com/company/w3schools.com/", "mailto:someone@else.org"]
        );
    }

    #[test]
    fn test_empty_and_script_hrefs_are_dropped() {
        let links = classify(
            r#"<a>No href</a>
               <a href="">Empty</a>
               <a href="   ">Blank</a>
               <a href="javascript:void(0)">Script</a>
               <a href="JavaScript:go()">Script too</a>
               <a href="https://kept.org/">Kept</a>"#,
        );
        assert!(links.internal.is_empty());
        assert_eq!(urls(&links.external), vec!["https://kept.org/"]);
    }

    #[test]
    fn test_display_name_drops_newlines_and_tabs() {
        let links = classify("<a href=\"https://x.org/\">\n\t  Read\tthe\ndocs  \n</a>");
        assert_eq!(links.external[0].name, "Readthedocs");
    }

    #[test]
    fn test_duplicates_stay_separate_and_ordered() {
        let links = classify(
            r#"<a href="https://a.org/">1</a><a href="https://b.org/">2</a><a href="https://a.org/">3</a>"#,
        );
        let names: Vec<&str> = links.external.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "3"]);
        assert!(links.external.iter().all(|l| !l.accessible));
    }

    #[test]
    fn test_padded_hrefs_keep_raw_value_unless_rewritten() {
        let links = classify(
            r#"<a href=" https://other.org/x ">Other</a>
               <a href="  https://www.example.com/y">Self</a>
               <a href="  /docs/intro ">Docs</a>"#,
        );
        assert_eq!(urls(&links.external), vec![" https://other.org/x "]);
        assert_eq!(
            urls(&links.internal),
            vec!["  https://www.example.com/y", "http://www.example.com/docsintro"]
        );
    }
}
