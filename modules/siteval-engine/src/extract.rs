use regex::Regex;
use tracing::{info, warn};

use siteval_common::types::ExtractedContent;

use crate::fetch::ContentFetcher;

/// Seam for markup-to-signals extraction, so the regex implementation can
/// be replaced by a real document parser without touching callers.
pub trait MarkupExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> ExtractedContent;
}

pub const MAX_HEADINGS: usize = 20;
pub const MAX_BODY_CHARS: usize = 6000;
pub const MAX_CTAS: usize = 10;

/// Headings at or past this length are navigation soup, not headings.
const MAX_HEADING_CHARS: usize = 200;
const MAX_CTA_CHARS: usize = 60;

// Fixed keyword sets for the boolean signals. Matched against lowercased
// raw markup; absent content can only produce false negatives.
const PRICING_MARKERS: &[&str] = &[
    "pricing",
    "per month",
    "/month",
    "/mo",
    "free trial",
    "billed annually",
    "subscribe",
];
const LOGIN_MARKERS: &[&str] = &["log in", "login", "sign in", "signin", "my account"];
const SOCIAL_PROOF_MARKERS: &[&str] = &[
    "testimonial",
    "trusted by",
    "loved by",
    "reviews",
    "rated",
    "case stud",
    "customers",
];
const SECURITY_MARKERS: &[&str] = &[
    "ssl",
    "secure checkout",
    "gdpr",
    "soc 2",
    "soc2",
    "iso 27001",
    "encrypted",
    "pci",
];
const VIDEO_MARKERS: &[&str] = &[
    "<video",
    "youtube.com/embed",
    "player.vimeo.com",
    "wistia",
    "loom.com/embed",
];
const FAQ_MARKERS: &[&str] = &["faq", "frequently asked"];

const CTA_PHRASES: &[&str] = &[
    "get started",
    "start free",
    "try for free",
    "try free",
    "sign up",
    "buy now",
    "book a demo",
    "request a demo",
    "start trial",
    "learn more",
    "download",
    "subscribe",
    "join now",
    "contact sales",
];

/// (lowercased fingerprint, technology name)
const TECH_FINGERPRINTS: &[(&str, &str)] = &[
    ("__next_data__", "Next.js"),
    ("data-reactroot", "React"),
    ("react-dom", "React"),
    ("data-v-app", "Vue.js"),
    ("ng-version", "Angular"),
    ("wp-content", "WordPress"),
    ("cdn.shopify.com", "Shopify"),
    ("squarespace", "Squarespace"),
    ("wix.com", "Wix"),
    ("webflow", "Webflow"),
    ("googletagmanager.com", "Google Tag Manager"),
    ("google-analytics.com", "Google Analytics"),
    ("js.stripe.com", "Stripe"),
    ("intercom", "Intercom"),
    ("hotjar", "Hotjar"),
    ("tailwind", "Tailwind CSS"),
    ("bootstrap", "Bootstrap"),
    ("jquery", "jQuery"),
];

fn contains_any(haystack_lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack_lower.contains(marker))
}

// --- Regex-driven extractor ---

pub struct RegexExtractor {
    title: Regex,
    og_title: Regex,
    meta_description: Regex,
    og_description: Regex,
    content_attr: Regex,
    heading: Regex,
    script: Regex,
    style: Regex,
    nav: Regex,
    footer: Regex,
    header: Regex,
    comment: Regex,
    main: Regex,
    article: Regex,
    content_container: Regex,
    body: Regex,
    cta: Regex,
    tag: Regex,
    entity_dec: Regex,
    entity_hex: Regex,
    whitespace: Regex,
}

impl RegexExtractor {
    pub fn new() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("valid regex");
        Self {
            title: re(r"(?is)<title[^>]*>(.*?)</title>"),
            og_title: re(r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*>"#),
            meta_description: re(r#"(?is)<meta[^>]+name\s*=\s*["']description["'][^>]*>"#),
            og_description: re(r#"(?is)<meta[^>]+property\s*=\s*["']og:description["'][^>]*>"#),
            content_attr: re(r#"(?is)content\s*=\s*["']([^"']*)["']"#),
            heading: re(r"(?is)<h[1-3][^>]*>(.*?)</h[1-3]\s*>"),
            script: re(r"(?is)<script[^>]*>.*?</script>"),
            style: re(r"(?is)<style[^>]*>.*?</style>"),
            nav: re(r"(?is)<nav[^>]*>.*?</nav>"),
            footer: re(r"(?is)<footer[^>]*>.*?</footer>"),
            header: re(r"(?is)<header[^>]*>.*?</header>"),
            comment: re(r"(?s)<!--.*?-->"),
            main: re(r"(?is)<main[^>]*>(.*?)</main>"),
            article: re(r"(?is)<article[^>]*>(.*?)</article>"),
            content_container: re(
                r#"(?is)<(?:div|section)[^>]*(?:id|class)\s*=\s*["'][^"']*content[^"']*["'][^>]*>(.*?)</(?:div|section)>"#,
            ),
            body: re(r"(?is)<body[^>]*>(.*?)</body>"),
            cta: re(r"(?is)<(?:a|button)\b[^>]*>(.*?)</(?:a|button)\s*>"),
            tag: re(r"(?s)<[^>]+>"),
            entity_dec: re(r"&#(\d+);"),
            entity_hex: re(r"&#[xX]([0-9a-fA-F]+);"),
            whitespace: re(r"\s+"),
        }
    }

    /// Strip nested tags, decode entities, collapse whitespace.
    fn clean_fragment(&self, fragment: &str) -> String {
        let text = self.tag.replace_all(fragment, " ");
        let text = self.decode_entities(&text);
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    fn decode_entities(&self, text: &str) -> String {
        let text = self.entity_dec.replace_all(text, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        });
        let text = self.entity_hex.replace_all(&text, |caps: &regex::Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        });
        // &amp; last so double-escaped entities stay literal
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&rsquo;", "\u{2019}")
            .replace("&lsquo;", "\u{2018}")
            .replace("&rdquo;", "\u{201d}")
            .replace("&ldquo;", "\u{201c}")
            .replace("&mdash;", "\u{2014}")
            .replace("&ndash;", "\u{2013}")
            .replace("&hellip;", "\u{2026}")
            .replace("&copy;", "\u{a9}")
            .replace("&reg;", "\u{ae}")
            .replace("&trade;", "\u{2122}")
            .replace("&amp;", "&")
    }

    fn meta_content(&self, markup: &str, tag_pattern: &Regex) -> Option<String> {
        let tag = tag_pattern.find(markup)?;
        let content = self.content_attr.captures(tag.as_str())?;
        let value = self.clean_fragment(&content[1]);
        (!value.is_empty()).then_some(value)
    }

    fn extract_title(&self, markup: &str) -> String {
        if let Some(caps) = self.title.captures(markup) {
            let title = self.clean_fragment(&caps[1]);
            if !title.is_empty() {
                return title;
            }
        }
        self.meta_content(markup, &self.og_title).unwrap_or_default()
    }

    fn extract_description(&self, markup: &str) -> String {
        self.meta_content(markup, &self.meta_description)
            .or_else(|| self.meta_content(markup, &self.og_description))
            .unwrap_or_default()
    }

    fn extract_headings(&self, markup: &str) -> Vec<String> {
        self.heading
            .captures_iter(markup)
            .map(|caps| self.clean_fragment(&caps[1]))
            .filter(|heading| !heading.is_empty() && heading.chars().count() < MAX_HEADING_CHARS)
            .take(MAX_HEADINGS)
            .collect()
    }

    /// Semantic containers first, whole document last. Chrome (scripts,
    /// styles, nav, footer, header, comments) is stripped before the
    /// region is chosen.
    fn extract_body_text(&self, markup: &str) -> String {
        let mut cleaned = markup.to_string();
        for stripper in [
            &self.script,
            &self.style,
            &self.comment,
            &self.nav,
            &self.footer,
            &self.header,
        ] {
            cleaned = stripper.replace_all(&cleaned, " ").into_owned();
        }

        let region = self
            .main
            .captures(&cleaned)
            .or_else(|| self.article.captures(&cleaned))
            .or_else(|| self.content_container.captures(&cleaned))
            .or_else(|| self.body.captures(&cleaned))
            .map(|caps| caps[1].to_string())
            .unwrap_or(cleaned);

        truncate_chars(&self.clean_fragment(&region), MAX_BODY_CHARS)
    }

    fn extract_call_to_actions(&self, markup: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut labels = Vec::new();

        for caps in self.cta.captures_iter(markup) {
            let label = self.clean_fragment(&caps[1]);
            if label.is_empty() || label.chars().count() > MAX_CTA_CHARS {
                continue;
            }
            let lower = label.to_lowercase();
            if !contains_any(&lower, CTA_PHRASES) {
                continue;
            }
            if seen.insert(lower) {
                labels.push(label);
                if labels.len() >= MAX_CTAS {
                    break;
                }
            }
        }

        labels
    }
}

impl Default for RegexExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_technologies(markup_lower: &str) -> Vec<String> {
    let mut found = Vec::new();
    for (fingerprint, name) in TECH_FINGERPRINTS {
        if markup_lower.contains(fingerprint) && !found.iter().any(|n| n == name) {
            found.push(name.to_string());
        }
    }
    found
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push('\u{2026}');
    truncated
}

impl MarkupExtractor for RegexExtractor {
    fn extract(&self, markup: &str) -> ExtractedContent {
        let lower = markup.to_lowercase();

        ExtractedContent {
            title: self.extract_title(markup),
            description: self.extract_description(markup),
            headings: self.extract_headings(markup),
            body_text: self.extract_body_text(markup),
            has_pricing: contains_any(&lower, PRICING_MARKERS),
            has_login: contains_any(&lower, LOGIN_MARKERS),
            has_social_proof: contains_any(&lower, SOCIAL_PROOF_MARKERS),
            has_security_badges: contains_any(&lower, SECURITY_MARKERS),
            has_video: contains_any(&lower, VIDEO_MARKERS),
            has_faq: contains_any(&lower, FAQ_MARKERS),
            call_to_actions: self.extract_call_to_actions(markup),
            technologies: detect_technologies(&lower),
            error: None,
        }
    }
}

// --- Fetch + extract orchestration ---

pub struct ContentExtractor {
    fetcher: ContentFetcher,
    extractor: Box<dyn MarkupExtractor>,
}

impl ContentExtractor {
    pub fn new(fetcher: ContentFetcher) -> Self {
        Self {
            fetcher,
            extractor: Box::new(RegexExtractor::new()),
        }
    }

    pub fn with_extractor(fetcher: ContentFetcher, extractor: Box<dyn MarkupExtractor>) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch a URL and derive content signals. Never fails: fetch errors
    /// and empty documents come back as the default shape with `error`
    /// set. Retry policy, if any, belongs to the caller.
    pub async fn extract(&self, url: &str) -> ExtractedContent {
        let markup = match self.fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(url, error = %e, "Content fetch failed");
                return ExtractedContent::failed(format!("fetch failed: {e}"));
            }
        };

        if markup.trim().is_empty() {
            warn!(url, "Fetched document was empty");
            return ExtractedContent::failed("fetched document was empty");
        }

        let content = self.extractor.extract(&markup);
        info!(
            url,
            headings = content.headings.len(),
            body_chars = content.body_text.chars().count(),
            technologies = content.technologies.len(),
            "Extracted content"
        );
        content
    }
}
