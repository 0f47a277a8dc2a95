//! Server-rendered pages and the static assets of the installable app.
//!
//! Inline scripts and styles are blocked by the CSP, so the browser client
//! and the stylesheet are served as separate assets.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use squeezit_core::{AppError, Format, InstallPlatform};

use crate::constants::{LEGAL_NOTICE_SLUG, PRIVACY_POLICY_SLUG};
use crate::error::HttpAppError;
use crate::state::AppState;

const TITLE: &str = "Squeezit - Free Online Image Compressor & Converter";
const DESCRIPTION: &str = "Use Squeezit to compress and convert images online instantly. \
Reduce file sizes without losing quality. Supports JPEG, PNG, WebP, AVIF, HEIC and more.";

const APP_JS: &str = include_str!("../../assets/app.js");
const SERVICE_WORKER_JS: &str = include_str!("../../assets/sw.js");
const STYLES_CSS: &str = include_str!("../../assets/styles.css");
const ICON_SVG: &str = include_str!("../../assets/icon.svg");

/// Selected on first load
const DEFAULT_SOURCE: Format = Format::Jpeg;
const DEFAULT_TARGET: Format = Format::Webp;

/// Placeholder in legal copy replaced by a mailto link
const CONTACT_PLACEHOLDER: &str = "{contact}";

struct LegalPage {
    slug: &'static str,
    title: &'static str,
    sections: &'static [(&'static str, &'static str)],
}

const LEGAL_PAGES: [LegalPage; 2] = [
    LegalPage {
        slug: LEGAL_NOTICE_SLUG,
        title: "Legal Notice",
        sections: &[
            (
                "1. Publisher of the Website",
                "The website is published by <strong>LeandroDev</strong>, registered under SIRET \
                 number 91276784500015, with its head office located in Marseille, France. \
                 Email: {contact}",
            ),
            (
                "2. Hosting",
                "The website is hosted by <strong>Hostinger</strong>.",
            ),
            (
                "3. Intellectual Property",
                "All content on this website (texts, images, graphics, logo, icons) is the \
                 exclusive property of LeandroDev unless otherwise stated. Any reproduction, \
                 distribution, modification or publication of these elements is prohibited \
                 without prior written consent.",
            ),
            (
                "4. Liability",
                "LeandroDev shall not be held responsible for direct or indirect damages caused \
                 to the user's equipment when accessing the site. Users are solely responsible \
                 for the use of the information provided on this site.",
            ),
            (
                "5. Governing Law",
                "These terms are governed by French law. Any disputes shall be subject to the \
                 exclusive jurisdiction of the courts of Marseille, France.",
            ),
        ],
    },
    LegalPage {
        slug: PRIVACY_POLICY_SLUG,
        title: "Privacy Policy",
        sections: &[
            (
                "1. Data Collection",
                "Images you upload are processed in memory to produce the converted files and \
                 are not stored. We may collect the name, email address and any data you \
                 voluntarily provide when contacting us.",
            ),
            (
                "2. Purpose of Data Processing",
                "Your data is used to respond to your requests, provide services, improve user \
                 experience and comply with legal obligations.",
            ),
            (
                "3. Cookies",
                "The website stores its application shell in your browser so it can be \
                 installed and opened offline. You can clear this data via your browser \
                 settings.",
            ),
            (
                "4. Data Storage and Security",
                "Personal information is stored securely and is only accessible by authorized \
                 personnel. We take all reasonable measures to protect your data against \
                 unauthorized access, alteration, disclosure or destruction.",
            ),
            (
                "5. Sharing Data with Third Parties",
                "Your data will never be sold. It may be shared only with service providers \
                 necessary for the operation of the site, such as hosting.",
            ),
            (
                "6. Your Rights",
                "In accordance with the GDPR, you have the right to access, correct, delete and \
                 object to the processing of your personal data. To exercise these rights, \
                 please contact us at {contact}.",
            ),
            (
                "7. Data Retention",
                "Your data is retained only for as long as necessary for the purposes for which \
                 it was collected, or as required by law.",
            ),
            (
                "8. Contact",
                "If you have any questions regarding this Privacy Policy, please contact us at \
                 {contact}.",
            ),
        ],
    },
];

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_options(selected: Format) -> String {
    Format::ALL
        .iter()
        .map(|format| {
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = format.as_str(),
                selected = if *format == selected { " selected" } else { "" },
                label = format.as_str().to_uppercase(),
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

/// `accept` attribute for the file input: the MIME type plus every extension.
fn accept_attribute(source: Format) -> String {
    std::iter::once(source.mime_type().to_string())
        .chain(
            source
                .accepted_extensions()
                .iter()
                .map(|ext| format!(".{}", ext)),
        )
        .collect::<Vec<_>>()
        .join(",")
}

fn layout(title: &str, canonical: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="theme-color" content="#000000">
<link rel="canonical" href="{canonical}">
<link rel="manifest" href="/manifest.webmanifest">
<link rel="icon" href="/icon.svg" type="image/svg+xml">
<link rel="stylesheet" href="/styles.css">
<script src="/app.js" defer></script>
</head>
<body>
<main>
{body}
</main>
<footer>
<span>&copy; Squeezit</span>
<nav><a href="/legal/{legal_notice}">Legal Notice</a> <a href="/legal/{privacy_policy}">Privacy Policy</a></nav>
</footer>
</body>
</html>
"##,
        title = escape_html(title),
        description = escape_html(DESCRIPTION),
        canonical = escape_html(canonical),
        body = body,
        legal_notice = LEGAL_NOTICE_SLUG,
        privacy_policy = PRIVACY_POLICY_SLUG,
    )
}

fn install_block(platform: InstallPlatform) -> String {
    match platform.instructions() {
        Some(steps) => {
            let items: String = steps
                .iter()
                .map(|step| format!("<li>{}</li>", escape_html(step)))
                .collect();
            format!(r#"<ol class="install-ios" id="install-ios">{}</ol>"#, items)
        }
        None => r#"<button type="button" id="install-button" hidden>Install Squeezit</button>"#
            .to_string(),
    }
}

/// Landing page with the format selectors and the upload area
#[tracing::instrument(skip(state, headers), fields(operation = "index"))]
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let platform = InstallPlatform::detect(user_agent);

    let body = format!(
        r#"<span class="badge">Squeezit &bull; Free Image Tool</span>
<h1>Compress &amp; Convert Images in Seconds</h1>
<p class="lead">With <strong>Squeezit</strong>, reduce image sizes instantly without losing quality. Convert between JPEG, PNG, WebP, AVIF and more, all for free.</p>
{install}
<form id="upload-form" action="/api/compress" method="post" enctype="multipart/form-data">
<label>From <select id="source-format" name="source">{source_options}</select></label>
<label>To <select id="target-format" name="format">{target_options}</select></label>
<label class="dropzone" id="dropzone">
<input type="file" id="file-input" name="images" multiple accept="{accept}">
<span>Drag &amp; drop images here, or click to select</span>
</label>
<noscript><button type="submit">Convert</button></noscript>
</form>
<p id="status" role="status" hidden>Processing&hellip;</p>
<section id="results" hidden>
<div class="actions">
<button type="button" id="download-all" hidden>Download all (.zip)</button>
<button type="button" id="clear-all">Clear all</button>
</div>
<ul id="result-list"></ul>
</section>"#,
        install = install_block(platform),
        source_options = format_options(DEFAULT_SOURCE),
        target_options = format_options(DEFAULT_TARGET),
        accept = accept_attribute(DEFAULT_SOURCE),
    );

    Html(layout(TITLE, &state.config.site_url, &body))
}

/// Static legal pages; unknown slugs are 404
#[tracing::instrument(skip(state), fields(operation = "legal_page"))]
pub async fn legal_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, HttpAppError> {
    let page = LEGAL_PAGES
        .iter()
        .find(|page| page.slug == slug)
        .ok_or_else(|| AppError::NotFound(format!("Legal page '{}' not found", slug)))?;

    let contact = escape_html(&state.config.contact_email);
    let mailto = format!(r#"<a href="mailto:{0}">{0}</a>"#, contact);

    let sections: String = page
        .sections
        .iter()
        .map(|(heading, text)| {
            format!(
                "<h2>{}</h2>\n<p>{}</p>\n",
                heading,
                text.replace(CONTACT_PLACEHOLDER, &mailto)
            )
        })
        .collect();

    let body = format!(
        "<article class=\"legal\">\n<h1>{}</h1>\n{}<p><a href=\"/\">Back to Squeezit</a></p>\n</article>",
        page.title, sections
    );
    let canonical = format!(
        "{}/legal/{}",
        state.config.site_url.trim_end_matches('/'),
        page.slug
    );

    Ok(Html(layout(
        &format!("{} - Squeezit", page.title),
        &canonical,
        &body,
    )))
}

/// Web app manifest
pub async fn manifest() -> Response {
    let manifest = json!({
        "name": "Squeezit",
        "short_name": "Squeezit",
        "description": DESCRIPTION,
        "start_url": "/",
        "scope": "/",
        "display": "standalone",
        "background_color": "#000000",
        "theme_color": "#000000",
        "icons": [
            { "src": "/icon.svg", "sizes": "any", "type": "image/svg+xml", "purpose": "any maskable" }
        ]
    });

    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/manifest+json"),
        )],
        Json(manifest),
    )
        .into_response()
}

fn static_asset(body: &'static str, content_type: &'static str, cache: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CACHE_CONTROL, HeaderValue::from_static(cache)),
        ],
        body,
    )
        .into_response()
}

/// Service worker; revalidated on every load so updates roll out promptly
pub async fn service_worker() -> Response {
    static_asset(
        SERVICE_WORKER_JS,
        "text/javascript; charset=utf-8",
        "no-cache",
    )
}

pub async fn app_js() -> Response {
    static_asset(
        APP_JS,
        "text/javascript; charset=utf-8",
        "public, max-age=3600",
    )
}

pub async fn styles() -> Response {
    static_asset(STYLES_CSS, "text/css; charset=utf-8", "public, max-age=3600")
}

pub async fn icon() -> Response {
    static_asset(ICON_SVG, "image/svg+xml", "public, max-age=86400")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_attribute_includes_aliases() {
        assert_eq!(accept_attribute(Format::Jpeg), "image/jpeg,.jpeg,.jpg");
        assert_eq!(accept_attribute(Format::Png), "image/png,.png");
    }

    #[test]
    fn test_format_options_mark_selection() {
        let options = format_options(Format::Webp);
        assert!(options.contains(r#"<option value="webp" selected>WEBP</option>"#));
        assert!(options.contains(r#"<option value="heic">HEIC</option>"#));
        assert_eq!(options.matches("<option").count(), Format::ALL.len());
    }

    #[test]
    fn test_install_block_per_platform() {
        assert!(install_block(InstallPlatform::Ios).contains("Add to Home Screen"));
        assert!(install_block(InstallPlatform::Other).contains("install-button"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_legal_slugs_are_unique() {
        assert_ne!(LEGAL_PAGES[0].slug, LEGAL_PAGES[1].slug);
    }
}
