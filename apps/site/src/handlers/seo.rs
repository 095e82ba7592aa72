//! Crawler and install metadata: robots.txt, sitemap.xml, web manifest.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use designo_core::Locale;

use crate::AppState;

/// `GET /robots.txt`
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let body = robots_body(state.config.server.origin());
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// `GET /sitemap.xml`
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let lastmod = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let body = sitemap_body(state.config.server.origin(), &lastmod);
    ([(header::CONTENT_TYPE, "application/xml")], body)
}

/// `GET /manifest.webmanifest`
pub async fn manifest() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(manifest_body()),
    )
}

fn robots_body(origin: &str) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for locale in Locale::ALL {
        body.push_str(&format!("Allow: /{}/\n", locale.code()));
    }
    body.push_str("Disallow: /dashboard/\nDisallow: /api/\n\n");
    body.push_str(&format!("Sitemap: {}/sitemap.xml\n", origin));
    body
}

fn sitemap_body(origin: &str, lastmod: &str) -> String {
    let mut entries = vec![(format!("{}/", origin), "1.0")];
    for locale in Locale::ALL {
        entries.push((format!("{}/{}", origin, locale.code()), "0.9"));
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (loc, priority) in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>weekly</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            loc, lastmod, priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn manifest_body() -> Value {
    json!({
        "name": "FOTO&VIDEO DESIGNO",
        "short_name": "DESIGNO",
        "description": "Professional photography and video services",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#ffffff",
        "icons": [
            { "src": "/icon-192x192.png", "sizes": "192x192", "type": "image/png" },
            { "src": "/icon-512x512.png", "sizes": "512x512", "type": "image/png" },
            {
                "src": "/icon-512x512.png",
                "sizes": "512x512",
                "type": "image/png",
                "purpose": "maskable"
            }
        ]
    })
}
