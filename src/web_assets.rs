use rust_embed::RustEmbed;

/// The UI files are embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui"]
#[include = "*.html"]
#[include = "*.css"]
#[include = "*.js"]
pub struct UiAssets;

const STYLE_SLOT: &str = "<!-- STYLE -->";
const SCRIPT_SLOT: &str = "<!-- SCRIPT -->";

fn asset_text(path: &str) -> Option<String> {
    let file = UiAssets::get(path)?;
    match String::from_utf8(file.data.into_owned()) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Embedded asset {} is not UTF-8: {}", path, e);
            None
        }
    }
}

/// Returns `index.html` with the stylesheet and script inlined, ready for
/// `WebViewBuilder::with_html`.
pub fn index_html() -> Option<String> {
    let html = asset_text("index.html")?;
    let style = asset_text("style.css").unwrap_or_default();
    let script = asset_text("app.js").unwrap_or_default();
    Some(
        html.replace(STYLE_SLOT, &format!("<style>\n{style}\n</style>"))
            .replace(SCRIPT_SLOT, &format!("<script>\n{script}\n</script>")),
    )
}
