//! Tag rendering.
//!
//! Turns attribute records into tag strings. Every attribute name and value
//! goes through message resolution first. Output is assembled verbatim, no
//! escaping is applied: config files are trusted input.
//!
//! | Kind   | Output                                                     |
//! |--------|------------------------------------------------------------|
//! | script | `<script type="…" src="…">` + optional embed + `</script>`   |
//! | meta   | `<meta k="v" … />`                                         |
//! | link   | `<link k="v" … />`                                         |
//! | title  | `<title>…</title>`                                         |

pub mod embed;
pub mod message;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use message::{MessageCatalog, MessageSource, NoMessages};

use crate::core::{AssetKind, Locale};
use crate::registry::{AttrRecord, is_blank};

/// Renders records into tags for a locale.
#[derive(Clone)]
pub struct TagRenderer {
    /// Directory that `embed` paths are relative to
    root: PathBuf,
    messages: Arc<dyn MessageSource>,
}

impl std::fmt::Debug for TagRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRenderer").field("root", &self.root).finish_non_exhaustive()
    }
}

impl TagRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            messages: Arc::new(NoMessages),
        }
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageSource>) -> Self {
        self.messages = messages;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a message key, falling back to the key.
    #[inline]
    pub fn message(&self, key: &str, locale: &Locale) -> String {
        self.messages.resolve(key, locale)
    }

    /// Render a record as a tag of the given kind.
    ///
    /// `Title` records are not a thing; they render as nothing.
    pub fn tag(&self, kind: AssetKind, record: &AttrRecord, locale: &Locale) -> Option<String> {
        match kind {
            AssetKind::Scripts => Some(self.script(record, locale)),
            AssetKind::Meta => Some(self.meta(record, locale)),
            AssetKind::Links => Some(self.link(record, locale)),
            AssetKind::Title => None,
        }
    }

    pub fn script(&self, record: &AttrRecord, locale: &Locale) -> String {
        let resolve = |name: &str| {
            record
                .get(name)
                .map(|v| self.message(v, locale))
                .unwrap_or_default()
        };

        let mut tag = String::from("<script");
        let ty = resolve("type");
        if !is_blank(&ty) {
            tag.push_str(&format!(" type=\"{ty}\""));
        }
        let src = resolve("src");
        if !is_blank(&src) {
            tag.push_str(&format!(" src=\"{src}\""));
        }
        tag.push('>');

        let embed = resolve("embed");
        if !is_blank(&embed) {
            tag.push('\n');
            tag.push_str(&embed::read_embedded(&self.root, &embed));
            tag.push('\n');
        }

        tag.push_str("</script>");
        tag
    }

    pub fn meta(&self, record: &AttrRecord, locale: &Locale) -> String {
        self.void_element("meta", record, locale)
    }

    pub fn link(&self, record: &AttrRecord, locale: &Locale) -> String {
        self.void_element("link", record, locale)
    }

    /// `<name k="v" ... />`
    ///
    /// An attribute whose name resolves blank still gets its value and
    /// closing quote (`value"`), matching the established output.
    fn void_element(&self, name: &str, record: &AttrRecord, locale: &Locale) -> String {
        let mut tag = format!("<{name}");
        for (key, value) in record.iter() {
            let key = self.message(key, locale);
            let value = self.message(value, locale);
            if !is_blank(&key) {
                tag.push_str(&format!(" {key}=\""));
            }
            tag.push_str(&value);
            tag.push('"');
        }
        tag.push_str(" />");
        tag
    }

    /// `<title>…</title>`, or `None` when the title resolves blank.
    pub fn title(&self, raw: &str, locale: &Locale) -> Option<String> {
        if is_blank(raw) {
            return None;
        }
        let title = self.message(raw, locale);
        (!is_blank(&title)).then(|| format!("<title>{title}</title>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn en() -> Locale {
        Locale::new("en")
    }

    #[test]
    fn test_script_shorthand() {
        let renderer = TagRenderer::new(".");
        let tag = renderer.script(&AttrRecord::script("app.js"), &en());
        assert_eq!(tag, r#"<script type="text/javascript" src="app.js"></script>"#);
    }

    #[test]
    fn test_script_without_type_or_src() {
        let renderer = TagRenderer::new(".");
        let record: AttrRecord = [("defer", "defer")].into_iter().collect();
        assert_eq!(renderer.script(&record, &en()), "<script></script>");
    }

    #[test]
    fn test_script_embed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inline.js"), "var a = 1;").unwrap();
        let renderer = TagRenderer::new(dir.path());
        let record: AttrRecord = [("type", "text/javascript"), ("embed", "inline.js")].into_iter().collect();
        assert_eq!(
            renderer.script(&record, &en()),
            "<script type=\"text/javascript\">\nvar a = 1;\n</script>"
        );
    }

    #[test]
    fn test_script_missing_embed_keeps_newlines() {
        let dir = TempDir::new().unwrap();
        let renderer = TagRenderer::new(dir.path());
        let record: AttrRecord = [("embed", "missing.js")].into_iter().collect();
        assert_eq!(renderer.script(&record, &en()), "<script>\n\n</script>");
    }

    #[test]
    fn test_link_shorthand() {
        let renderer = TagRenderer::new(".");
        assert_eq!(
            renderer.link(&AttrRecord::stylesheet("style.css"), &en()),
            r#"<link rel="stylesheet" type="text/css" href="style.css" />"#
        );
    }

    #[test]
    fn test_meta_resolves_keys_and_values() {
        let catalog = MessageCatalog::new().with("de", "meta.desc", "Beschreibung");
        let renderer = TagRenderer::new(".").with_messages(Arc::new(catalog));
        let record: AttrRecord = [("name", "description"), ("content", "meta.desc")].into_iter().collect();
        assert_eq!(
            renderer.meta(&record, &Locale::new("de")),
            r#"<meta name="description" content="Beschreibung" />"#
        );
        assert_eq!(
            renderer.meta(&record, &en()),
            r#"<meta name="description" content="meta.desc" />"#
        );
    }

    #[test]
    fn test_meta_blank_key_emits_orphan_value() {
        // a name that resolves blank keeps its value and quote
        let catalog = MessageCatalog::new().with("", "hidden", " ");
        let renderer = TagRenderer::new(".").with_messages(Arc::new(catalog));
        let record: AttrRecord = [("charset", "utf-8"), ("hidden", "x")].into_iter().collect();
        assert_eq!(renderer.meta(&record, &en()), r#"<meta charset="utf-8"x" />"#);
    }

    #[test]
    fn test_title() {
        let catalog = MessageCatalog::new().with("fr", "home.title", "Accueil");
        let renderer = TagRenderer::new(".").with_messages(Arc::new(catalog));
        assert_eq!(
            renderer.title("home.title", &Locale::new("fr")).as_deref(),
            Some("<title>Accueil</title>")
        );
        assert_eq!(
            renderer.title("Plain", &en()).as_deref(),
            Some("<title>Plain</title>")
        );
        assert_eq!(renderer.title("  ", &en()), None);
    }

    #[test]
    fn test_tag_dispatch() {
        let renderer = TagRenderer::new(".");
        let record = AttrRecord::script("x.js");
        assert!(renderer.tag(AssetKind::Scripts, &record, &en()).unwrap().starts_with("<script"));
        assert!(renderer.tag(AssetKind::Title, &record, &en()).is_none());
    }
}
