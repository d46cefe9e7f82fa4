//! Loader and lookup behavior against on-disk config files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::core::{AssetKind, Locale};
use crate::render::MessageCatalog;

fn en() -> Locale {
    Locale::new("en")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn registry(dir: &TempDir) -> Registry {
    Registry::new(dir.path()).with_caching(true)
}

const GLOBAL: &str = r#"[
    { "aliases": { "jquery": "/js/jquery-3.7.1.min.js", "site": "Example" } },
    { "title": "site",
      "meta": [{ "charset": "utf-8" }],
      "scripts": ["jquery"],
      "links": ["/css/base.css"] }
]"#;

const PAGES: &str = r#"[
    { "paths": ["/", "/home"],
      "title": "Home",
      "meta": [{ "name": "description", "content": "home page" }],
      "scripts": ["/js/home.js", { "src": "jquery", "defer": "defer" }],
      "links": ["/css/home.css"] },
    { "paths": ["/about"], "scripts": ["/js/about.js"] },
    { "name": "footer", "scripts": ["/js/footer.js"], "title": "Footer" }
]"#;

fn load_all(dir: &TempDir) -> Registry {
    let reg = registry(dir);
    reg.load_file(&write(dir.path(), GLOBAL_FILE, GLOBAL)).unwrap();
    reg.load_file(&write(dir.path(), "pages.json", PAGES)).unwrap();
    reg
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_report_counts() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);

    let global = reg.load_file(&write(dir.path(), GLOBAL_FILE, GLOBAL)).unwrap();
    assert_eq!(global.aliases, 2);
    assert_eq!(global.global, 1);
    // the alias-only descriptor has no content
    assert_eq!(global.skipped, 1);

    let pages = reg.load_file(&write(dir.path(), "pages.json", PAGES)).unwrap();
    assert_eq!(pages.paths, 3);
    assert_eq!(pages.named, 1);
    assert_eq!(pages.global, 0);
}

#[test]
fn test_missing_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let missing = dir.path().join("missing.json");

    assert!(reg.load_file(&missing).is_none());
    assert!(!reg.mtimes().is_tracked(&missing));
}

#[test]
fn test_aliases_only_global_file() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(dir.path(), GLOBAL_FILE, r#"[{ "aliases": { "a": "b" } }]"#);

    reg.load_file(&file).unwrap();
    assert!(reg.store().global().is_none());
    assert_eq!(reg.aliases().get("a").as_deref(), Some("b"));
}

#[test]
fn test_aliases_ignored_outside_global_file() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(
        dir.path(),
        "pages.json",
        r#"[{ "aliases": { "a": "b" }, "paths": ["/x"], "scripts": ["a"] }]"#,
    );

    reg.load_file(&file).unwrap();
    assert!(reg.aliases().is_empty());
    assert_eq!(
        &*reg.scripts_for_path("/x", &en(), false),
        [r#"<script type="text/javascript" src="a"></script>"#]
    );
}

#[test]
fn test_alias_substitution_before_storage() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    let global = reg.store().global().unwrap();
    assert_eq!(global.title.as_deref(), Some("Example"));
    assert_eq!(global.scripts[0].get("src"), Some("/js/jquery-3.7.1.min.js"));

    let home = reg.store().path("/home").unwrap();
    assert_eq!(home.scripts[1].get("src"), Some("/js/jquery-3.7.1.min.js"));
    assert_eq!(home.scripts[1].get("defer"), Some("defer"));
}

#[test]
fn test_paths_share_one_bundle() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    let root = reg.store().path("/").unwrap();
    let home = reg.store().path("/home").unwrap();
    assert!(Arc::ptr_eq(&root, &home));
}

#[test]
fn test_last_loaded_path_wins() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    let other = write(dir.path(), "other.json", r#"[{ "paths": ["/home"], "title": "Other" }]"#);

    reg.load_file(&other).unwrap();
    assert_eq!(reg.title_for_path("/home", &en(), true).as_deref(), Some("<title>Other</title>"));
    assert_eq!(reg.title_for_path("/", &en(), true).as_deref(), Some("<title>Home</title>"));
}

#[test]
fn test_named_never_reachable_by_path() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(
        dir.path(),
        "named.json",
        r#"[{ "name": "footer", "paths": ["/footer"], "scripts": ["/js/footer.js"] }]"#,
    );

    reg.load_file(&file).unwrap();
    assert!(reg.store().path("/footer").is_none());
    assert!(reg.scripts_for_path("/footer", &en(), false).is_empty());
    assert_eq!(reg.scripts_for_name("footer", &en()).len(), 1);
}

#[test]
fn test_named_descriptor_in_global_file_is_global() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(dir.path(), GLOBAL_FILE, r#"[{ "name": "site", "title": "Site" }]"#);

    reg.load_file(&file).unwrap();
    assert!(reg.store().named("site").is_none());
    assert_eq!(reg.store().global().unwrap().title.as_deref(), Some("Site"));
}

#[test]
fn test_pathless_descriptor_is_discarded() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(dir.path(), "pages.json", r#"[{ "title": "Lost" }, { "paths": [], "title": "Lost" }]"#);

    let report = reg.load_file(&file).unwrap();
    assert_eq!(report.skipped, 2);
    assert!(reg.store().paths().is_empty());
}

#[test]
fn test_malformed_json_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    let pages = dir.path().join("pages.json");

    fs::write(&pages, r#"[{ "paths": ["/home"], "title": "Broken" "#).unwrap();
    assert!(reg.load_file(&pages).is_none());
    assert_eq!(reg.title_for_path("/home", &en(), true).as_deref(), Some("<title>Home</title>"));
    // tracked anyway, so the next sweep does not retry an unchanged broken file
    assert!(reg.mtimes().is_tracked(&pages));
}

#[test]
fn test_bad_descriptor_keeps_earlier_ones() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let file = write(
        dir.path(),
        "pages.json",
        r#"[
            { "paths": ["/a"], "title": "A" },
            { "paths": "/b", "title": "B" },
            { "paths": ["/c"], "title": "C" }
        ]"#,
    );

    assert!(reg.load_file(&file).is_none());
    assert!(reg.store().path("/a").is_some());
    assert!(reg.store().path("/b").is_none());
    assert!(reg.store().path("/c").is_none());
}

#[test]
fn test_load_sources_directory_global_first() {
    let dir = TempDir::new().unwrap();
    // sorts before the global file, but depends on its alias
    write(dir.path(), "a-pages.json", r#"[{ "paths": ["/"], "scripts": ["jquery"] }]"#);
    write(dir.path(), GLOBAL_FILE, r#"[{ "aliases": { "jquery": "/js/jq.js" } }]"#);

    let reg = registry(&dir);
    let report = reg.load_sources(&[dir.path().to_path_buf()]);
    assert_eq!(report.files, 2);
    assert_eq!(
        &*reg.scripts_for_path("/", &en(), false),
        [r#"<script type="text/javascript" src="/js/jq.js"></script>"#]
    );
}

#[test]
fn test_load_sources_counts_failures() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "good.json", r#"[{ "paths": ["/"], "title": "T" }]"#);
    let bad = write(dir.path(), "bad.json", "{ not json");
    let missing = dir.path().join("missing.json");

    let reg = registry(&dir);
    let report = reg.load_sources(&[good, bad, missing]);
    assert_eq!(report.files, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.paths, 1);
}

// ============================================================================
// Lookups
// ============================================================================

#[test]
fn test_unknown_path_is_empty() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    assert!(reg.scripts_for_path("/nowhere", &en(), false).is_empty());
    assert!(reg.meta_for_path("/nowhere", &en(), false).is_empty());
    assert!(reg.links_for_path("/nowhere", &en(), false).is_empty());
    assert!(reg.title_for_path("/nowhere", &en(), true).is_none());
    assert!(reg.title_for_name("nobody", &en()).is_none());
}

#[test]
fn test_global_items_come_first() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    let scripts = reg.scripts_for_path("/home", &en(), true);
    assert_eq!(
        &*scripts,
        [
            r#"<script type="text/javascript" src="/js/jquery-3.7.1.min.js"></script>"#,
            r#"<script type="text/javascript" src="/js/home.js"></script>"#,
            r#"<script src="/js/jquery-3.7.1.min.js"></script>"#,
        ]
    );

    let links = reg.links_for_path("/home", &en(), false);
    assert_eq!(
        &*links,
        [r#"<link rel="stylesheet" type="text/css" href="/css/home.css" />"#]
    );
}

#[test]
fn test_meta_attribute_order() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    let meta = reg.meta_for_path("/home", &en(), true);
    assert_eq!(
        &*meta,
        [
            r#"<meta charset="utf-8" />"#,
            r#"<meta name="description" content="home page" />"#,
        ]
    );
}

#[test]
fn test_title_falls_back_to_global() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    // /about has a bundle but no title
    assert_eq!(reg.title_for_path("/about", &en(), true).as_deref(), Some("<title>Example</title>"));
    assert!(reg.title_for_path("/about", &en(), false).is_none());
    // /home has its own title
    assert_eq!(reg.title_for_path("/home", &en(), true).as_deref(), Some("<title>Home</title>"));
}

#[test]
fn test_name_lookups() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    assert_eq!(reg.title_for_name("footer", &en()).as_deref(), Some("<title>Footer</title>"));
    assert_eq!(
        &*reg.scripts_for_name("footer", &en()),
        [r#"<script type="text/javascript" src="/js/footer.js"></script>"#]
    );
    assert!(reg.links_for_name("footer", &en()).is_empty());
}

#[test]
fn test_messages_resolve_per_locale() {
    let dir = TempDir::new().unwrap();
    let catalog = MessageCatalog::new()
        .with("en", "home.title", "Welcome")
        .with("fr", "home.title", "Bienvenue");
    let reg = registry(&dir).with_messages(Arc::new(catalog));
    let file = write(dir.path(), "pages.json", r#"[{ "paths": ["/"], "title": "home.title" }]"#);
    reg.load_file(&file).unwrap();

    assert_eq!(reg.title_for_path("/", &en(), false).as_deref(), Some("<title>Welcome</title>"));
    // cached per locale, so the english entry does not leak
    assert_eq!(
        reg.title_for_path("/", &Locale::new("fr-CA"), false).as_deref(),
        Some("<title>Bienvenue</title>")
    );
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn test_cache_hit_matches_fresh_render() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    let fresh = Registry::new(dir.path());
    fresh.load_file(&dir.path().join(GLOBAL_FILE)).unwrap();
    fresh.load_file(&dir.path().join("pages.json")).unwrap();

    let first = reg.scripts_for_path("/home", &en(), true);
    let second = reg.scripts_for_path("/home", &en(), true);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second, fresh.scripts_for_path("/home", &en(), true));
}

#[test]
fn test_include_global_cached_separately() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    assert_eq!(reg.scripts_for_path("/home", &en(), true).len(), 3);
    assert_eq!(reg.scripts_for_path("/home", &en(), false).len(), 2);
}

#[test]
fn test_path_reload_evicts_only_its_targets() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    reg.scripts_for_path("/home", &en(), false);
    reg.scripts_for_path("/about", &en(), false);
    reg.scripts_for_name("footer", &en());
    assert_eq!(reg.cache().len(), 3);

    let other = write(dir.path(), "other.json", r#"[{ "paths": ["/home"], "scripts": ["/js/new.js"] }]"#);
    reg.load_file(&other).unwrap();
    assert_eq!(reg.cache().len(), 2);
    assert_eq!(
        &*reg.scripts_for_path("/home", &en(), false),
        [r#"<script type="text/javascript" src="/js/new.js"></script>"#]
    );
}

#[test]
fn test_global_alias_change_reaches_cached_path() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    let before = reg.scripts_for_path("/home", &en(), false);
    assert!(before[1].contains("jquery-3.7.1"));

    let global = dir.path().join(GLOBAL_FILE);
    fs::write(&global, r#"[{ "aliases": { "jquery": "/js/jquery-4.0.0.min.js" } }, { "title": "site" }]"#).unwrap();
    reg.load_file(&global).unwrap();
    // path bundles keep their substituted values until their file reloads
    reg.load_file(&dir.path().join("pages.json")).unwrap();

    let after = reg.scripts_for_path("/home", &en(), false);
    assert!(after[1].contains("jquery-4.0.0"));
}

#[test]
fn test_global_reload_clears_cache() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    reg.scripts_for_path("/home", &en(), true);
    reg.scripts_for_name("footer", &en());
    assert!(!reg.cache().is_empty());

    reg.load_file(&dir.path().join(GLOBAL_FILE)).unwrap();
    assert!(reg.cache().is_empty());
}

#[test]
fn test_caching_disabled_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let reg = Registry::new(dir.path());
    reg.load_file(&write(dir.path(), "pages.json", PAGES)).unwrap();

    reg.scripts_for_path("/home", &en(), true);
    reg.title_for_path("/home", &en(), true);
    assert!(reg.cache().is_empty());
}

#[test]
fn test_empty_results_not_cached() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    reg.links_for_path("/about", &en(), false);
    reg.title_for_path("/about", &en(), false);
    assert!(reg.cache().is_empty());
}

// ============================================================================
// Dynamic
// ============================================================================

#[test]
fn test_dynamic_lookups_bypass_cache() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);
    let items = vec![
        AssetItem::from("/js/extra.js"),
        AssetItem::from(AttrRecord::from_iter([("src", "/js/mod.js"), ("type", "module")])),
    ];

    let scripts = reg.dynamic_scripts(&items, &en());
    assert_eq!(
        scripts,
        vec![
            r#"<script type="text/javascript" src="/js/extra.js"></script>"#.to_string(),
            r#"<script type="module" src="/js/mod.js"></script>"#.to_string(),
        ]
    );
    assert!(reg.cache().is_empty());
    assert!(reg.dynamic_scripts(&[], &en()).is_empty());
}

#[test]
fn test_dynamic_links_render_as_links() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let items = vec![AssetItem::from(AttrRecord::from_iter([("rel", "icon"), ("href", "/favicon.ico")]))];

    assert_eq!(
        reg.dynamic_links(&items, &en()),
        vec![r#"<link rel="icon" href="/favicon.ico" />"#.to_string()]
    );
}

#[test]
fn test_dynamic_meta_drops_shorthand() {
    let dir = TempDir::new().unwrap();
    let reg = registry(&dir);
    let items = vec![
        AssetItem::from("ignored"),
        AssetItem::from(AttrRecord::from_iter([("name", "robots"), ("content", "noindex")])),
    ];

    assert_eq!(
        reg.dynamic_meta(&items, &en()),
        vec![r#"<meta name="robots" content="noindex" />"#.to_string()]
    );
    assert_eq!(reg.dynamic_title("Dyn", &en()).as_deref(), Some("<title>Dyn</title>"));
    assert!(reg.dynamic_title("  ", &en()).is_none());
}

#[test]
fn test_kind_generic_lookup_matches_specific() {
    let dir = TempDir::new().unwrap();
    let reg = load_all(&dir);

    assert_eq!(
        reg.tags_for_path(AssetKind::Links, "/home", &en(), true),
        reg.links_for_path("/home", &en(), true)
    );
}

#[test]
fn test_dynamic_embed_stays_under_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(dir.path().join("secret.txt"), "SECRET").unwrap();
    let reg = Registry::new(&root);
    let items = vec![AssetItem::from(AttrRecord::from_iter([("embed", "../secret.txt")]))];

    assert_eq!(reg.dynamic_scripts(&items, &en()), vec!["<script>\n\n</script>".to_string()]);
}
