use serde_json::json;
use std::fs;
use tinct_schema::{
    JsonFileModStore, MemoryModStore, ModStore, NamespacedStore, SchemaRegistry, SchemaSource,
    SettingType, StaticSchemaSource, TokenSchemaSource,
};
use tinct_tokens::{DirTokenSource, MemoryTokenSource, Origin, TokenStore};

fn theme_tokens() -> TokenStore {
    TokenStore::new(MemoryTokenSource::new().with_layer(
        Origin::Theme,
        json!({
            "settings": {
                "color": {"palette": [
                    {"slug": "primary", "color": "#336699", "name": "Primary"}
                ]},
                "typography": {
                    "fontFamilies": [{"slug": "serif", "fontFamily": "Georgia, serif"}],
                    "fontSizes": [{"slug": "medium", "size": "1rem"}]
                },
                "custom": {"font": {"body": {
                    "family": "var(--wp--preset--font-family--serif)",
                    "weight": 400,
                    "line-height": 1.6,
                    "size": "var(--wp--preset--font-size--medium)"
                }}}
            }
        }),
    ))
}

fn registry(tokens: &TokenStore) -> SchemaRegistry {
    let builtin = StaticSchemaSource::builtin().unwrap();
    let derived = TokenSchemaSource::new();
    let sources: [&dyn SchemaSource; 2] = [&builtin, &derived];
    SchemaRegistry::build(tokens, &sources).unwrap()
}

#[test]
fn static_and_token_settings_share_one_schema() {
    let tokens = theme_tokens();
    let registry = registry(&tokens);
    let schema = registry.get();

    assert!(schema.group("header").is_some());
    assert!(schema.group("colors").is_some());
    assert!(schema.group("typography").is_some());
    assert_eq!(
        schema.lookup("typography_body_weight").unwrap().kind,
        SettingType::Select
    );
}

#[test]
fn archive_view_defaults_to_excerpt() {
    let tokens = theme_tokens();
    let registry = registry(&tokens);
    let mods = MemoryModStore::new();
    assert_eq!(
        registry.get_theme_mod("display_archive_view", &mods),
        json!("excerpt")
    );
}

#[test]
fn static_overrides_win_over_derived_defaults() {
    let tokens = theme_tokens();
    let derived = TokenSchemaSource::new();
    let overrides = StaticSchemaSource::from_yaml(
        "overrides",
        "colors:\n  settings:\n    palette_primary:\n      label: Brand\n",
    )
    .unwrap();
    let sources: [&dyn SchemaSource; 2] = [&derived, &overrides];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();

    let primary = registry.definition("colors_palette_primary").unwrap();
    assert_eq!(primary.label, "Brand");
    assert_eq!(primary.default, Some(json!("#336699")));
    assert_eq!(primary.kind, SettingType::Color);
}

#[test]
fn tokens_from_directory_with_file_backed_mods() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.json"),
        r##"{"settings": {"color": {"palette": [{"slug": "base", "color": "#ffffff"}]}}}"##,
    )
    .unwrap();
    fs::write(
        dir.path().join("theme.yaml"),
        "settings:\n  color:\n    palette:\n      - slug: base\n        color: \"#fafafa\"\n",
    )
    .unwrap();

    let tokens = TokenStore::new(DirTokenSource::new(dir.path()));
    let derived = TokenSchemaSource::new();
    let sources: [&dyn SchemaSource; 1] = [&derived];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();
    assert_eq!(
        registry.get_theme_mod_default("colors_palette_base"),
        json!("#fafafa")
    );

    let mods = NamespacedStore::new(
        "tinct",
        JsonFileModStore::open(dir.path().join("mods.json")).unwrap(),
    );
    mods.set("colors_palette_base", json!("#000000")).unwrap();
    assert_eq!(
        registry.get_theme_mod("colors_palette_base", &mods),
        json!("#000000")
    );

    let persisted = fs::read_to_string(dir.path().join("mods.json")).unwrap();
    assert!(persisted.contains("tinct_colors_palette_base"));
}
