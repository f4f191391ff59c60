use serde_json::{json, Value};
use tinct_customize::{SettingsAccessor, TokenDocumentPatcher};
use tinct_schema::{MemoryModStore, ModStore, SchemaRegistry, SchemaSource, TokenSchemaSource};
use tinct_tokens::{css_variables, MemoryTokenSource, Origin, TokenStore};

fn document() -> Value {
    json!({
        "settings": {
            "color": {"palette": [
                {"slug": "primary", "color": "#336699", "name": "Primary"},
                {"slug": "base", "color": "#ffffff", "name": "Base"}
            ]},
            "typography": {
                "fontFamilies": [
                    {"slug": "serif", "fontFamily": "Georgia, serif", "name": "Serif"},
                    {"slug": "sans", "fontFamily": "Inter, sans-serif", "name": "Sans"}
                ],
                "fontSizes": [
                    {"slug": "medium", "size": "1rem", "name": "Medium"},
                    {"slug": "large", "size": "1.5rem", "name": "Large"}
                ]
            },
            "custom": {
                "color": {"header": {"linkHover": "#0000ff"}},
                "font": {"body": {
                    "family": "var(--wp--preset--font-family--serif)",
                    "weight": 400,
                    "line-height": 1.6,
                    "size": "var(--wp--preset--font-size--medium)"
                }}
            }
        }
    })
}

fn setup() -> (TokenStore, SchemaRegistry) {
    let tokens = TokenStore::new(MemoryTokenSource::new().with_layer(Origin::Theme, document()));
    let derived = TokenSchemaSource::new();
    let sources: [&dyn SchemaSource; 1] = [&derived];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();
    (tokens, registry)
}

#[test]
fn untouched_settings_produce_no_patch() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    assert!(patch.is_empty());
}

#[test]
fn palette_override_produces_one_entry() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    SettingsAccessor::new(&registry, &mods)
        .set("colors_palette_primary", json!("#112233"))
        .unwrap();

    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    assert_eq!(patch.palette.len(), 1);
    assert_eq!(patch.palette["primary"].color, "#112233");
    assert_eq!(patch.palette["primary"].name, "Primary");
    assert!(patch.custom.is_empty());
}

#[test]
fn value_equal_to_default_is_not_a_change() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new().with("colors_palette_primary", json!("#336699"));
    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    assert!(patch.is_empty());
}

#[test]
fn patching_is_idempotent() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    let patcher = TokenDocumentPatcher::new(&registry, &tokens);
    assert_eq!(patcher.patch(&mods), patcher.patch(&mods));

    mods.set("typography_body_weight", json!("700")).unwrap();
    assert_eq!(patcher.patch(&mods), patcher.patch(&mods));
}

#[test]
fn font_overrides_use_raw_numbers_and_var_references() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    let settings = SettingsAccessor::new(&registry, &mods);
    settings.set("typography_body_weight", json!("700")).unwrap();
    settings.set("typography_body_line_height", json!(1.4)).unwrap();
    settings.set("typography_body_family", json!("sans")).unwrap();
    settings.set("typography_body_size", json!("large")).unwrap();

    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    let body = &patch.custom["font"]["body"];
    assert_eq!(body["weight"], json!(700));
    assert_eq!(body["line-height"], json!(1.4));
    assert_eq!(body["family"], json!("var(--wp--preset--font-family--sans)"));
    assert_eq!(body["size"], json!("var(--wp--preset--font-size--large)"));
}

#[test]
fn custom_colors_patch_the_original_key() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    SettingsAccessor::new(&registry, &mods)
        .set("colors_header_link_hover", json!("#ff0000"))
        .unwrap();

    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    assert_eq!(patch.custom["color"]["header"]["linkHover"], json!("#ff0000"));
}

#[test]
fn patched_document_drives_css_variables() {
    let (tokens, registry) = setup();
    let mods = MemoryModStore::new();
    let settings = SettingsAccessor::new(&registry, &mods);
    settings.set("colors_palette_primary", json!("#112233")).unwrap();
    settings.set("typography_body_weight", json!("700")).unwrap();

    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    let patched = patch.apply_to(&document());
    let vars = css_variables(&patched, "wp");

    assert_eq!(vars["--wp--preset--color--primary"], "#112233");
    assert_eq!(vars["--wp--preset--color--base"], "#ffffff");
    assert_eq!(vars["--wp--custom--font--body--weight"], "700");
    assert_eq!(vars["--wp--custom--font--body--line-height"], "1.6");
}

#[test]
fn camel_case_font_keys_keep_their_spelling() {
    let mut document = document();
    document["settings"]["custom"]["font"]["body"] = json!({
        "weight": 400,
        "lineHeight": 1.6
    });
    let tokens = TokenStore::new(MemoryTokenSource::new().with_layer(Origin::Theme, document.clone()));
    let derived = TokenSchemaSource::new();
    let sources: [&dyn SchemaSource; 1] = [&derived];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();
    assert_eq!(
        registry.get_theme_mod_default("typography_body_line_height"),
        json!(1.6)
    );

    let mods = MemoryModStore::new();
    SettingsAccessor::new(&registry, &mods)
        .set("typography_body_line_height", json!(1.8))
        .unwrap();
    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    let patched = patch.apply_to(&document);

    let body = patched["settings"]["custom"]["font"]["body"].as_object().unwrap();
    assert_eq!(body["lineHeight"], json!(1.8));
    assert!(!body.contains_key("line-height"));
    let vars = css_variables(&patched, "wp");
    assert_eq!(vars["--wp--custom--font--body--line-height"], "1.8");
}

#[test]
fn uppercase_token_color_saved_back_is_not_an_override() {
    let mut document = document();
    document["settings"]["color"]["palette"][1]["color"] = json!("#FFFFFF");
    let tokens = TokenStore::new(MemoryTokenSource::new().with_layer(Origin::Theme, document));
    let derived = TokenSchemaSource::new();
    let sources: [&dyn SchemaSource; 1] = [&derived];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();

    let mods = MemoryModStore::new();
    let settings = SettingsAccessor::new(&registry, &mods);
    let stored = settings.set("colors_palette_base", json!("#FFFFFF")).unwrap();
    assert_eq!(stored, json!("#ffffff"));

    assert!(!settings.is_overridden("colors_palette_base"));
    assert!(TokenDocumentPatcher::new(&registry, &tokens).patch(&mods).is_empty());

    settings.set("colors_palette_base", json!("#FFFFFE")).unwrap();
    assert!(settings.is_overridden("colors_palette_base"));
    let patch = TokenDocumentPatcher::new(&registry, &tokens).patch(&mods);
    assert_eq!(patch.palette["base"].color, "#fffffe");
}

#[test]
fn custom_origin_keys_resolve_through_the_configured_origin() {
    let tokens = TokenStore::new(
        MemoryTokenSource::new()
            .with_layer(Origin::Theme, document())
            .with_layer(
                Origin::Custom,
                json!({"settings": {"custom": {"color": {"footer": {"linkColor": "#00ff00"}}}}}),
            ),
    );
    let derived = TokenSchemaSource::new().origin(Origin::Custom);
    let sources: [&dyn SchemaSource; 1] = [&derived];
    let registry = SchemaRegistry::build(&tokens, &sources).unwrap();

    let mods = MemoryModStore::new();
    SettingsAccessor::new(&registry, &mods)
        .set("colors_footer_link_color", json!("#ff0000"))
        .unwrap();

    let patch = TokenDocumentPatcher::new(&registry, &tokens)
        .origin(Origin::Custom)
        .patch(&mods);
    let footer = patch.custom["color"]["footer"].as_object().unwrap();
    assert_eq!(footer["linkColor"], json!("#ff0000"));
    assert!(!footer.contains_key("link-color"));
}
