//! The [`Tinct`] facade: one configured pipeline from token files to
//! settings, host registrations, patched tokens and CSS.

use serde_json::Value;
use tinct_customize::{
    BindReport, Capabilities, ControlHost, ResetEndpoint, ResetOutcome, SettingsAccessor,
    SettingsBinder, TokenDocumentPatcher, TokenPatch,
};
use tinct_preview::{Dom, PreviewClient, PreviewManifest};
use tinct_schema::{
    JsonFileModStore, ModStore, NamespacedStore, ResetTarget, SchemaRegistry,
    SettingsSchema, StaticSchemaSource, TokenSchemaSource,
};
use tinct_tokens::{css_variables, to_css, DirTokenSource, TokenSource, TokenStore};

use crate::config::TinctConfig;
use crate::error::Result;

/// Selector the generated stylesheet scopes its variables to.
pub const STYLESHEET_SELECTOR: &str = ":root";

/// A fully wired settings pipeline.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct::{MemoryModStore, MemoryTokenSource, Origin, Tinct, TinctConfig};
///
/// let tokens = MemoryTokenSource::new().with_layer(
///     Origin::Theme,
///     json!({"settings": {"color": {"palette": [
///         {"slug": "primary", "color": "#336699", "name": "Primary"}
///     ]}}}),
/// );
/// let tinct = Tinct::with_store(TinctConfig::default(), tokens, MemoryModStore::new()).unwrap();
///
/// tinct.set("colors_palette_primary", json!("#112233")).unwrap();
/// assert!(tinct.stylesheet().unwrap().contains("--wp--preset--color--primary: #112233;"));
/// ```
pub struct Tinct {
    config: TinctConfig,
    tokens: TokenStore,
    registry: SchemaRegistry,
    mods: Box<dyn ModStore>,
}

impl Tinct {
    /// Opens the token directory and mods file named by `config`.
    ///
    /// # Errors
    ///
    /// Fails if a token document, the settings file or the mods file exists
    /// but cannot be read or parsed.
    pub fn open(config: TinctConfig) -> Result<Self> {
        let source = DirTokenSource::new(&config.tokens_dir);
        let mods = NamespacedStore::new(
            config.mod_prefix.clone(),
            JsonFileModStore::open(&config.mods_file)?,
        );
        Self::with_store(config, source, mods)
    }

    /// Builds a pipeline over an explicit token source and mod store.
    pub fn with_store(
        config: TinctConfig,
        source: impl TokenSource + 'static,
        mods: impl ModStore + 'static,
    ) -> Result<Self> {
        let tokens = TokenStore::new(source).with_prefix(config.css_prefix.clone());
        // Surface broken token files here; lookups past this point absorb them.
        tokens.document(config.origin)?;

        let registry = build_registry(&config, &tokens)?;
        tracing::debug!(
            groups = registry.get().groups().len(),
            settings = registry.get().len(),
            "settings pipeline ready"
        );
        Ok(Self {
            config,
            tokens,
            registry,
            mods: Box::new(mods),
        })
    }

    pub fn config(&self) -> &TinctConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn schema(&self) -> &SettingsSchema {
        self.registry.get()
    }

    pub fn mods(&self) -> &dyn ModStore {
        self.mods.as_ref()
    }

    pub fn accessor(&self) -> SettingsAccessor<'_> {
        SettingsAccessor::new(&self.registry, self.mods.as_ref())
    }

    /// The effective value of a setting; `null` for unknown ids.
    pub fn get(&self, id: &str) -> Value {
        self.accessor().get(id)
    }

    /// Sanitizes and stores a value, returning what was stored.
    pub fn set(&self, id: &str, value: Value) -> Result<Value> {
        Ok(self.accessor().set(id, value)?)
    }

    /// Drops a stored override.
    pub fn reset(&self, id: &str) -> Result<()> {
        Ok(self.accessor().reset(id)?)
    }

    /// Clears every override of a reset group, if `caller` may.
    pub fn reset_group(
        &self,
        target: &ResetTarget,
        caller: &dyn Capabilities,
    ) -> Result<ResetOutcome> {
        Ok(ResetEndpoint::new(&self.registry, self.mods.as_ref()).handle(target, caller)?)
    }

    /// Registers sections, settings, controls and partials with `host`.
    pub fn bind(&self, host: &mut dyn ControlHost) -> BindReport {
        SettingsBinder::new(&self.registry)
            .prefix(self.config.mod_prefix.clone())
            .bind(host)
    }

    /// The token overrides implied by the stored values.
    pub fn patch(&self) -> TokenPatch {
        TokenDocumentPatcher::new(&self.registry, &self.tokens)
            .origin(self.config.origin)
            .patch(self.mods.as_ref())
    }

    /// The token document with overrides applied.
    pub fn patched_document(&self) -> Result<Value> {
        let document = self.tokens.document(self.config.origin)?;
        Ok(self.patch().apply_to(&document))
    }

    /// CSS custom properties for the patched document.
    pub fn stylesheet(&self) -> Result<String> {
        let document = self.patched_document()?;
        let vars = css_variables(&document, &self.config.css_prefix);
        Ok(to_css(&vars, STYLESHEET_SELECTOR))
    }

    /// A preview client seeded with the current values, every manifest
    /// binding and the token-derived CSS variable bindings, already applied
    /// to `dom`.
    pub fn preview_client<D: Dom>(&self, dom: D) -> Result<PreviewClient<D>> {
        let manifest = match &self.config.preview_manifest {
            Some(path) => PreviewManifest::from_file(path)?,
            None => PreviewManifest::builtin()?,
        }
        .with_token_bindings(self.schema(), &self.tokens);

        let mut client =
            PreviewClient::from_schema(dom, self.schema(), self.mods.as_ref()).with_manifest(manifest);
        let applied = client.apply_all();
        tracing::debug!(applied, "preview client ready");
        Ok(client)
    }
}

fn build_registry(config: &TinctConfig, tokens: &TokenStore) -> Result<SchemaRegistry> {
    let builtin = StaticSchemaSource::builtin()?;
    let mut derived = TokenSchemaSource::new().origin(config.origin);
    if let Some(categories) = &config.font_categories {
        derived = derived.font_categories(categories.iter().cloned());
    }

    let mut registry = SchemaRegistry::new();
    registry.add_source(&builtin, tokens)?;
    registry.add_source(&derived, tokens)?;
    if let Some(path) = &config.settings_file {
        let overrides = StaticSchemaSource::from_file(path)?;
        registry.add_source(&overrides, tokens)?;
    }
    Ok(registry)
}
