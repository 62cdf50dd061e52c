use std::sync::OnceLock;

/// Process-wide configuration knobs.
///
/// The defaults are used unless [`set_core_config`] is called before the
/// first access. Individual constructors and I/O entry points accept
/// per-call options; this struct only provides their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Enable LRU eviction in delayed FST caches by default.
    pub cache_gc: bool,
    /// Byte budget above which a garbage-collected cache starts evicting.
    pub cache_gc_limit: u64,
    /// If false, symbol-table compatibility mismatches are downgraded to a
    /// warning instead of an error.
    pub compat_symbols: bool,
    /// Characters used to split fields of textual FST input.
    pub field_separator: String,
    /// Separator between the components of a composite weight in text form.
    pub pair_separator: String,
    /// Optional opening/closing characters wrapped around a composite
    /// weight in text form. Empty means none.
    pub pair_parentheses: String,
    /// Re-verify property bits against a fresh computation on every update
    /// (debug mode; contradictions are fatal).
    pub verify_properties: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            cache_gc: false,
            cache_gc_limit: 1 << 20,
            compat_symbols: true,
            field_separator: "\t ".to_string(),
            pair_separator: ",".to_string(),
            pair_parentheses: String::new(),
            verify_properties: false,
        }
    }
}

static CORE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Returns the process-wide configuration, initializing it with defaults on
/// first access.
pub fn core_config() -> &'static CoreConfig {
    CORE_CONFIG.get_or_init(CoreConfig::default)
}

/// Installs the process-wide configuration. Returns `false` if a
/// configuration was already installed (explicitly or by first use), in
/// which case the store is left untouched.
pub fn set_core_config(config: CoreConfig) -> bool {
    CORE_CONFIG.set(config).is_ok()
}
