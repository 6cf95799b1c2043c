//! Runtime overrides applied after loading.
//!
//! ```text
//! ConfigLoader.load()  →  AlmacenConfig (files + env)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()   ← CLI flags
//!                              │
//!                              ▼
//!                     AlmacenConfig (final)
//! ```

use super::AlmacenConfig;

/// Applies overrides to a loaded configuration.
///
/// Implementations should only touch the values they were given, leaving
/// everything else as loaded.
pub trait ConfigResolver {
    /// Applies overrides to `config`.
    fn apply(&self, config: &mut AlmacenConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OriginOverride(Option<String>);

    impl ConfigResolver for OriginOverride {
        fn apply(&self, config: &mut AlmacenConfig) {
            if let Some(origin) = &self.0 {
                config.storage.origin.clone_from(origin);
            }
        }
    }

    #[test]
    fn only_given_values_are_applied() {
        let mut config = AlmacenConfig::default();
        OriginOverride(None).apply(&mut config);
        assert_eq!(config, AlmacenConfig::default());

        OriginOverride(Some("tienda.example.com".into())).apply(&mut config);
        assert_eq!(config.storage.origin, "tienda.example.com");
    }
}
