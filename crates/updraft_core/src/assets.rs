//! Variant asset registry
//!
//! Built once at load from the list of asset keys the presentation layer
//! managed to load. Every variant resolves to itself, to its category's
//! canonical variant, or to nothing; fallbacks are logged here once rather
//! than on every spawn.

use std::collections::HashSet;

use crate::core::{AssetConfig, LifecycleError};
use crate::entity::{Category, Variant};

/// How a variant resolved against the loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The variant's own asset is present
    Native,
    /// Missing; the category's canonical variant stands in
    Fallback(Variant),
    /// Neither the variant nor the canonical variant is present
    Missing,
}

/// Validated variant to spawnable-variant mapping
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    resolutions: [Resolution; Variant::ALL.len()],
}

impl VariantRegistry {
    /// Registry where every variant asset is present
    pub fn all_available() -> Self {
        Self {
            resolutions: [Resolution::Native; Variant::ALL.len()],
        }
    }

    /// Build from the asset section of the configuration
    pub fn from_config(config: &AssetConfig) -> Result<Self, LifecycleError> {
        match &config.available {
            None => Ok(Self::all_available()),
            Some(keys) => Self::from_available(keys.iter().map(String::as_str), config.strict),
        }
    }

    /// Build from the keys of the assets that loaded
    ///
    /// With `strict`, a category whose canonical variant is missing fails
    /// construction; otherwise its unresolvable variants are abandoned at
    /// spawn time.
    pub fn from_available<'a>(
        keys: impl IntoIterator<Item = &'a str>,
        strict: bool,
    ) -> Result<Self, LifecycleError> {
        let loaded: HashSet<&str> = keys.into_iter().collect();
        for key in &loaded {
            if !Variant::ALL.iter().any(|variant| variant.asset_key() == *key) {
                log::warn!("Ignoring unknown asset key '{key}'");
            }
        }

        let mut resolutions = [Resolution::Missing; Variant::ALL.len()];
        for variant in Variant::ALL {
            let canonical = variant.category().canonical_variant();
            resolutions[variant as usize] = if loaded.contains(variant.asset_key()) {
                Resolution::Native
            } else if loaded.contains(canonical.asset_key()) {
                log::warn!("Asset for {variant} missing, falling back to {canonical}");
                Resolution::Fallback(canonical)
            } else {
                log::warn!("Asset for {variant} and its fallback {canonical} missing, variant disabled");
                Resolution::Missing
            };
        }

        for category in Category::ALL {
            let canonical = category.canonical_variant();
            if resolutions[canonical as usize] == Resolution::Missing {
                if strict {
                    return Err(LifecycleError::MissingCanonicalAsset { category });
                }
                log::warn!("Canonical asset for {category} missing");
            }
        }

        Ok(Self { resolutions })
    }

    /// How a variant resolved
    pub fn resolution(&self, variant: Variant) -> Resolution {
        self.resolutions[variant as usize]
    }

    /// Variant to actually spawn when `variant` is requested
    pub fn resolve(&self, variant: Variant) -> Option<Variant> {
        match self.resolution(variant) {
            Resolution::Native => Some(variant),
            Resolution::Fallback(canonical) => Some(canonical),
            Resolution::Missing => None,
        }
    }

    /// Variants whose own asset is present
    pub fn native_variants(&self) -> impl Iterator<Item = Variant> + '_ {
        Variant::ALL
            .into_iter()
            .filter(|variant| self.resolution(*variant) == Resolution::Native)
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::all_available()
    }
}
