use std::collections::BTreeMap;

use rand::RngCore;

use tabmask_core::{FieldType, FieldTypeConfig, Value};

use crate::errors::ColumnErrorKind;
use crate::faker::Locale;

pub mod presets;
pub mod primitives;

pub use presets::PresetGenerator;
pub use primitives::{
    CustomListGenerator, DateRangeGenerator, NumberGenerator, RowNumberGenerator,
    UuidGenerator,
};

/// How substitutes are assigned to a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskMode {
    /// One substitute per distinct original value.
    Mapped,
    /// One substitute per row.
    Independent,
}

/// Position of the value being produced.
///
/// `ordinal` is the index of the distinct original value (in order of first
/// appearance) in mapped mode, or the row index in independent mode.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorContext {
    pub mode: MaskMode,
    pub ordinal: usize,
}

/// Produces substitute values for a single column during one run.
///
/// Configuration is validated when the generator is built, so producing a
/// value cannot fail.
pub trait Generator {
    fn field_type(&self) -> FieldType;

    fn generate(&mut self, ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value;
}

/// Zero-argument preset producer (locale and randomness aside).
pub type PresetFn = fn(Locale, &mut dyn RngCore) -> String;

/// Registry of preset generators keyed by field type.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    presets: BTreeMap<FieldType, PresetFn>,
    locale: Locale,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::with_locale(Locale::default())
    }

    pub fn with_locale(locale: Locale) -> Self {
        let mut registry = Self {
            presets: BTreeMap::new(),
            locale,
        };
        presets::register(&mut registry);
        registry
    }

    /// An empty registry; presets must be registered explicitly.
    pub fn empty(locale: Locale) -> Self {
        Self {
            presets: BTreeMap::new(),
            locale,
        }
    }

    pub fn register_preset(&mut self, field_type: FieldType, preset: PresetFn) {
        self.presets.insert(field_type, preset);
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a preset by catalog identifier.
    pub fn preset(&self, id: &str) -> Result<PresetGenerator, ColumnErrorKind> {
        let field_type = FieldType::parse(id)
            .ok_or_else(|| ColumnErrorKind::UnknownFieldType(id.to_string()))?;
        self.preset_for(field_type)
    }

    fn preset_for(&self, field_type: FieldType) -> Result<PresetGenerator, ColumnErrorKind> {
        let preset = self
            .presets
            .get(&field_type)
            .copied()
            .ok_or_else(|| ColumnErrorKind::UnknownFieldType(field_type.as_str().to_string()))?;
        Ok(PresetGenerator::new(field_type, self.locale, preset))
    }

    /// Produce one preset value for the identifier.
    pub fn generate(&self, id: &str, rng: &mut dyn RngCore) -> Result<String, ColumnErrorKind> {
        let preset = self.preset(id)?;
        Ok(preset.produce(rng))
    }

    /// Identifiers of every field type this registry can build, sorted.
    pub fn generator_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = FieldType::ALL
            .iter()
            .filter(|field_type| !field_type.is_preset() || self.presets.contains_key(field_type))
            .map(|field_type| field_type.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Build the column generator for a field type and its configuration.
    ///
    /// Configuration is validated and defaulted here; errors are scoped to
    /// the column being built.
    pub fn build(
        &self,
        field_type: FieldType,
        config: &FieldTypeConfig,
    ) -> Result<Box<dyn Generator>, ColumnErrorKind> {
        let generator: Box<dyn Generator> = match field_type {
            FieldType::Uuid => Box::new(UuidGenerator::from_config(config)?),
            FieldType::RowNumber => Box::new(RowNumberGenerator::from_config(config)?),
            FieldType::CustomList => Box::new(CustomListGenerator::from_config(config)?),
            FieldType::Number => Box::new(NumberGenerator::from_config(config)?),
            FieldType::Date => Box::new(DateRangeGenerator::from_config(config)?),
            preset => Box::new(self.preset_for(preset)?),
        };
        Ok(generator)
    }
}
