use rand::RngCore;

use tabmask_core::{FieldType, Value};

use crate::faker::{FakeRsAdapter, Locale};
use crate::generators::{Generator, GeneratorContext, GeneratorRegistry, PresetFn};

macro_rules! preset_fns {
    ($($name:ident => $field_type:expr),* $(,)?) => {
        $(
            fn $name(locale: Locale, rng: &mut dyn RngCore) -> String {
                FakeRsAdapter::generate_value($field_type, locale, rng).unwrap_or_default()
            }
        )*

        pub fn register(registry: &mut GeneratorRegistry) {
            $(registry.register_preset($field_type, $name);)*
        }
    };
}

preset_fns! {
    name => FieldType::Name,
    full_name => FieldType::FullName,
    address => FieldType::Address,
    phone => FieldType::Phone,
    email => FieldType::Email,
    uuid_v4 => FieldType::Uuid,
    company => FieldType::Company,
    department => FieldType::Department,
    city => FieldType::City,
    country => FieldType::Country,
    zip_code => FieldType::ZipCode,
    product_name => FieldType::ProductName,
    state_or_province => FieldType::StateOrProvince,
}

/// Registry-backed generator for a catalog preset.
#[derive(Debug, Clone, Copy)]
pub struct PresetGenerator {
    field_type: FieldType,
    locale: Locale,
    preset: PresetFn,
}

impl PresetGenerator {
    pub fn new(field_type: FieldType, locale: Locale, preset: PresetFn) -> Self {
        Self {
            field_type,
            locale,
            preset,
        }
    }

    pub fn produce(&self, rng: &mut dyn RngCore) -> String {
        (self.preset)(self.locale, rng)
    }
}

impl Generator for PresetGenerator {
    fn field_type(&self) -> FieldType {
        self.field_type
    }

    fn generate(&mut self, _ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value {
        Value::Text(self.produce(rng))
    }
}
