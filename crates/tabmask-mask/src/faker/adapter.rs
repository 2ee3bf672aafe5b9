use fake::Fake;
use fake::faker::address::raw::{
    BuildingNumber, CityName, CountryName, StateAbbr, StateName, StreetName, ZipCode,
};
use fake::faker::company::raw::{CatchPhrase, CompanyName};
use fake::faker::internet::raw::SafeEmail;
use fake::faker::job::raw::Title;
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, PT_BR};
use rand::RngCore;

use tabmask_core::FieldType;

use crate::faker::locales::Locale;
use crate::generators::primitives::random_uuid;

/// Bridge between the preset catalog and the `fake` templates.
pub struct FakeRsAdapter;

macro_rules! preset_value {
    ($field_type:expr, $locale:expr, $rng:expr) => {{
        let rng: &mut dyn RngCore = $rng;
        match $field_type {
            FieldType::Name => Some(Name($locale).fake_with_rng::<String, _>(rng)),
            FieldType::FullName => {
                let first: String = FirstName($locale).fake_with_rng(&mut *rng);
                let last: String = LastName($locale).fake_with_rng(&mut *rng);
                Some(format!("{first} {last}"))
            }
            FieldType::Address => {
                let number: String = BuildingNumber($locale).fake_with_rng(&mut *rng);
                let street: String = StreetName($locale).fake_with_rng(&mut *rng);
                let city: String = CityName($locale).fake_with_rng(&mut *rng);
                let state: String = StateAbbr($locale).fake_with_rng(&mut *rng);
                let zip: String = ZipCode($locale).fake_with_rng(&mut *rng);
                Some(format!("{number} {street}, {city}, {state} {zip}"))
            }
            FieldType::Phone => Some(PhoneNumber($locale).fake_with_rng::<String, _>(rng)),
            FieldType::Email => Some(SafeEmail($locale).fake_with_rng::<String, _>(rng)),
            FieldType::Uuid => Some(random_uuid(rng)),
            FieldType::Company => Some(CompanyName($locale).fake_with_rng::<String, _>(rng)),
            FieldType::Department => Some(Title($locale).fake_with_rng::<String, _>(rng)),
            FieldType::City => Some(CityName($locale).fake_with_rng::<String, _>(rng)),
            FieldType::Country => Some(CountryName($locale).fake_with_rng::<String, _>(rng)),
            FieldType::ZipCode => Some(ZipCode($locale).fake_with_rng::<String, _>(rng)),
            FieldType::ProductName => Some(CatchPhrase($locale).fake_with_rng::<String, _>(rng)),
            FieldType::StateOrProvince => {
                Some(StateName($locale).fake_with_rng::<String, _>(rng))
            }
            FieldType::RowNumber | FieldType::CustomList | FieldType::Number | FieldType::Date => {
                None
            }
        }
    }};
}

impl FakeRsAdapter {
    /// Produce one preset value, or `None` when the field type is not a preset.
    pub fn generate_value(
        field_type: FieldType,
        locale: Locale,
        rng: &mut dyn RngCore,
    ) -> Option<String> {
        match locale {
            Locale::EnUs => preset_value!(field_type, EN, rng),
            Locale::PtBr => preset_value!(field_type, PT_BR, rng),
        }
    }
}
