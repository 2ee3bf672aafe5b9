use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tabmask_core::{FieldType, FieldTypeConfig, Value};
use tabmask_mask::generators::{GeneratorContext, GeneratorRegistry, MaskMode};
use tabmask_mask::{ColumnErrorKind, Locale};

#[test]
fn generator_ids_are_sorted_and_unique() {
    let registry = GeneratorRegistry::new();
    let ids = registry.generator_ids();
    assert_eq!(ids.len(), FieldType::ALL.len());

    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);
    assert!(ids.contains(&"Row Number"));
    assert!(ids.contains(&"State or Province"));
}

#[test]
fn every_preset_produces_text() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for locale in [Locale::EnUs, Locale::PtBr] {
        let registry = GeneratorRegistry::with_locale(locale);
        for field_type in FieldType::PRESETS {
            let value = registry
                .generate(field_type.as_str(), &mut rng)
                .expect("preset exists");
            assert!(!value.trim().is_empty(), "{field_type} in {locale}");
        }
    }
}

#[test]
fn lookup_is_case_insensitive_and_accepts_alias() {
    let registry = GeneratorRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(registry.generate("full name", &mut rng).is_ok());
    assert!(registry.generate("State/Province", &mut rng).is_ok());
}

#[test]
fn unknown_identifier_is_rejected() {
    let registry = GeneratorRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let result = registry.generate("Social Security Number", &mut rng);
    assert!(matches!(result, Err(ColumnErrorKind::UnknownFieldType(id)) if id == "Social Security Number"));
}

#[test]
fn empty_registry_rejects_presets() {
    let registry = GeneratorRegistry::empty(Locale::EnUs);
    assert!(matches!(
        registry.preset("Email"),
        Err(ColumnErrorKind::UnknownFieldType(_))
    ));
    assert!(registry.generator_ids().iter().all(|id| {
        FieldType::parse(id).is_some_and(|field_type| !field_type.is_preset())
    }));
}

#[test]
fn uuid_preset_is_canonical_and_distinct() {
    let registry = GeneratorRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let first = registry.generate("UUID", &mut rng).expect("uuid");
    let second = registry.generate("UUID", &mut rng).expect("uuid");
    for value in [&first, &second] {
        assert_eq!(value.len(), 36);
        assert_eq!(value.matches('-').count(), 4);
    }
    assert_ne!(first, second);
}

#[test]
fn build_validates_configuration() {
    let registry = GeneratorRegistry::new();

    let empty_list = registry.build(FieldType::CustomList, &FieldTypeConfig::new());
    assert!(matches!(
        empty_list,
        Err(ColumnErrorKind::EmptyConfigList { .. })
    ));

    let inverted = FieldTypeConfig::new().with("min", 10).with("max", 1);
    assert!(matches!(
        registry.build(FieldType::Number, &inverted),
        Err(ColumnErrorKind::InvalidRange { .. })
    ));

    let bad_date = FieldTypeConfig::new().with("start_date", "2020/01/01");
    assert!(matches!(
        registry.build(FieldType::Date, &bad_date),
        Err(ColumnErrorKind::InvalidDateFormat { .. })
    ));

    let reversed = FieldTypeConfig::new()
        .with("start_date", "2024-01-01")
        .with("end_date", "2023-01-01");
    assert!(matches!(
        registry.build(FieldType::Date, &reversed),
        Err(ColumnErrorKind::InvalidRange { .. })
    ));

    let bad_kind = FieldTypeConfig::new().with("uuid_type", "Serial");
    assert!(matches!(
        registry.build(FieldType::Uuid, &bad_kind),
        Err(ColumnErrorKind::InvalidConfigValue { .. })
    ));
}

#[test]
fn alphanumeric_codes_are_wrapped() {
    let registry = GeneratorRegistry::new();
    let config = FieldTypeConfig::new()
        .with("uuid_type", "Alphanumeric Code")
        .with("char_length", 6)
        .with("prefix", "ID-")
        .with("suffix", "-X");
    let mut generator = registry.build(FieldType::Uuid, &config).expect("valid");
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let ctx = GeneratorContext {
        mode: MaskMode::Independent,
        ordinal: 0,
    };
    let Value::Text(code) = generator.generate(&ctx, &mut rng) else {
        panic!("expected text");
    };
    assert!(code.starts_with("ID-"));
    assert!(code.ends_with("-X"));
    let core = &code[3..code.len() - 2];
    assert_eq!(core.len(), 6);
    assert!(core.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn dates_stay_within_configured_span() {
    let registry = GeneratorRegistry::new();
    let config = FieldTypeConfig::new()
        .with("start_date", "2021-02-27")
        .with("end_date", "2021-03-02");
    let mut generator = registry.build(FieldType::Date, &config).expect("valid");
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let low = chrono::NaiveDate::from_ymd_opt(2021, 2, 27).expect("date");
    let high = chrono::NaiveDate::from_ymd_opt(2021, 3, 2).expect("date");
    for ordinal in 0..500 {
        let ctx = GeneratorContext {
            mode: MaskMode::Independent,
            ordinal,
        };
        let date = generator
            .generate(&ctx, &mut rng)
            .as_date()
            .expect("date value");
        assert!(date >= low && date <= high);
    }
}
