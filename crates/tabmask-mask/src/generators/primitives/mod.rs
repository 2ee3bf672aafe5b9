use chrono::NaiveDate;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use tabmask_core::{FieldType, FieldTypeConfig, Value};

use crate::errors::ColumnErrorKind;
use crate::generators::{Generator, GeneratorContext, MaskMode};
use crate::params::{ParamKind, ParamSpec, validate_params};

const DEFAULT_NUMBER_MIN: f64 = 0.0;
const DEFAULT_NUMBER_MAX: f64 = 1.0;
const DEFAULT_START_DATE: &str = "2020-01-01";
const DEFAULT_END_DATE: &str = "2023-12-31";
const DEFAULT_CHAR_LENGTH: i64 = 8;
const DEFAULT_ROW_PREFIX: &str = "ROW-";
const ROW_NUMBER_WIDTH: usize = 4;

const NUMBER_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Number),
    ParamSpec::new("max", ParamKind::Number),
    ParamSpec::new("is_integer", ParamKind::Bool),
];
const DATE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("start_date", ParamKind::Date),
    ParamSpec::new("end_date", ParamKind::Date),
];
const UUID_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("prefix", ParamKind::String),
    ParamSpec::new("suffix", ParamKind::String),
    ParamSpec::new("uuid_type", ParamKind::String),
    ParamSpec::new("char_length", ParamKind::Int),
];
const ROW_NUMBER_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("prefix", ParamKind::String),
    ParamSpec::new("suffix", ParamKind::String),
    ParamSpec::new("start", ParamKind::Int),
];
const CUSTOM_LIST_PARAMS: &[ParamSpec] = &[ParamSpec::new("values", ParamKind::List)];

/// Random version 4 UUID drawn from the supplied generator.
pub fn random_uuid(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Random ASCII alphanumeric string of exactly `len` characters.
pub fn random_alphanumeric(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Bounded integer or two-decimal float.
#[derive(Debug, Clone)]
pub struct NumberGenerator {
    range: NumberRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberRange {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
}

impl NumberGenerator {
    pub fn from_config(config: &FieldTypeConfig) -> Result<Self, ColumnErrorKind> {
        let params = validate_params(config, NUMBER_PARAMS, FieldType::Number)?;
        let min = params.get_f64("min").unwrap_or(DEFAULT_NUMBER_MIN);
        let max = params.get_f64("max").unwrap_or(DEFAULT_NUMBER_MAX);
        if max < min {
            return Err(ColumnErrorKind::InvalidRange {
                field_type: FieldType::Number,
                reason: format!("max ({max}) must be >= min ({min})"),
            });
        }
        if !(max - min).is_finite() {
            return Err(ColumnErrorKind::InvalidRange {
                field_type: FieldType::Number,
                reason: format!("span between {min} and {max} is too large"),
            });
        }

        let range = if params.get_bool("is_integer").unwrap_or(false) {
            let low = min.ceil() as i64;
            let high = max.floor() as i64;
            if high < low {
                return Err(ColumnErrorKind::InvalidRange {
                    field_type: FieldType::Number,
                    reason: format!("no integer between {min} and {max}"),
                });
            }
            NumberRange::Integer {
                min: low,
                max: high,
            }
        } else {
            NumberRange::Float { min, max }
        };

        Ok(Self { range })
    }
}

impl Generator for NumberGenerator {
    fn field_type(&self) -> FieldType {
        FieldType::Number
    }

    fn generate(&mut self, _ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value {
        match self.range {
            NumberRange::Integer { min, max } => Value::Int(rng.random_range(min..=max)),
            NumberRange::Float { min, max } => {
                let value: f64 = rng.random_range(min..=max);
                let rounded = ((value * 100.0).round() / 100.0).clamp(min, max);
                Value::Float(rounded)
            }
        }
    }
}

/// Uniform calendar date within an inclusive range.
#[derive(Debug, Clone)]
pub struct DateRangeGenerator {
    start: NaiveDate,
    span_days: i64,
}

impl DateRangeGenerator {
    pub fn from_config(config: &FieldTypeConfig) -> Result<Self, ColumnErrorKind> {
        let params = validate_params(config, DATE_PARAMS, FieldType::Date)?;
        let start = params.get_date("start_date", DEFAULT_START_DATE)?;
        let end = params.get_date("end_date", DEFAULT_END_DATE)?;
        Self::new(start, end)
    }

    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ColumnErrorKind> {
        if end < start {
            return Err(ColumnErrorKind::InvalidRange {
                field_type: FieldType::Date,
                reason: format!("end_date ({end}) must not precede start_date ({start})"),
            });
        }
        Ok(Self {
            start,
            span_days: (end - start).num_days(),
        })
    }

    pub fn next_date(&self, rng: &mut dyn RngCore) -> NaiveDate {
        let offset = rng.random_range(0..=self.span_days);
        self.start + chrono::Duration::days(offset)
    }
}

impl Generator for DateRangeGenerator {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn generate(&mut self, _ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value {
        Value::Date(self.next_date(rng))
    }
}

/// Identifier flavour produced by [`UuidGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdKind {
    Uuid,
    Alphanumeric { len: usize },
}

/// Prefixed/suffixed UUID or alphanumeric code.
#[derive(Debug, Clone)]
pub struct UuidGenerator {
    prefix: String,
    suffix: String,
    kind: IdKind,
}

impl UuidGenerator {
    pub fn from_config(config: &FieldTypeConfig) -> Result<Self, ColumnErrorKind> {
        let params = validate_params(config, UUID_PARAMS, FieldType::Uuid)?;
        let prefix = params.get_str("prefix").unwrap_or_default().to_string();
        let suffix = params.get_str("suffix").unwrap_or_default().to_string();
        let uuid_type = params.get_str("uuid_type").unwrap_or("UUID");

        let kind = if uuid_type.eq_ignore_ascii_case("UUID") {
            IdKind::Uuid
        } else if uuid_type.eq_ignore_ascii_case("Alphanumeric Code")
            || uuid_type.eq_ignore_ascii_case("Alphanumeric")
        {
            let len = params.get_i64("char_length").unwrap_or(DEFAULT_CHAR_LENGTH);
            if len < 1 {
                return Err(params.invalid("char_length", "must be at least 1"));
            }
            let len = usize::try_from(len)
                .map_err(|_| params.invalid("char_length", "too large"))?;
            IdKind::Alphanumeric { len }
        } else {
            return Err(params.invalid(
                "uuid_type",
                format!("expected 'UUID' or 'Alphanumeric Code', got '{uuid_type}'"),
            ));
        };

        Ok(Self {
            prefix,
            suffix,
            kind,
        })
    }
}

impl Generator for UuidGenerator {
    fn field_type(&self) -> FieldType {
        FieldType::Uuid
    }

    fn generate(&mut self, _ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value {
        let core = match self.kind {
            IdKind::Uuid => random_uuid(rng),
            IdKind::Alphanumeric { len } => random_alphanumeric(rng, len),
        };
        Value::Text(format!("{}{core}{}", self.prefix, self.suffix))
    }
}

/// Sequential, zero-padded row labels (`ROW-0001`, `ROW-0002`, ...).
///
/// The counter lives in the generator, so each column gets its own sequence
/// for the duration of a run.
#[derive(Debug, Clone)]
pub struct RowNumberGenerator {
    prefix: String,
    suffix: String,
    next: u64,
}

impl Default for RowNumberGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_PREFIX, "", 1)
    }
}

impl RowNumberGenerator {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            next: start,
        }
    }

    pub fn from_config(config: &FieldTypeConfig) -> Result<Self, ColumnErrorKind> {
        let params = validate_params(config, ROW_NUMBER_PARAMS, FieldType::RowNumber)?;
        let prefix = params.get_str("prefix").unwrap_or(DEFAULT_ROW_PREFIX);
        let suffix = params.get_str("suffix").unwrap_or_default();
        let start = params.get_i64("start").unwrap_or(1);
        let start =
            u64::try_from(start).map_err(|_| params.invalid("start", "must be >= 0"))?;
        Ok(Self::new(prefix, suffix, start))
    }

    /// Next label in the sequence.
    pub fn next_label(&mut self) -> String {
        let label = format!(
            "{}{:0width$}{}",
            self.prefix,
            self.next,
            self.suffix,
            width = ROW_NUMBER_WIDTH
        );
        self.next = self.next.saturating_add(1);
        label
    }
}

impl Generator for RowNumberGenerator {
    fn field_type(&self) -> FieldType {
        FieldType::RowNumber
    }

    fn generate(&mut self, _ctx: &GeneratorContext, _rng: &mut dyn RngCore) -> Value {
        Value::Text(self.next_label())
    }
}

/// Substitutes drawn from a fixed, caller-supplied list.
///
/// Mapped mode assigns list entries cyclically to distinct values in order of
/// first appearance; independent mode picks uniformly at random.
#[derive(Debug, Clone)]
pub struct CustomListGenerator {
    values: Vec<Value>,
}

impl CustomListGenerator {
    pub fn new(values: Vec<Value>) -> Result<Self, ColumnErrorKind> {
        if values.is_empty() {
            return Err(ColumnErrorKind::EmptyConfigList {
                field_type: FieldType::CustomList,
            });
        }
        Ok(Self { values })
    }

    pub fn from_config(config: &FieldTypeConfig) -> Result<Self, ColumnErrorKind> {
        let params = validate_params(config, CUSTOM_LIST_PARAMS, FieldType::CustomList)?;
        Self::new(params.get_list("values"))
    }
}

impl Generator for CustomListGenerator {
    fn field_type(&self) -> FieldType {
        FieldType::CustomList
    }

    fn generate(&mut self, ctx: &GeneratorContext, rng: &mut dyn RngCore) -> Value {
        match ctx.mode {
            MaskMode::Mapped => self.values[ctx.ordinal % self.values.len()].clone(),
            MaskMode::Independent => self.values.choose(rng).cloned().unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx(mode: MaskMode, ordinal: usize) -> GeneratorContext {
        GeneratorContext { mode, ordinal }
    }

    #[test]
    fn row_number_counts_from_one() {
        let mut generator = RowNumberGenerator::default();
        assert_eq!(generator.next_label(), "ROW-0001");
        assert_eq!(generator.next_label(), "ROW-0002");
        assert_eq!(generator.next_label(), "ROW-0003");
    }

    #[test]
    fn row_number_honours_prefix_suffix_and_start() {
        let config = FieldTypeConfig::new()
            .with("prefix", "Item-")
            .with("suffix", "-END")
            .with("start", 10);
        let mut generator = RowNumberGenerator::from_config(&config).expect("valid config");
        assert_eq!(generator.next_label(), "Item-0010-END");
        assert_eq!(generator.next_label(), "Item-0011-END");
    }

    #[test]
    fn row_number_keeps_counting_past_padding() {
        let mut generator = RowNumberGenerator::new("R", "", 9999);
        assert_eq!(generator.next_label(), "R9999");
        assert_eq!(generator.next_label(), "R10000");
    }

    #[test]
    fn custom_list_cycles_in_mapped_mode() {
        let mut generator =
            CustomListGenerator::new(vec![Value::from("a"), Value::from("b")]).expect("list");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picked: Vec<Value> = (0..5)
            .map(|ordinal| generator.generate(&ctx(MaskMode::Mapped, ordinal), &mut rng))
            .collect();
        assert_eq!(
            picked,
            vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("a"),
                Value::from("b"),
                Value::from("a"),
            ]
        );
    }

    #[test]
    fn number_integer_range_excludes_fractional_bounds() {
        let config = FieldTypeConfig::new()
            .with("min", 0.5)
            .with("max", 0.9)
            .with("is_integer", true);
        assert!(matches!(
            NumberGenerator::from_config(&config),
            Err(ColumnErrorKind::InvalidRange { .. })
        ));
    }

    #[test]
    fn number_range_wider_than_f64_is_rejected() {
        let config = FieldTypeConfig::new().with("min", -1e308).with("max", 1e308);
        assert!(matches!(
            NumberGenerator::from_config(&config),
            Err(ColumnErrorKind::InvalidRange {
                field_type: FieldType::Number,
                ..
            })
        ));
    }

    #[test]
    fn float_values_have_two_decimals() {
        let config = FieldTypeConfig::new().with("min", 1.0).with("max", 2.0);
        let mut generator = NumberGenerator::from_config(&config).expect("valid config");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for ordinal in 0..200 {
            let value = generator
                .generate(&ctx(MaskMode::Independent, ordinal), &mut rng)
                .as_f64()
                .expect("float");
            assert!((1.0..=2.0).contains(&value));
            assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn alphanumeric_has_exact_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let code = random_alphanumeric(&mut rng, 12);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
