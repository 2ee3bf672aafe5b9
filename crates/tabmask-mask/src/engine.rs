use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use tabmask_core::{Column, ColumnRule, Dataset, FieldType, RuleSet, Value};

use crate::blanks::blank_plan;
use crate::errors::{ColumnErrorKind, MaskError};
use crate::generators::{Generator, GeneratorContext, GeneratorRegistry, MaskMode};
use crate::mapping::{ValueMapping, distinct_values};
use crate::model::{
    ColumnFailure, ColumnReport, ColumnStatus, MaskOptions, MaskOutput, MaskReport,
    OnColumnError, OperationLog,
};

/// Entry point for masking a dataset against per-column rules.
#[derive(Debug, Clone)]
pub struct MaskingEngine {
    options: MaskOptions,
    registry: GeneratorRegistry,
}

struct MaskedColumn {
    field_type: FieldType,
    values: Vec<Value>,
    units: usize,
    blanks: usize,
}

impl MaskingEngine {
    pub fn new(options: MaskOptions) -> Self {
        let registry = GeneratorRegistry::with_locale(options.locale);
        Self { options, registry }
    }

    pub fn with_registry(options: MaskOptions, registry: GeneratorRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &MaskOptions {
        &self.options
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Produce a masked copy of `dataset`.
    ///
    /// The source dataset is never modified. Columns are processed in order;
    /// each selected column draws from its own random stream derived from the
    /// run seed, so adding or removing a column leaves the others unchanged.
    pub fn mask(&self, dataset: &Dataset, rules: &RuleSet) -> Result<MaskOutput, MaskError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let mode = if self.options.keep_mapping {
            MaskMode::Mapped
        } else {
            MaskMode::Independent
        };

        let mut log = OperationLog::new();
        let mut report = MaskReport::new(run_id.clone(), &self.options, seed);
        let mut failures = Vec::new();
        let mut columns = Vec::with_capacity(dataset.width());

        info!(
            run_id = %run_id,
            columns = dataset.width(),
            rows = dataset.row_count(),
            keep_mapping = self.options.keep_mapping,
            seed,
            "masking started"
        );

        for column in dataset.columns() {
            let name = column.name.as_str();
            let Some(rule) = rules.get(name) else {
                debug!(column = %name, "no rule for column");
                report.columns.push(pass_through_report(column, None));
                columns.push(column.clone());
                continue;
            };

            if !rule.selected {
                log.push(format!("Column '{name}' was not selected for masking."));
                info!(column = %name, "column not selected");
                report
                    .columns
                    .push(pass_through_report(column, Some(rule.field_type.to_string())));
                columns.push(column.clone());
                continue;
            }

            match self.mask_column(column, rule, mode, seed) {
                Ok(masked) => {
                    log.push(format!(
                        "Masked column '{name}' with fake data ({}) and {:?}% blanks.",
                        masked.field_type,
                        rule.blank_percent * 100.0
                    ));
                    info!(
                        column = %name,
                        field_type = %masked.field_type,
                        units = masked.units,
                        blanks = masked.blanks,
                        "column masked"
                    );
                    report.columns.push(ColumnReport {
                        column: name.to_string(),
                        field_type: Some(masked.field_type.to_string()),
                        status: ColumnStatus::Masked,
                        rows: column.len(),
                        units: masked.units,
                        blanks: masked.blanks,
                    });
                    columns.push(Column::new(name, masked.values));
                }
                Err(kind) => match self.options.on_error {
                    OnColumnError::Abort => {
                        warn!(run_id = %run_id, column = %name, error = %kind, "masking failed");
                        return Err(MaskError::column(name, kind));
                    }
                    OnColumnError::Skip => {
                        warn!(column = %name, error = %kind, "column left unchanged");
                        log.push(format!(
                            "Column '{name}' could not be masked ({kind}); left unchanged."
                        ));
                        report.columns.push(ColumnReport {
                            status: ColumnStatus::Failed,
                            ..pass_through_report(column, Some(rule.field_type.to_string()))
                        });
                        failures.push(ColumnFailure {
                            column: name.to_string(),
                            kind,
                        });
                        columns.push(column.clone());
                    }
                },
            }
        }

        for (name, _) in rules.iter() {
            if dataset.column(name).is_none() {
                log.push(format!("Column '{name}' not found in dataset; rule ignored."));
                warn!(column = %name, "rule names a column missing from the dataset");
                report.ignored_rules.push(name.to_string());
            }
        }

        let dataset = Dataset::new(columns)?;
        info!(
            run_id = %run_id,
            masked = report.masked_columns(),
            failed = failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "masking completed"
        );

        Ok(MaskOutput {
            dataset,
            log,
            report,
            failures,
        })
    }

    fn mask_column(
        &self,
        column: &Column,
        rule: &ColumnRule,
        mode: MaskMode,
        seed: u64,
    ) -> Result<MaskedColumn, ColumnErrorKind> {
        let rate = rule.blank_percent;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(ColumnErrorKind::InvalidBlankPercent(rate));
        }
        let field_type = rule
            .field_type
            .resolve()
            .ok_or_else(|| ColumnErrorKind::UnknownFieldType(rule.field_type.to_string()))?;
        let mut generator = self.registry.build(field_type, &rule.config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, &column.name));

        let (values, units, blanks) = match mode {
            MaskMode::Mapped => {
                let distinct = distinct_values(&column.values);
                let plan = blank_plan(distinct.len(), rate, self.options.blank_sampling, &mut rng);
                let mut mapping = ValueMapping::new();
                for (ordinal, (original, blank)) in distinct.iter().zip(&plan).enumerate() {
                    let substitute = if *blank {
                        Value::Null
                    } else {
                        let ctx = GeneratorContext { mode, ordinal };
                        generator.generate(&ctx, &mut rng)
                    };
                    mapping.insert(original, substitute);
                }
                let blanks = plan.iter().filter(|blank| **blank).count();
                (mapping.apply(&column.values), distinct.len(), blanks)
            }
            MaskMode::Independent => {
                let plan = blank_plan(column.len(), rate, self.options.blank_sampling, &mut rng);
                let values = plan
                    .iter()
                    .enumerate()
                    .map(|(ordinal, blank)| {
                        if *blank {
                            Value::Null
                        } else {
                            let ctx = GeneratorContext { mode, ordinal };
                            generator.generate(&ctx, &mut rng)
                        }
                    })
                    .collect::<Vec<_>>();
                let blanks = plan.iter().filter(|blank| **blank).count();
                (values, column.len(), blanks)
            }
        };

        Ok(MaskedColumn {
            field_type: generator.field_type(),
            values,
            units,
            blanks,
        })
    }
}

/// Mask `dataset` with default options.
pub fn mask(
    dataset: &Dataset,
    rules: &RuleSet,
    keep_mapping: bool,
) -> Result<MaskOutput, MaskError> {
    let options = MaskOptions {
        keep_mapping,
        ..MaskOptions::default()
    };
    MaskingEngine::new(options).mask(dataset, rules)
}

fn pass_through_report(column: &Column, field_type: Option<String>) -> ColumnReport {
    ColumnReport {
        column: column.name.clone(),
        field_type,
        status: ColumnStatus::NotSelected,
        rows: column.len(),
        units: 0,
        blanks: 0,
    }
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_seeds_differ_by_name() {
        assert_ne!(hash_seed(7, "Name"), hash_seed(7, "City"));
        assert_eq!(hash_seed(7, "Name"), hash_seed(7, "Name"));
    }
}
