use crate::config::TaxonomyConfig;
use crate::dataset::Dataset;
use crate::error::TaxonomyResult;
use crate::fields::{merge_street, zip5};
use crate::mapper::CanonicalMapper;
use crate::observed::ObservedLabelSet;
use crate::orchestrator::FillEngine;
use crate::report::{count_values, distinct_sorted, ColumnReport, FillReport, StandardizeReport};
use crate::types::{ClassificationResult, RosterRecord};
use chrono::Utc;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Column the standardize pass writes canonical labels into.
pub const STANDARDIZED_COLUMN: &str = "NP_Type_Filled";

/// One timed pipeline step and the number of rows it touched.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub elapsed: Duration,
    pub rows: usize,
}

impl StepTiming {
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.rows as f64 / secs
        }
    }
}

/// Per-step wall time and row throughput, recorded only with `--profile`.
pub struct StepProfiler {
    enabled: bool,
    steps: Vec<StepTiming>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            steps: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, name: &str, rows: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let step = StepTiming {
            name: name.to_string(),
            elapsed: start.elapsed(),
            rows,
        };
        info!(
            "⏱️  {}: {}ms ({} rows)",
            step.name,
            step.elapsed.as_millis(),
            step.rows
        );
        self.steps.push(step);
        result
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.steps.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        for step in &self.steps {
            println!(
                "   {:.<35} {:>6}ms {:>8} rows {:>12.0} rows/s",
                step.name,
                step.elapsed.as_millis(),
                step.rows,
                step.rows_per_sec()
            );
        }
        let total: Duration = self.steps.iter().map(|s| s.elapsed).sum();
        println!("   {:.<35} {:>6}ms", "Total", total.as_millis());
    }
}

/// Column names for the standardize pass. Every step is skipped when its
/// column is absent.
#[derive(Debug, Clone)]
pub struct StandardizeColumns {
    pub specialty: String,
    pub zip: String,
    pub street1: String,
    pub street2: String,
}

impl Default for StandardizeColumns {
    fn default() -> Self {
        Self {
            specialty: "NP_Type".to_string(),
            zip: "ZIP".to_string(),
            street1: "Street1".to_string(),
            street2: "Street2".to_string(),
        }
    }
}

/// Runs the taxonomy stages over a whole dataset.
pub struct TaxonomyProcessor {
    engine: FillEngine,
    mapper: CanonicalMapper,
    profiler: StepProfiler,
}

impl TaxonomyProcessor {
    pub fn new() -> TaxonomyResult<Self> {
        Self::with_profiling(false)
    }

    pub fn with_profiling(enabled: bool) -> TaxonomyResult<Self> {
        Ok(Self {
            engine: FillEngine::new()?,
            mapper: CanonicalMapper::new()?,
            profiler: StepProfiler::new(enabled),
        })
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }

    pub fn mapper(&self) -> &CanonicalMapper {
        &self.mapper
    }

    /// Two-pass fill of the configured output column.
    ///
    /// Both input columns are resolved before anything runs. Pass 1 freezes
    /// the observed label set from the original specialty column; pass 2
    /// fills each row against that frozen set, so row order never changes a
    /// result and rows can be filled in parallel.
    pub fn fill_dataset(
        &mut self,
        dataset: &mut Dataset,
        config: &TaxonomyConfig,
    ) -> TaxonomyResult<FillReport> {
        let columns = &config.columns;
        let specialty_idx = dataset.require_column(&columns.specialty)?;
        let credentials_idx = dataset.require_column(&columns.credentials)?;

        let engine = &self.engine;
        let mapper = &self.mapper;
        let profiler = &mut self.profiler;

        let row_count = dataset.len();
        let observed = profiler.time_step("Pass 1: observed labels", row_count, || {
            ObservedLabelSet::collect(dataset.column(specialty_idx))
        });
        info!("🔎 Pass 1: {} distinct observed labels", observed.len());

        let records: Vec<RosterRecord> = (0..row_count)
            .map(|row| {
                RosterRecord::new(
                    dataset.cell(row, specialty_idx),
                    dataset.cell(row, credentials_idx),
                )
            })
            .collect();

        let results: Vec<ClassificationResult> = profiler.time_step("Pass 2: fill", row_count, || {
            let orchestrator = engine.orchestrator(&observed);
            if config.parallel {
                records.par_iter().map(|r| orchestrator.fill(r)).collect()
            } else {
                records.iter().map(|r| orchestrator.fill(r)).collect()
            }
        });

        let mut values: Vec<String> = results
            .iter()
            .map(|result| result.label().to_string())
            .collect();

        if config.canonicalize_output {
            values = profiler.time_step("Canonicalize output", row_count, || {
                values
                    .into_iter()
                    .map(|value| {
                        mapper
                            .canonicalize(&value)
                            .map(|label| label.into_string())
                            .unwrap_or(value)
                    })
                    .collect()
            });
        }

        let blank_values: Vec<&str> = results
            .iter()
            .zip(&values)
            .filter(|(result, _)| result.was_filled())
            .map(|(_, value)| value.as_str())
            .collect();
        let blank_specialty_rows = blank_values.len();
        let inferred_rows = results
            .iter()
            .filter(|r| matches!(r, ClassificationResult::Inferred { .. }))
            .count();
        let unmatched_rows = blank_specialty_rows - inferred_rows;
        info!(
            "✅ Pass 2: {} rows, {} blank ({} inferred, {} unmatched)",
            results.len(),
            blank_specialty_rows,
            inferred_rows,
            unmatched_rows
        );

        let report = FillReport {
            generated_at: Utc::now(),
            specialty_column: columns.specialty.clone(),
            credentials_column: columns.credentials.clone(),
            output_column: columns.output.clone(),
            total_rows: results.len(),
            blank_specialty_rows,
            inferred_rows,
            unmatched_rows,
            canonicalized: config.canonicalize_output,
            vocabulary: distinct_sorted(values.iter().map(String::as_str)),
            blank_counts: count_values(blank_values),
            counts: count_values(values.iter().map(String::as_str)),
            observed_labels: observed,
        };

        dataset.set_column(&columns.output, values.into_iter().map(Some).collect());
        Ok(report)
    }

    /// Canonicalize one column in place.
    pub fn canonicalize_column(
        &mut self,
        dataset: &mut Dataset,
        column: &str,
    ) -> TaxonomyResult<ColumnReport> {
        let index = dataset.require_column(column)?;
        let mapper = &self.mapper;

        let rows = dataset.len();
        let values = self.profiler.time_step("Canonicalize column", rows, || {
            canonicalize_values(mapper, dataset.column(index))
        });
        dataset.set_column(column, values);
        info!("✅ Canonicalized column '{column}'");

        Ok(ColumnReport::from_values(column, dataset.column(index)))
    }

    /// Field clean-up: ZIP codes, street merge, canonical specialty copy.
    pub fn standardize_dataset(
        &mut self,
        dataset: &mut Dataset,
        columns: &StandardizeColumns,
        config: &TaxonomyConfig,
    ) -> TaxonomyResult<StandardizeReport> {
        let zip_standardized = match dataset.column_index(&columns.zip) {
            Some(index) => {
                let zips = dataset
                    .column(index)
                    .map(|z| Some(zip5(z)).filter(|z| !z.is_empty()))
                    .collect();
                dataset.set_column(&columns.zip, zips);
                debug!("standardized ZIP column '{}'", columns.zip);
                true
            }
            None => false,
        };

        let streets_merged = match dataset.column_index(&columns.street1) {
            Some(first) => {
                let second = dataset.column_index(&columns.street2);
                let merged = (0..dataset.len())
                    .map(|row| {
                        let second = second.and_then(|c| dataset.cell(row, c));
                        Some(merge_street(dataset.cell(row, first), second, config))
                            .filter(|s| !s.is_empty())
                    })
                    .collect();
                dataset.set_column(&columns.street1, merged);
                dataset.drop_column(&columns.street2);
                debug!("merged '{}' into '{}'", columns.street2, columns.street1);
                true
            }
            None => false,
        };

        let Some(index) = dataset.column_index(&columns.specialty) else {
            dataset.set_column(STANDARDIZED_COLUMN, vec![None; dataset.len()]);
            return Ok(StandardizeReport {
                filled: ColumnReport::from_values(STANDARDIZED_COLUMN, vec![None; dataset.len()]),
                original_counts: None,
                changes: Vec::new(),
                zip_standardized,
                streets_merged,
            });
        };

        let originals: Vec<Option<String>> = dataset
            .column(index)
            .map(|v| v.map(str::to_string))
            .collect();
        let mapper = &self.mapper;
        let rows = originals.len();
        let filled = self.profiler.time_step("Canonicalize specialty", rows, || {
            canonicalize_values(mapper, originals.iter().map(|v| v.as_deref()))
        });

        let original_text: Vec<&str> = originals
            .iter()
            .map(|v| v.as_deref().unwrap_or(""))
            .collect();
        let filled_text: Vec<&str> = filled
            .iter()
            .map(|v| v.as_deref().unwrap_or(""))
            .collect();

        let report = StandardizeReport {
            filled: ColumnReport::from_values(
                STANDARDIZED_COLUMN,
                filled.iter().map(|v| v.as_deref()),
            ),
            original_counts: Some(count_values(
                originals.iter().map(|v| v.as_deref().map(str::trim).unwrap_or("")),
            )),
            changes: StandardizeReport::top_changes(
                original_text.iter().copied().zip(filled_text.iter().copied()),
                config.report.top_changes,
            ),
            zip_standardized,
            streets_merged,
        };

        dataset.set_column(&format!("{}_original", columns.specialty), originals);
        dataset.set_column(STANDARDIZED_COLUMN, filled);
        info!(
            "✅ Standardized {} rows ({} distinct labels)",
            dataset.len(),
            report.filled.vocabulary.len()
        );
        Ok(report)
    }

    pub fn summarize_column(
        &self,
        dataset: &Dataset,
        column: &str,
    ) -> TaxonomyResult<ColumnReport> {
        let index = dataset.require_column(column)?;
        Ok(ColumnReport::from_values(column, dataset.column(index)))
    }
}

fn canonicalize_values<'a, I>(mapper: &CanonicalMapper, values: I) -> Vec<Option<String>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .map(|value| {
            value
                .and_then(|v| mapper.canonicalize(v))
                .map(|label| label.into_string())
        })
        .collect()
}
