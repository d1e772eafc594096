//! Pipeline metrics recorded through the `metrics` facade.
//!
//! Nothing is exported unless the embedding application installs a recorder;
//! without one every call here is a no-op.

use std::time::Instant;

pub const ROWS_LOADED: &str = "etl_rows_loaded_total";
pub const ROWS_CLEANED: &str = "etl_rows_cleaned_total";
pub const DUPLICATES_DROPPED: &str = "etl_duplicate_rows_dropped_total";
pub const BINARY_VALUES_COERCED: &str = "etl_binary_values_coerced_total";
pub const ROWS_SAVED: &str = "etl_rows_saved_total";
pub const STAGE_DURATION: &str = "etl_stage_duration_seconds";

pub fn rows_loaded(count: usize) {
    ::metrics::counter!(ROWS_LOADED).increment(count as u64);
}

pub fn rows_cleaned(count: usize) {
    ::metrics::counter!(ROWS_CLEANED).increment(count as u64);
}

pub fn duplicates_dropped(count: usize) {
    ::metrics::counter!(DUPLICATES_DROPPED).increment(count as u64);
}

pub fn binary_values_coerced(count: usize) {
    ::metrics::counter!(BINARY_VALUES_COERCED).increment(count as u64);
}

pub fn rows_saved(count: usize) {
    ::metrics::counter!(ROWS_SAVED).increment(count as u64);
}

/// Records the elapsed time of a stage when dropped.
pub struct StageTimer {
    start: Instant,
    stage: &'static str,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        ::metrics::histogram!(STAGE_DURATION, "stage" => self.stage).record(duration);
    }
}
