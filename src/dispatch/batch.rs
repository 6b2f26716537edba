//! Batch dispatch: fail-fast and collect modes over a record slice.

use super::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::record::Record;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of a collect-mode batch run.
///
/// Every record's fate is accounted for: dispatched successfully,
/// failed (with the failure kept, never dropped), or skipped because
/// the cancel token fired before its turn.
#[derive(Debug)]
pub struct BatchReport<O> {
    /// `(record id, output)` per successful dispatch, in input order.
    pub successes: Vec<(String, O)>,
    /// Every per-record failure, in input order.
    pub failures: Vec<DispatchError>,
    /// Records not attempted because the run was cancelled.
    pub skipped: usize,
}

impl<O> BatchReport<O> {
    /// Whether every record dispatched successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }

    /// Total number of records the batch was asked to process.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len() + self.skipped
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collate<O>(outcomes: Vec<Option<Result<(String, O), DispatchError>>>) -> BatchReport<O> {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    let mut skipped = 0usize;
    for outcome in outcomes {
        match outcome {
            Some(Ok(success)) => successes.push(success),
            Some(Err(err)) => failures.push(err),
            None => skipped += 1,
        }
    }
    if !failures.is_empty() || skipped > 0 {
        warn!(
            failures = failures.len(),
            skipped, "batch dispatch finished with failures or skipped records"
        );
    }
    BatchReport {
        successes,
        failures,
        skipped,
    }
}

impl<R: Record, O> Dispatcher<R, O> {
    /// Dispatches records in order, aborting on the first failure.
    ///
    /// The error is returned as-is, still carrying the failing record's
    /// identity; records after it are not attempted.
    pub fn dispatch_fail_fast(&self, records: &[R]) -> Result<Vec<O>, DispatchError> {
        records.iter().map(|record| self.dispatch(record)).collect()
    }

    fn run_one(
        &self,
        record: &R,
        cancel: Option<&AtomicBool>,
    ) -> Option<Result<(String, O), DispatchError>> {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return None;
            }
        }
        Some(self.dispatch(record).map(|output| (record.id(), output)))
    }
}

#[cfg(not(feature = "parallel"))]
impl<R: Record, O> Dispatcher<R, O> {
    /// Dispatches every record, collecting successes and failures.
    ///
    /// Collect mode: a failing record never stops the batch, and its
    /// failure is kept in the report alongside the successes.
    pub fn dispatch_all(&self, records: &[R]) -> BatchReport<O> {
        self.dispatch_all_with_cancel(records, None)
    }

    /// Collect mode with a cancellation token.
    ///
    /// The token is checked before each record; once set, remaining
    /// records are counted as skipped. A handler already running is
    /// never interrupted.
    pub fn dispatch_all_with_cancel(
        &self,
        records: &[R],
        cancel: Option<Arc<AtomicBool>>,
    ) -> BatchReport<O> {
        let cancel = cancel.as_deref();
        let outcomes = records
            .iter()
            .map(|record| self.run_one(record, cancel))
            .collect();
        collate(outcomes)
    }
}

#[cfg(feature = "parallel")]
impl<R, O> Dispatcher<R, O>
where
    R: Record + Sync,
    O: Send,
{
    /// Dispatches every record, collecting successes and failures.
    ///
    /// Collect mode: a failing record never stops the batch, and its
    /// failure is kept in the report alongside the successes. Records
    /// are evaluated in parallel with rayon; the report still lists
    /// outcomes in input order.
    pub fn dispatch_all(&self, records: &[R]) -> BatchReport<O> {
        self.dispatch_all_with_cancel(records, None)
    }

    /// Collect mode with a cancellation token.
    ///
    /// The token is checked before each record; once set, records not
    /// yet started are counted as skipped. A handler already running is
    /// never interrupted.
    pub fn dispatch_all_with_cancel(
        &self,
        records: &[R],
        cancel: Option<Arc<AtomicBool>>,
    ) -> BatchReport<O> {
        let cancel = cancel.as_deref();
        let outcomes = records
            .par_iter()
            .map(|record| self.run_one(record, cancel))
            .collect();
        collate(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SharedHandler;
    use crate::dimension::{DimValue, DimensionSpec};
    use crate::error::HandlerError;
    use crate::record::MapRecord;
    use crate::registry::Registry;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher<MapRecord, i64> {
        // One rule doubles `amount` for axa records; no catch-all.
        let doubling: SharedHandler<MapRecord, i64> = Arc::new(|record: &MapRecord| {
            record
                .field("amount")
                .and_then(|v| v.as_int())
                .map(|amount| amount * 2)
                .ok_or_else(|| HandlerError::new("no amount"))
        });
        let mut registry: Registry<MapRecord, i64> =
            Registry::new(vec![DimensionSpec::exact("ceding_company")]).unwrap();
        registry
            .insert(vec![DimValue::exact("axa")], doubling, "axa_double")
            .unwrap();
        Dispatcher::snapshot(&registry)
    }

    fn record(id: &str, ceding: &str, amount: i64) -> MapRecord {
        MapRecord::new(id)
            .with_field("ceding_company", ceding)
            .with_field("amount", amount)
    }

    #[test]
    fn test_collect_mode_keeps_successes_and_failures() {
        let dispatcher = dispatcher();
        let records = vec![
            record("mp-1", "axa", 10),
            record("mp-2", "cf", 20), // no matching rule
            record("mp-3", "axa", 30),
        ];

        let report = dispatcher.dispatch_all(&records);
        assert_eq!(
            report.successes,
            vec![("mp-1".to_string(), 20), ("mp-3".to_string(), 60)]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].record_id(), "mp-2");
        assert_eq!(report.skipped, 0);
        assert!(!report.is_clean());
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_clean_batch() {
        let dispatcher = dispatcher();
        let records = vec![record("mp-1", "axa", 1), record("mp-2", "axa", 2)];
        let report = dispatcher.dispatch_all(&records);
        assert!(report.is_clean());
        assert_eq!(report.successes.len(), 2);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let dispatcher = dispatcher();
        let records = vec![
            record("mp-1", "axa", 10),
            record("mp-2", "cf", 20),
            record("mp-3", "axa", 30),
        ];

        let err = dispatcher.dispatch_fail_fast(&records).unwrap_err();
        assert_eq!(err.record_id(), "mp-2");
    }

    #[test]
    fn test_fail_fast_clean_run_returns_outputs_in_order() {
        let dispatcher = dispatcher();
        let records = vec![record("mp-1", "axa", 10), record("mp-2", "axa", 20)];
        assert_eq!(dispatcher.dispatch_fail_fast(&records).unwrap(), vec![20, 40]);
    }

    #[test]
    fn test_pre_set_cancel_token_skips_everything() {
        let dispatcher = dispatcher();
        let records = vec![record("mp-1", "axa", 10), record("mp-2", "axa", 20)];

        let cancel = Arc::new(AtomicBool::new(true));
        let report = dispatcher.dispatch_all_with_cancel(&records, Some(cancel));
        assert_eq!(report.skipped, 2);
        assert!(report.successes.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let dispatcher = dispatcher();
        let report = dispatcher.dispatch_all(&[]);
        assert!(report.is_empty());
        assert!(report.is_clean());
    }
}
