//! Per-contact filter evaluation for dynamic content and campaign conditions.

use tracing::{debug, error, warn};

use crate::model::ContactId;
use crate::segment::{ContactRestriction, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher};

use super::executor::{ExecuteResult, QueryExecutor};

/// Outcome of evaluating a contact against a filter list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// At least one filter was ours and ran.
    pub evaluated: bool,
    pub matched: bool,
}

/// Decides whether one contact satisfies custom object filters.
pub struct ContactFilterEvaluator<'a> {
    dispatcher: SegmentFilterDispatcher<'a>,
    enabled: bool,
}

impl<'a> ContactFilterEvaluator<'a> {
    pub fn new(dispatcher: SegmentFilterDispatcher<'a>) -> Self {
        Self {
            dispatcher,
            enabled: true,
        }
    }

    /// A disabled evaluator leaves every filter to the platform.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Evaluate `filters` for `contact_id`.
    ///
    /// Filter `k` compiles under the alias seed `filter_<k>`. Filters that
    /// are not custom object filters, or that fail to compile, are skipped.
    /// Database errors abort the evaluation.
    pub fn evaluate(
        &self,
        contact_id: ContactId,
        filters: &[RawSegmentFilter],
        executor: &dyn QueryExecutor,
    ) -> ExecuteResult<Evaluation> {
        let mut evaluation = Evaluation::default();
        if !self.enabled {
            return Ok(evaluation);
        }

        for (key, raw) in filters.iter().enumerate() {
            let alias = format!("filter_{}", key);

            let filter = match SegmentFilter::try_from(raw) {
                Ok(SegmentFilter::Native(_)) => {
                    debug!(field = %raw.field, "leaving platform filter to the platform");
                    continue;
                }
                Ok(filter) => filter,
                Err(e) => {
                    warn!(field = %raw.field, error = %e, "skipping segment filter");
                    continue;
                }
            };

            let container = match self.dispatcher.build(
                &filter,
                &alias,
                ContactRestriction::Contact(contact_id),
            ) {
                Ok(container) => container,
                Err(e) => {
                    warn!(field = %raw.field, error = %e, "skipping segment filter");
                    continue;
                }
            };

            let (sql, params) = container.render(executor.dialect());
            let has_rows = executor.has_rows(&sql, &params).map_err(|e| {
                error!(
                    contact_id,
                    error = %e,
                    "failed to evaluate custom object filter"
                );
                e
            })?;

            evaluation.evaluated = true;
            if has_rows != filter.is_negative() {
                evaluation.matched = true;
            }
        }

        Ok(evaluation)
    }
}
