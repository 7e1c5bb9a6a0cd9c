//! Group header rendering for traced levels

use chrono::{DateTime, Utc};

use super::date::DateFormatter;
use super::payload::push_non_empty;
use crate::error::{LogError, LogResult};
use crate::level::ResolvedLevel;
use crate::report::ErrorReporter;

/// Header emitted when a group header cannot be built
pub const GROUP_RENDER_ERROR: &str = "[multilog] group header unavailable";

/// Renders `group-prefix [timestamp] [domain] label`, skipping absent parts
#[derive(Clone, Debug)]
pub struct GroupRenderer {
    dates: DateFormatter,
    reporter: ErrorReporter,
}

impl GroupRenderer {
    pub fn new(dates: DateFormatter, reporter: ErrorReporter) -> Self {
        Self { dates, reporter }
    }

    /// Build the header; fails if the level has no trace configuration
    pub fn try_render(
        &self,
        level: &ResolvedLevel,
        domain: Option<&str>,
        now: &DateTime<Utc>,
    ) -> LogResult<String> {
        let trace = level
            .trace()
            .ok_or_else(|| LogError::MissingTraceConfig(level.label().to_string()))?;
        let decorations = level.trace_decorations.clone().unwrap_or_default();

        let mut parts = Vec::with_capacity(4);
        push_non_empty(&mut parts, trace.group_prefix.as_deref().unwrap_or(""));
        if level.show_timestamp {
            parts.push(decorations.wrap(&self.dates.format(now)));
        }
        if let Some(domain) = domain.filter(|d| !d.is_empty()) {
            parts.push(decorations.wrap(domain));
        }
        push_non_empty(&mut parts, &trace.label);

        Ok(parts.join(" "))
    }

    /// Build the header, reporting a failure and returning [`GROUP_RENDER_ERROR`]
    pub fn render(&self, level: &ResolvedLevel, domain: Option<&str>, now: &DateTime<Utc>) -> String {
        self.try_render(level, domain, now).unwrap_or_else(|err| {
            self.reporter.report(&err);
            GROUP_RENDER_ERROR.to_string()
        })
    }
}
