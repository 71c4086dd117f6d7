//! Summary rendering (PURE)
//!
//! Produces the Slack mrkdwn text for a list of merge requests. Escaping
//! for the destination is left to the delivery side.

use crate::types::EnrichedMergeRequest;
use chrono_tz::Tz;

/// Timestamp layout, e.g. `2 January 2006, 15:04 UTC`
const CREATED_AT_FORMAT: &str = "%-d %B %Y, %H:%M %Z";

/// Shown instead of approver names when nobody approved yet
const NO_APPROVERS: &str = "None";

const BLOCKING_DISCUSSIONS_WARNING: &str = ":warning: Has unresolved blocking discussions";

/// Render the digest for `mrs`, or `None` when there is nothing to report
///
/// Items keep their order and are separated by a single blank line.
/// Timestamps are shown in `timezone`.
pub fn render_summary(mrs: &[EnrichedMergeRequest], timezone: Tz) -> Option<String> {
    if mrs.is_empty() {
        return None;
    }

    let items: Vec<String> = mrs.iter().map(|mr| render_item(mr, timezone)).collect();
    Some(items.join("\n"))
}

fn render_item(enriched: &EnrichedMergeRequest, timezone: Tz) -> String {
    let mr = &enriched.merge_request;

    let approved_by = if enriched.approved_by.is_empty() {
        NO_APPROVERS.to_string()
    } else {
        enriched.approved_by.join(", ")
    };
    let created_at = mr
        .created_at
        .with_timezone(&timezone)
        .format(CREATED_AT_FORMAT);

    let mut item = format!(
        ":arrow_forward: <{}|{}>\n*Author:* {}\n*Created at:* {created_at}\n*Approved by:* {approved_by}\n",
        mr.web_url, mr.title, mr.author.name,
    );
    if mr.has_unresolved_discussions {
        item.push_str("*Extra:* ");
        item.push_str(BLOCKING_DISCUSSIONS_WARNING);
        item.push('\n');
    }
    item
}
