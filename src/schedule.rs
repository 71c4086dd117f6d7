//! Cron-driven daemon loop

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Next time `schedule` fires strictly after `after`, in `timezone`
pub fn next_fire(schedule: &Schedule, timezone: Tz, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
    schedule.after(&after.with_timezone(&timezone)).next()
}

/// Run `job` every time `schedule` fires until `shutdown` completes
///
/// Runs never overlap: the next fire time is computed after the previous
/// run finished. A failed run is logged and the loop keeps going.
/// Resolving `shutdown` while a run is in flight drops that run at its
/// next await point.
pub async fn run_scheduled<F, Fut, S>(
    schedule: &Schedule,
    timezone: Tz,
    shutdown: S,
    mut job: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
    S: Future<Output = ()>,
{
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        let now = Utc::now();
        let next = next_fire(schedule, timezone, now)
            .ok_or_else(|| Error::Schedule("schedule has no upcoming run".to_string()))?;
        let wait = (next.with_timezone(&Utc) - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        info!(next_run = %next, "waiting for next scheduled run");

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = &mut shutdown => {
                info!("shutting down scheduler");
                return Ok(());
            }
        }

        tokio::select! {
            result = job() => {
                if let Err(e) = result {
                    warn!(error = %e, "scheduled run failed");
                }
            }
            () = &mut shutdown => {
                info!("shutting down scheduler during run");
                return Ok(());
            }
        }
    }
}
