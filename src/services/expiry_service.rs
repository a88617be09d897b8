use chrono::NaiveDate;

use crate::{
    db::enums::{RequestKind, WfhStatus},
    error::AppResult,
    services::context::RequestContext,
    services::lifecycle_service::LifecycleService,
    store::WfhStore,
};

pub const EXPIRY_REASON: &str = "Request expired before it was reviewed.";

pub struct ExpiryService;

impl ExpiryService {
    /// Expires every PENDING request starting before `cutoff`, one
    /// transaction per page. Running it twice expires nothing new.
    pub fn sweep_expired<S: WfhStore>(
        store: &mut S,
        ctx: &RequestContext,
        cutoff: NaiveDate,
    ) -> AppResult<Vec<i64>> {
        let page_size = ctx.policy.sweep_page_size.max(1);
        let mut expired = Vec::new();

        loop {
            let page = store.transaction(|tx| {
                let pending = tx.pending_requests_before(cutoff, page_size)?;
                let mut ids = Vec::with_capacity(pending.len());
                for request in pending {
                    tx.update_request_status(request.id, WfhStatus::Expired, Some(EXPIRY_REASON))?;
                    match request.kind {
                        RequestKind::Withdrawal => {
                            LifecycleService::release_withdrawal(tx, request.id)?;
                        }
                        _ => {
                            tx.update_schedule_status_for_request(request.id, WfhStatus::Expired, true)?;
                        }
                    }
                    ids.push(request.id);
                }
                Ok(ids)
            })?;

            let last_page = (page.len() as i64) < page_size;
            if !page.is_empty() {
                tracing::info!(count = page.len(), %cutoff, "Expired stale requests");
            }
            expired.extend(page);
            if last_page {
                break;
            }
        }

        Ok(expired)
    }

    pub fn default_cutoff(ctx: &RequestContext) -> NaiveDate {
        ctx.expiry_cutoff()
    }
}
