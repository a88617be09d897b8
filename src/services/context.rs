use chrono::{Duration, NaiveDate};

use crate::config::WfhPolicy;

/// Who is acting, on which calendar day, under which policy.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub actor_id: i64,
    pub today: NaiveDate,
    pub policy: WfhPolicy,
}

impl RequestContext {
    pub fn new(actor_id: i64, today: NaiveDate, policy: WfhPolicy) -> Self {
        Self {
            actor_id,
            today,
            policy,
        }
    }

    /// Earliest date a request may start on.
    pub fn window_start(&self) -> NaiveDate {
        self.today - Duration::days(self.policy.lookback_days)
    }

    /// Latest date a request may start or end on.
    pub fn window_end(&self) -> NaiveDate {
        self.today + Duration::days(self.policy.lookahead_days)
    }

    /// Pending requests starting before this date are swept to EXPIRED.
    pub fn expiry_cutoff(&self) -> NaiveDate {
        self.window_start()
    }
}
