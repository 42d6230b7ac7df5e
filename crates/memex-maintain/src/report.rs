//! `run_maintenance()`'s return shape (§4.4): counts of rows changed per
//! step, used both for the supervisor log and for the session-start
//! "maintenance summary if any counter non-zero" line (§6.7).

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct MaintenanceReport {
    pub decayed: usize,
    pub demoted: usize,
    pub promoted_stable: usize,
    pub promoted_frequent: usize,
    pub consolidated: usize,
}

impl MaintenanceReport {
    pub fn any_nonzero(&self) -> bool {
        self.decayed > 0
            || self.demoted > 0
            || self.promoted_stable > 0
            || self.promoted_frequent > 0
            || self.consolidated > 0
    }
}
