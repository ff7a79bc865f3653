use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Status bucket an application is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()))
    }
}

/// Application submitted from the job-matching UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub source: String,
    #[serde(default = "default_status")]
    pub status: ApplicationStatus,
}

fn default_status() -> ApplicationStatus {
    ApplicationStatus::Pending
}

impl NewApplication {
    pub fn pending(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: ApplicationStatus::Pending,
        }
    }
}

/// Status-bucketed counts. `total` always equals the sum of the buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCounters {
    pub total: u32,
    pub pending: u32,
    pub reviewed: u32,
    pub interview: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub by_source: BTreeMap<String, u32>,
}

impl ApplicationCounters {
    pub fn count(&self, status: ApplicationStatus) -> u32 {
        match status {
            ApplicationStatus::Pending => self.pending,
            ApplicationStatus::Reviewed => self.reviewed,
            ApplicationStatus::Interview => self.interview,
            ApplicationStatus::Accepted => self.accepted,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    fn bucket_mut(&mut self, status: ApplicationStatus) -> &mut u32 {
        match status {
            ApplicationStatus::Pending => &mut self.pending,
            ApplicationStatus::Reviewed => &mut self.reviewed,
            ApplicationStatus::Interview => &mut self.interview,
            ApplicationStatus::Accepted => &mut self.accepted,
            ApplicationStatus::Rejected => &mut self.rejected,
        }
    }

    pub fn bucket_sum(&self) -> u32 {
        ApplicationStatus::ALL
            .into_iter()
            .map(|status| self.count(status))
            .sum()
    }

    pub fn record(&mut self, status: ApplicationStatus, source: &str) {
        self.total += 1;
        *self.bucket_mut(status) += 1;
        *self.by_source.entry(source.to_string()).or_insert(0) += 1;
    }

    /// Move one application from `from` to `to`. Fails without touching any
    /// counter when the `from` bucket is empty.
    pub fn transition(
        &mut self,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<(), ApplicationStatus> {
        if self.count(from) == 0 {
            return Err(from);
        }
        *self.bucket_mut(from) -= 1;
        *self.bucket_mut(to) += 1;
        Ok(())
    }

    /// Share of applications that reached interview or acceptance, in percent.
    pub fn response_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let responded = f64::from(self.accepted + self.interview);
        (responded * 100.0 / f64::from(self.total)).round().min(100.0) as u8
    }
}
