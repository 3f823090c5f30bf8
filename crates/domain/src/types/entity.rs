//! Remote entity collections
//!
//! Entity shapes are owned by the UI layer; the access layer only needs to
//! know where each collection lives.

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Entity collections exposed by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employees,
    PayrollRuns,
    Candidates,
    Departments,
    LeaveRequests,
    PerformanceReviews,
}

impl_domain_enum_conversions!(EntityKind {
    Employees => "employees",
    PayrollRuns => "payroll_runs",
    Candidates => "candidates",
    Departments => "departments",
    LeaveRequests => "leave_requests",
    PerformanceReviews => "performance_reviews",
});

impl EntityKind {
    /// Collection path on the remote service
    pub const fn collection_path(self) -> &'static str {
        match self {
            Self::Employees => "/employees",
            Self::PayrollRuns => "/payroll-runs",
            Self::Candidates => "/candidates",
            Self::Departments => "/departments",
            Self::LeaveRequests => "/leave-requests",
            Self::PerformanceReviews => "/performance-reviews",
        }
    }

    /// Origin domain reported to governance
    pub const fn origin(self) -> &'static str {
        match self {
            Self::Employees | Self::Departments => "people",
            Self::PayrollRuns => "payroll",
            Self::Candidates => "recruiting",
            Self::LeaveRequests => "time_off",
            Self::PerformanceReviews => "performance",
        }
    }

    /// Path of a single record in the collection
    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), urlencoding::encode(id))
    }

    /// Attachment collection of a single record
    pub fn attachments_path(self, id: &str) -> String {
        format!("{}/attachments", self.item_path(id))
    }

    pub fn attachment_path(self, id: &str, attachment_id: &str) -> String {
        format!("{}/{}", self.attachments_path(id), urlencoding::encode(attachment_id))
    }
}
