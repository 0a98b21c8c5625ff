//! Application services

mod tracker_service;

pub use tracker_service::{AccessibilityObserver, TrackerService};

#[cfg(any(test, feature = "testing"))]
pub use tracker_service::MockAccessibilityObserver;
