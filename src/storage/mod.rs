//! Storage quota gauging
//!
//! Renders projected recording usage against the origin's storage quota.
//! The quota is queried once at mount and cached for the gauge's lifetime;
//! a failed query degrades to "unknown" and the gauge renders nothing.

use crate::utils::{bytes_to_size, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Share of the reported quota a recording may consume before the gauge
/// considers it over budget.
pub const MAX_QUOTA_SHARE: f64 = 0.8;

/// Origin-wide storage figures reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEstimate {
    /// Bytes already used by the origin
    pub usage_bytes: u64,

    /// Total bytes available to the origin
    pub quota_bytes: u64,
}

/// Platform storage-estimate capability
#[async_trait]
pub trait StorageEstimator: Send + Sync {
    /// Query usage and quota for the current origin
    async fn estimate(&self) -> AppResult<StorageEstimate>;
}

/// Quota display over an externally supplied usage figure
///
/// Owns nothing but the cached quota; usage is computed by the caller
/// (elapsed seconds x estimated bitrate) and passed in per render.
#[derive(Debug, Clone)]
pub struct StorageGauge {
    quota_bytes: Option<u64>,
}

impl StorageGauge {
    /// Query the platform once and cache the result. Query failure is
    /// logged and leaves the quota unknown; it never propagates.
    pub async fn mount(estimator: &dyn StorageEstimator) -> Self {
        let quota_bytes = match estimator.estimate().await {
            Ok(estimate) => {
                tracing::debug!(
                    quota_bytes = estimate.quota_bytes,
                    usage_bytes = estimate.usage_bytes,
                    "storage estimate"
                );
                Some(estimate.quota_bytes)
            }
            Err(err) => {
                tracing::error!("error getting storage estimate: {err}");
                None
            }
        };

        Self { quota_bytes }
    }

    /// Cached quota, if the mount-time query succeeded
    pub fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }

    /// Render `"<usage> of <quota>"`, or nothing while the quota is
    /// unknown or non-positive.
    pub fn render(&self, usage_bytes: f64) -> Option<String> {
        let quota = self.quota_bytes.filter(|&q| q > 0)?;
        Some(format!(
            "{} of {}",
            bytes_to_size(usage_bytes),
            bytes_to_size(quota as f64)
        ))
    }

    /// Whether projected usage exceeds [`MAX_QUOTA_SHARE`] of the quota.
    /// Always false while the quota is unknown.
    pub fn over_budget(&self, usage_bytes: f64) -> bool {
        match self.quota_bytes {
            Some(quota) if quota > 0 => usage_bytes > quota as f64 * MAX_QUOTA_SHARE,
            _ => false,
        }
    }
}
