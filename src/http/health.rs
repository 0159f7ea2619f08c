//! Kubernetes-style health probes.
//!
//! Both probes answer 200 unconditionally: the service is live as soon
//! as it accepts connections, and it is ready even without a published
//! ConfigMap (the greeting endpoint reports that case itself).

/// `GET /api/health/readiness`
pub async fn readiness() -> &'static str {
    "OK"
}

/// `GET /api/health/liveness`
pub async fn liveness() -> &'static str {
    "OK"
}
