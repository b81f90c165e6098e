use axum::http::StatusCode;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::Mutex;

pub const METRIC_SUBSYSTEM: &str = "waypoint";

#[derive(Default)]
struct MetricsInner {
    requests: BTreeMap<(String, u16), u64>,
    latency_ns_total: BTreeMap<String, u128>,
    latency_count: BTreeMap<String, u64>,
}

/// Per-route request counters with latency totals, rendered as Prometheus
/// text exposition on demand.
#[derive(Default)]
pub struct RequestMetrics {
    inner: Mutex<MetricsInner>,
}

impl RequestMetrics {
    pub async fn observe_request(&self, route: &str, status: StatusCode, elapsed: Duration) {
        let mut inner = self.inner.lock().await;
        *inner
            .requests
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        *inner
            .latency_ns_total
            .entry(route.to_string())
            .or_insert(0) += elapsed.as_nanos();
        *inner.latency_count.entry(route.to_string()).or_insert(0) += 1;
    }

    pub async fn render_prometheus(&self) -> String {
        let inner = self.inner.lock().await;
        let mut body = String::new();
        body.push_str(&format!(
            "# TYPE {METRIC_SUBSYSTEM}_requests_total counter\n"
        ));
        for ((route, status), count) in &inner.requests {
            body.push_str(&format!(
                "{METRIC_SUBSYSTEM}_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}\n"
            ));
        }
        body.push_str(&format!(
            "# TYPE {METRIC_SUBSYSTEM}_request_latency_seconds summary\n"
        ));
        for (route, total_ns) in &inner.latency_ns_total {
            let seconds = *total_ns as f64 / 1_000_000_000.0;
            body.push_str(&format!(
                "{METRIC_SUBSYSTEM}_request_latency_seconds_sum{{route=\"{route}\"}} {seconds:.9}\n"
            ));
            let count = inner.latency_count.get(route).copied().unwrap_or(0);
            body.push_str(&format!(
                "{METRIC_SUBSYSTEM}_request_latency_seconds_count{{route=\"{route}\"}} {count}\n"
            ));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exposition_contains_observed_routes() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/api/data", StatusCode::OK, Duration::from_millis(3))
            .await;
        metrics
            .observe_request("/api/data", StatusCode::OK, Duration::from_millis(5))
            .await;
        metrics
            .observe_request("/api/data", StatusCode::NOT_FOUND, Duration::from_millis(1))
            .await;

        let body = metrics.render_prometheus().await;
        assert!(body.contains("waypoint_requests_total{route=\"/api/data\",status=\"200\"} 2"));
        assert!(body.contains("waypoint_requests_total{route=\"/api/data\",status=\"404\"} 1"));
        assert!(body.contains("waypoint_request_latency_seconds_count{route=\"/api/data\"} 3"));
    }
}
