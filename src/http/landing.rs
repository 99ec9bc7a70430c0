//! Landing page served on every path other than the metrics path.

use crate::config::TelemetryConfig;

/// Render the landing page for the given telemetry settings.
pub fn render(config: &TelemetryConfig) -> String {
    format!(
        "<html>
<head><title>Upstream Status Exporter</title></head>
<body>
<h1>Upstream Status Exporter</h1>
<p><a href=\"{path}\">Metrics</a></p>
</body>
</html>",
        path = config.metrics_path
    )
}
