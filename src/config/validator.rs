use crate::error::{AppError, Result};
use crate::fetch::request::{template_placeholders, KNOWN_PLACEHOLDERS};

use super::{ExporterConfig, QuoteConfig, UpstreamConfig, WebConfig};

/// Validate the merged configuration and surface every problem at once.
pub fn validate_config(config: &ExporterConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_web(&config.web, &mut issues);
    validate_quote(&config.quote, &mut issues);
    validate_upstream(&config.upstream, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "exporter config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_web(web: &WebConfig, issues: &mut Vec<String>) {
    if let Err(err) = web.socket_addr() {
        issues.push(format!("web.listen_address: {err}"));
    }

    let path = web.telemetry_path.trim();
    if !path.starts_with('/') {
        issues.push(format!(
            "web.telemetry_path `{}` must start with `/`",
            web.telemetry_path
        ));
    } else if path == "/" {
        issues.push("web.telemetry_path must not be `/`, it serves the landing page".to_string());
    } else if has_route_syntax(path) {
        issues.push(format!(
            "web.telemetry_path `{}` must be a literal path (no `{{`, `}}`, `*` or `:`-prefixed segments)",
            web.telemetry_path
        ));
    }
}

/// Characters the router would read as captures or wildcards.
fn has_route_syntax(path: &str) -> bool {
    path.contains(['{', '}', '*']) || path.split('/').any(|segment| segment.starts_with(':'))
}

fn validate_quote(quote: &QuoteConfig, issues: &mut Vec<String>) {
    if quote.ticker_symbol.trim().is_empty() {
        issues.push("quote.ticker_symbol must not be empty".to_string());
    }
    if quote.stock_exchange_code.trim().is_empty() {
        issues.push("quote.stock_exchange_code must not be empty".to_string());
    }
}

fn validate_upstream(upstream: &UpstreamConfig, issues: &mut Vec<String>) {
    if upstream.timeout_secs == 0 {
        issues.push("upstream.timeout_secs must be greater than zero".to_string());
    }

    if upstream.url_template.trim().is_empty() {
        issues.push("upstream.url_template must not be empty".to_string());
        return;
    }

    match template_placeholders(&upstream.url_template) {
        Ok(keys) => {
            for key in keys {
                if !KNOWN_PLACEHOLDERS.contains(&key.as_str()) {
                    issues.push(format!(
                        "upstream.url_template references unknown placeholder `{{{key}}}`"
                    ));
                }
            }
        }
        Err(err) => issues.push(format!("upstream.url_template: {err}")),
    }
}
