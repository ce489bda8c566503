use std::collections::HashMap;

use crate::error::{AppError, Result};

/// Google Finance `getprices` endpoint: 300s interval over the last minute,
/// fields date, close, volume, open, high, low.
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.google.com/finance/getprices?q={symbol}&x={exchange}&i=300&p=1m&f=d,c,v,o,h,l&df=cpct&auto=1&ei=4rrIWJHoIYya0QS1i4IQ";

/// Placeholders a URL template may reference.
pub const KNOWN_PLACEHOLDERS: &[&str] = &["symbol", "exchange"];

pub struct RequestContext<'a> {
    pub symbol: &'a str,
    pub exchange: &'a str,
}

/// Render the quote URL. Inputs are inserted verbatim.
pub fn build_quote_url(template: &str, context: RequestContext<'_>) -> Result<String> {
    let mut replacements: HashMap<&str, &str> = HashMap::new();
    replacements.insert("symbol", context.symbol);
    replacements.insert("exchange", context.exchange);

    render_template(template, &replacements)
}

/// List every placeholder referenced by `template`, in order of appearance.
pub fn template_placeholders(template: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            continue;
        }
        keys.push(read_placeholder(&mut chars)?);
    }

    Ok(keys)
}

fn render_template(template: &str, replacements: &HashMap<&str, &str>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            let key = read_placeholder(&mut chars)?;
            let value = replacements.get(key.as_str()).ok_or_else(|| {
                AppError::message(format!(
                    "No replacement provided for placeholder `{}` in template",
                    key
                ))
            })?;
            result.push_str(value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn read_placeholder(chars: &mut std::str::Chars<'_>) -> Result<String> {
    let mut key = String::new();
    for next in chars.by_ref() {
        if next == '}' {
            if key.is_empty() {
                return Err(AppError::message(
                    "Encountered empty placeholder `{}` in template",
                ));
            }
            return Ok(key);
        }
        key.push(next);
    }

    Err(AppError::message(format!(
        "Unterminated placeholder in template: {{{key}"
    )))
}
