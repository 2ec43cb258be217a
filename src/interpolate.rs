//! sprintf-style interpolation for translated strings.
//!
//! Supported directives:
//!
//! - `%s`, `%d`, `%f` and `%.2f` consume the next positional argument
//! - `%2$s` refers to a positional argument by its 1-based index
//! - `%(name)s` refers to a named argument
//! - `%%` is a literal percent sign
//!
//! A directive whose argument is missing is left in the output untouched.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%%|%(?:(\d+)\$|\(([A-Za-z_][A-Za-z0-9_]*)\))?(?:\.(\d+))?([sdf])").unwrap()
});

/// Arguments substituted into a translated string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<String>,
    pub named: HashMap<String, String>,
}

impl Args {
    pub fn new() -> Self {
        Args::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn with_arg(mut self, value: impl ToString) -> Self {
        self.positional.push(value.to_string());
        self
    }

    pub fn with_named(mut self, name: &str, value: impl ToString) -> Self {
        self.named.insert(name.to_string(), value.to_string());
        self
    }
}

/// Replace sprintf directives in `template` with values from `args`.
pub fn sprintf(template: &str, args: &Args) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    let mut next_positional = 0usize;
    DIRECTIVE
        .replace_all(template, |caps: &Captures| {
            let directive = &caps[0];
            if directive == "%%" {
                return "%".to_string();
            }

            let value = if let Some(index) = caps.get(1) {
                index
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| args.positional.get(i))
            } else if let Some(name) = caps.get(2) {
                args.named.get(name.as_str())
            } else {
                let value = args.positional.get(next_positional);
                next_positional += 1;
                value
            };

            let Some(value) = value else {
                warn!(directive, template, "Missing argument for directive");
                return directive.to_string();
            };

            let precision = caps.get(3).and_then(|p| p.as_str().parse::<usize>().ok());
            format_value(value, &caps[4], precision)
        })
        .into_owned()
}

fn format_value(value: &str, conversion: &str, precision: Option<usize>) -> String {
    match conversion {
        "d" => match value.trim().parse::<f64>() {
            Ok(number) => format!("{}", number.trunc() as i64),
            Err(_) => value.to_string(),
        },
        "f" => match value.trim().parse::<f64>() {
            Ok(number) => match precision {
                Some(precision) => format!("{:.*}", precision, number),
                None => format!("{}", number),
            },
            Err(_) => value.to_string(),
        },
        _ => match precision {
            Some(precision) => value.chars().take(precision).collect(),
            None => value.to_string(),
        },
    }
}
