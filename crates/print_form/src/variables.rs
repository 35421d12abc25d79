//! Placeholder substitution
//!
//! Every `[#name#]` placeholder becomes an attribute-encoding expression for
//! the downstream template engine: `<%=XmlAttrEncode(value)%>`. The value is
//! emitted as is; encoding happens when the print form is rendered.

use crate::config::Variables;
use serde_json::Value;

/// Placeholder text for a variable name
pub fn placeholder(name: &str) -> String {
    format!("[#{}#]", name)
}

/// Expression wrapper emitted in place of a placeholder
pub fn encode_expression(value: &Value) -> String {
    format!("<%=XmlAttrEncode({})%>", plain_text(value))
}

/// Plain textual form of a JSON value: strings unquoted, `null` empty,
/// booleans capitalized as the template engine spells them
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats print without a trailing ".0"
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Replace placeholders for every binding, in declared order
pub fn substitute(text: &str, variables: &Variables) -> String {
    let mut content = text.to_string();

    for (name, value) in variables {
        let target = placeholder(name);
        if content.contains(&target) {
            content = content.replace(&target, &encode_expression(value));
        }
    }

    content
}
