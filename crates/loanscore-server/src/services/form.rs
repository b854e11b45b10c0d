//! HTML form rendering for the index page.

use loanscore_config::{FieldProperty, FormSchema};
use serde_json::Value;

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Loan Default Scoring</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; }
label { display: block; margin-top: 0.75rem; font-weight: 600; }
small { display: block; color: #555; font-weight: normal; }
input, select, textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
textarea { font-family: monospace; min-height: 14rem; }
button { margin-top: 1rem; padding: 0.5rem 1.5rem; }
pre { background: #f4f4f4; padding: 0.75rem; }
</style>
</head>
<body>
<h1>Loan Default Scoring</h1>
"#;

const PAGE_SCRIPT: &str = r#"<pre id="result"></pre>
<script>
const form = document.getElementById("predict-form");
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const out = document.getElementById("result");
  let payload;
  const raw = form.querySelector("textarea[name=__raw]");
  if (raw) {
    try {
      payload = JSON.parse(raw.value);
    } catch (e) {
      out.textContent = "Invalid JSON: " + e;
      return;
    }
  } else {
    payload = {};
    for (const el of form.querySelectorAll("[name]")) {
      if (el.value === "") continue;
      payload[el.name] = el.dataset.numeric === "true" ? Number(el.value) : el.value;
    }
  }
  const res = await fetch("/predict", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(payload),
  });
  out.textContent = JSON.stringify(await res.json(), null, 2);
});
</script>
</body>
</html>
"#;

/// Renders the index page.
///
/// With schema properties, one input per field is emitted, prefilled from
/// the sample payload. Without them, a raw JSON editor holds the sample.
pub fn render_index(schema: &FormSchema, sample: &Value) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str("<form id=\"predict-form\">\n");

    if schema.is_empty() {
        let pretty = serde_json::to_string_pretty(sample).unwrap_or_else(|_| "{}".into());
        html.push_str("<label for=\"__raw\">Request JSON</label>\n");
        html.push_str(&format!(
            "<textarea id=\"__raw\" name=\"__raw\">{}</textarea>\n",
            escape_html(&pretty)
        ));
    } else {
        for (name, property) in schema.properties() {
            html.push_str(&render_field(name, &property, sample.get(name)));
        }
    }

    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
    html.push_str(PAGE_SCRIPT);
    html
}

fn render_field(name: &str, property: &FieldProperty, sample: Option<&Value>) -> String {
    let name_attr = escape_html(name);
    let label = escape_html(property.title.as_deref().unwrap_or(name));
    let initial = sample.or(property.default.as_ref()).map(display_value).unwrap_or_default();

    let mut out = format!("<label for=\"{0}\">{1}", name_attr, label);
    if let Some(description) = &property.description {
        out.push_str(&format!("<small>{}</small>", escape_html(description)));
    }
    out.push_str("</label>\n");

    if property.options.is_empty() {
        let input_type = if property.is_numeric() { "number\" step=\"any" } else { "text" };
        out.push_str(&format!(
            "<input id=\"{0}\" name=\"{0}\" type=\"{1}\" value=\"{2}\" data-numeric=\"{3}\">\n",
            name_attr,
            input_type,
            escape_html(&initial),
            property.is_numeric()
        ));
        return out;
    }

    out.push_str(&format!(
        "<select id=\"{0}\" name=\"{0}\" data-numeric=\"{1}\">\n",
        name_attr,
        property.is_numeric()
    ));
    for option in &property.options {
        let value = display_value(option);
        let selected = if value == initial { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape_html(&value),
            selected
        ));
    }
    out.push_str("</select>\n");
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
