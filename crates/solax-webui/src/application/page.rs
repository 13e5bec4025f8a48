//! The full configuration page around the form fragment.

use solax_core::{render_form, BaseConfig};

const PAGE_TITLE: &str = "Solax Bridge Configuration";

/// Browser-side hooks the form expects: `radioselection` toggles the LAN
/// board row, `onSubmit` copies the form values into the `json` field as a
/// JSON object keyed by input name.
const PAGE_SCRIPT: &str = r#"<script>
function radioselection(show, hide) {
  show.forEach(function (id) { var el = id && document.getElementById(id); if (el) { el.classList.remove('hide'); } });
  hide.forEach(function (id) { var el = id && document.getElementById(id); if (el) { el.classList.add('hide'); } });
}
function onSubmit(dataId, jsonId) {
  var data = {};
  var elements = document.getElementById(dataId).elements;
  for (var i = 0; i < elements.length; i++) {
    var el = elements[i];
    if (!el.name || (el.type === 'radio' && !el.checked)) { continue; }
    data[el.name] = el.value;
  }
  document.getElementById(jsonId).elements['json'].value = JSON.stringify(data);
  return true;
}
</script>"#;

const PAGE_STYLE: &str = "<style>\n.hide { display: none; }\n.inline { display: inline-block; margin-right: 1em; }\n#json { display: none; }\n</style>";

/// Renders the complete HTML document for `config`.
pub fn render_page(config: &BaseConfig) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>{PAGE_TITLE}</title>\n{PAGE_STYLE}\n{PAGE_SCRIPT}\n</head>\n<body>\n<h1>{PAGE_TITLE}</h1>\n{}</body>\n</html>\n",
        render_form(config)
    )
}
