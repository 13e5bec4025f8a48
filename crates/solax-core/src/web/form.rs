//! HTML form reflecting the current configuration.
//!
//! [`render_form`] is a pure function of a [`BaseConfig`] snapshot.  The
//! surrounding page is expected to provide two script hooks:
//!
//! - `radioselection(show, hide)` toggles the LAN board row when the
//!   connectivity radio changes.
//! - `onSubmit(dataFormId, jsonFormId)` serializes the fields of `DataForm`
//!   into a JSON object keyed by input `name`, places it in the `json` field
//!   of `jsonform` and lets that form post to `StoreBaseConfig`.
//!
//! Input names are the recognized document keys, so the posted document
//! feeds straight into [`crate::ConfigStore::store`].

use std::fmt::{self, Display, Formatter};

use crate::domain::schema::BaseConfig;
use crate::domain::selectors::{ClientIdMode, Connectivity, LanBoard};

/// Path the submit form posts to.
pub const STORE_ACTION: &str = "StoreBaseConfig";

/// Renders the configuration form fragment for `config`.
///
/// ```rust
/// use solax_core::{render_form, BaseConfig};
///
/// let html = render_form(&BaseConfig::default());
/// assert!(html.contains("name='mqttserver' type='text' value='test.mosquitto.org'"));
/// ```
pub fn render_form(config: &BaseConfig) -> String {
    ConfigForm(config).to_string()
}

struct ConfigForm<'a>(&'a BaseConfig);

impl Display for ConfigForm<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.0;
        let eth = c.use_ethernet();

        writeln!(f, "<form id='DataForm'>")?;
        writeln!(f, "<table id='maintable' class='editorDemoTable'>")?;
        writeln!(f, "<thead>")?;
        writeln!(f, "<tr>")?;
        writeln!(f, "<td style='width: 250px;'>Name</td>")?;
        writeln!(f, "<td style='width: 200px;'>Value</td>")?;
        writeln!(f, "</tr>")?;
        writeln!(f, "</thead>")?;
        writeln!(f, "<tbody>")?;

        row(
            f,
            "Device Name",
            format_args!(
                "<input size='30' maxlength='40' name='mqttroot' type='text' value='{}'/>",
                Escaped(&c.mqtt_root)
            ),
        )?;

        writeln!(f, "<tr>")?;
        writeln!(f, "<td colspan='2'>")?;
        radio(
            f,
            "sel_wifi",
            "SelectConnectivity",
            Connectivity::WIFI_VALUE,
            !eth,
            " onclick=\"radioselection([''],['SelectLAN'])\"",
            "use WIFI",
        )?;
        radio(
            f,
            "sel_eth",
            "SelectConnectivity",
            Connectivity::ETHERNET_VALUE,
            eth,
            " onclick=\"radioselection(['SelectLAN'],[''])\"",
            "use wired ethernet",
        )?;
        writeln!(f, "</td>")?;
        writeln!(f, "</tr>")?;

        writeln!(f, "<tr id='SelectLAN' class='{}'>", if eth { "" } else { "hide" })?;
        writeln!(f, "<td>Select LAN Board</td>")?;
        writeln!(f, "<td><select name='SelectLAN' size='1'>")?;
        for board in LanBoard::ALL {
            writeln!(
                f,
                "<option {}value='{}'>{}</option>",
                if c.lan_board == board.id() { "selected " } else { "" },
                board.id(),
                board.id()
            )?;
        }
        writeln!(f, "</select></td>")?;
        writeln!(f, "</tr>")?;

        row(
            f,
            "MQTT Server IP",
            format_args!(
                "<input size='30' name='mqttserver' type='text' value='{}'/>",
                Escaped(&c.mqtt_server)
            ),
        )?;
        row(
            f,
            "MQTT Server Port",
            format_args!(
                "<input maxlength='5' name='mqttport' type='text' style='width: 6em' value='{}'/>",
                c.mqtt_port
            ),
        )?;
        row(
            f,
            "MQTT Authentication: Username (optional)",
            format_args!(
                "<input size='30' name='mqttuser' type='text' value='{}'/>",
                Escaped(&c.mqtt_username)
            ),
        )?;
        row(
            f,
            "MQTT Authentication: Password (optional)",
            format_args!(
                "<input size='30' name='mqttpass' type='text' value='{}'/>",
                Escaped(&c.mqtt_password)
            ),
        )?;
        row(
            f,
            "MQTT Topic Base Path (example: home/inverter)",
            format_args!(
                "<input size='30' maxlength='40' name='mqttbasepath' type='text' value='{}'/>",
                Escaped(&c.mqtt_basepath)
            ),
        )?;

        writeln!(f, "<tr>")?;
        writeln!(f, "<td colspan='2'>")?;
        radio(
            f,
            "sel_URCID1",
            "UseRandomClientID",
            ClientIdMode::STATIC_VALUE,
            !c.mqtt_use_random_client_id(),
            "",
            "use static MQTT ClientID",
        )?;
        radio(
            f,
            "sel_URCID2",
            "UseRandomClientID",
            ClientIdMode::RANDOM_VALUE,
            c.mqtt_use_random_client_id(),
            "",
            "use dynamic MQTT ClientID",
        )?;
        writeln!(f, "</td>")?;
        writeln!(f, "</tr>")?;

        row(
            f,
            "DebugMode (0 [off] .. 5 [max])",
            format_args!(
                "<input min='0' max='5' name='debuglevel' type='number' style='width: 6em' value='{}'/>",
                c.debug_level
            ),
        )?;

        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")?;
        writeln!(f, "</form>")?;
        writeln!(f)?;
        writeln!(f, "<br />")?;
        writeln!(
            f,
            "<form id='jsonform' action='{STORE_ACTION}' method='POST' onsubmit='return onSubmit(\"DataForm\", \"jsonform\")'>"
        )?;
        writeln!(f, "  <input type='text' id='json' name='json' />")?;
        writeln!(f, "  <input type='submit' value='Save' />")?;
        writeln!(f, "</form>")?;
        writeln!(f)
    }
}

fn row(f: &mut Formatter<'_>, label: &str, input: fmt::Arguments<'_>) -> fmt::Result {
    writeln!(f, "<tr>")?;
    writeln!(f, "<td>{label}</td>")?;
    writeln!(f, "<td>{input}</td>")?;
    writeln!(f, "</tr>")
}

fn radio(
    f: &mut Formatter<'_>,
    id: &str,
    name: &str,
    value: &str,
    checked: bool,
    extra: &str,
    label: &str,
) -> fmt::Result {
    writeln!(
        f,
        "<div class='inline'><input type='radio' id='{id}' name='{name}' value='{value}'{}{extra} /><label for='{id}'>{label}</label></div>",
        if checked { " checked" } else { "" }
    )
}

/// Escapes text for use inside a single- or double-quoted HTML attribute.
struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => write!(f, "{ch}")?,
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
