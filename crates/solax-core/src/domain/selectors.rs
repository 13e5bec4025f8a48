//! Enumerations behind the radio-button and select widgets of the form.
//!
//! The persisted document stores these as plain strings taken from the
//! form's `value` attributes.  Decoding is total: every string maps onto a
//! variant, with the documented fallback for anything unrecognized.

/// How the MQTT client identifier is chosen when connecting to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientIdMode {
    /// A fixed client id derived from the device name.
    Static,
    /// A fresh random client id on every connect.
    #[default]
    Random,
}

impl ClientIdMode {
    /// Wire value written by the "static client id" radio button.
    pub const STATIC_VALUE: &'static str = "none";
    /// Wire value written by the "random client id" radio button.
    pub const RANDOM_VALUE: &'static str = "yes";

    /// Decodes a `UseRandomClientID` value.
    ///
    /// `"none"` selects [`ClientIdMode::Static`]; every other string,
    /// including `"yes"`, `"true"` and the empty string, selects
    /// [`ClientIdMode::Random`].
    pub fn from_wire(value: &str) -> Self {
        if value == Self::STATIC_VALUE {
            Self::Static
        } else {
            Self::Random
        }
    }

    /// The string the form posts for this mode.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Static => Self::STATIC_VALUE,
            Self::Random => Self::RANDOM_VALUE,
        }
    }

    pub fn is_random(self) -> bool {
        self == Self::Random
    }
}

/// Which network interface the device uses to reach the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    #[default]
    Wifi,
    /// Wired ethernet through the board named in `lan_board`.
    Ethernet,
}

impl Connectivity {
    pub const WIFI_VALUE: &'static str = "wifi";
    pub const ETHERNET_VALUE: &'static str = "eth";

    /// Decodes a `SelectConnectivity` value.
    ///
    /// `"wifi"` selects [`Connectivity::Wifi`]; every other string selects
    /// [`Connectivity::Ethernet`].
    pub fn from_wire(value: &str) -> Self {
        if value == Self::WIFI_VALUE {
            Self::Wifi
        } else {
            Self::Ethernet
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Wifi => Self::WIFI_VALUE,
            Self::Ethernet => Self::ETHERNET_VALUE,
        }
    }

    pub fn is_ethernet(self) -> bool {
        self == Self::Ethernet
    }
}

/// Wired ethernet boards offered in the LAN board select widget.
///
/// The stored `lan_board` field is a free string so a document written by a
/// newer firmware with more boards still loads; this catalogue only decides
/// which options the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanBoard {
    Wt32Eth01,
}

impl LanBoard {
    /// Every board the form offers, in display order.
    pub const ALL: [LanBoard; 1] = [LanBoard::Wt32Eth01];

    /// The identifier stored in `SelectLAN`.
    pub fn id(self) -> &'static str {
        match self {
            Self::Wt32Eth01 => "WT32-ETH01",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
