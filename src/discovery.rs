// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Discovery beacon decoding.

A FlexRadio periodically broadcasts a UDP discovery beacon: UTF-8 text,
`NUL`/`DEL` bytes stripped, space-delimited `key=value` pairs. This
module decodes one beacon payload into a [`DiscoveryDescriptor`]. The
UDP multicast listener itself is outside this crate's scope — callers
hand this module whatever bytes they received.
*/

use std::collections::HashMap;

/// A decoded discovery beacon. Known keys are typed; anything else is
/// preserved verbatim in `raw`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveryDescriptor {
    /// Radio model (e.g. "FLEX-6600").
    pub model: Option<String>,
    /// Radio serial number.
    pub serial: Option<String>,
    /// Firmware version string.
    pub version: Option<String>,
    /// User-configured nickname.
    pub nickname: Option<String>,
    /// Configured callsign.
    pub callsign: Option<String>,
    /// IP address the radio is reachable at.
    pub ip: Option<String>,
    /// Control port.
    pub port: Option<u32>,
    /// Radio status string (e.g. "Available", "In_Use").
    pub status: Option<String>,
    /// IP of the client currently connected, if any.
    pub inuse_ip: Option<String>,
    /// Hostname of the client currently connected, if any.
    pub inuse_host: Option<String>,
    /// Maximum licensed protocol version.
    pub max_licensed_version: Option<String>,
    /// Radio license identifier.
    pub radio_license_id: Option<String>,
    /// Whether an additional license is required to connect.
    pub requires_additional_license: Option<bool>,
    /// Front-panel-controller MAC address.
    pub fpc_mac: Option<String>,
    /// Whether the radio is reachable via SmartLink (WAN).
    pub wan_connected: Option<bool>,
    /// Number of licensed simultaneous GUI clients.
    pub licensed_clients: Option<u32>,
    /// Number of additional GUI client slots available.
    pub available_clients: Option<u32>,
    /// Maximum number of panadapters supported.
    pub max_panadapters: Option<u32>,
    /// Number of panadapters currently available.
    pub available_panadapters: Option<u32>,
    /// Maximum number of slices supported.
    pub max_slices: Option<u32>,
    /// Number of slices currently available.
    pub available_slices: Option<u32>,
    /// IPs of currently connected GUI clients.
    pub gui_client_ips: Vec<String>,
    /// Hostnames of currently connected GUI clients.
    pub gui_client_hosts: Vec<String>,
    /// Program names of currently connected GUI clients.
    pub gui_client_programs: Vec<String>,
    /// Station names of currently connected GUI clients.
    pub gui_client_stations: Vec<String>,
    /// Opaque per-client handles of currently connected GUI clients.
    pub gui_client_handles: Vec<String>,
    /// Minimum software version required to connect.
    pub min_software_version: Option<String>,
    /// Discovery protocol version.
    pub discovery_protocol_version: Option<String>,
    /// Externally reachable port, if port-forwarded.
    pub external_port_link: Option<bool>,
    /// Every `key=value` pair observed, including the typed ones above.
    pub raw: HashMap<String, String>,
}

fn parse_bool(v: &str) -> Option<bool> {
    match v {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_csv(v: &str) -> Vec<String> {
    v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Decodes one discovery beacon payload. `NUL` and `DEL` bytes are
/// stripped before tokenizing; unknown keys are preserved in `raw` and
/// logged at `debug`.
pub fn parse_beacon(payload: &[u8]) -> DiscoveryDescriptor {
    let cleaned: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|&b| b != 0x00 && b != 0x7F)
        .collect();
    let text = String::from_utf8_lossy(&cleaned);

    let mut d = DiscoveryDescriptor::default();
    for token in text.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        d.raw.insert(key.to_string(), value.to_string());
        match key {
            "model" => d.model = Some(value.to_string()),
            "serial" => d.serial = Some(value.to_string()),
            "version" => d.version = Some(value.to_string()),
            "nickname" => d.nickname = Some(value.to_string()),
            "callsign" => d.callsign = Some(value.to_string()),
            "ip" => d.ip = Some(value.to_string()),
            "port" => d.port = value.parse().ok(),
            "status" => d.status = Some(value.to_string()),
            "inuse_ip" => d.inuse_ip = Some(value.to_string()),
            "inuse_host" => d.inuse_host = Some(value.to_string()),
            "max_licensed_version" => d.max_licensed_version = Some(value.to_string()),
            "radio_license_id" => d.radio_license_id = Some(value.to_string()),
            "requires_additional_license" => d.requires_additional_license = parse_bool(value),
            "fpc_mac" => d.fpc_mac = Some(value.to_string()),
            "wan_connected" => d.wan_connected = parse_bool(value),
            "licensed_clients" => d.licensed_clients = value.parse().ok(),
            "available_clients" => d.available_clients = value.parse().ok(),
            "max_panadapters" => d.max_panadapters = value.parse().ok(),
            "available_panadapters" => d.available_panadapters = value.parse().ok(),
            "max_slices" => d.max_slices = value.parse().ok(),
            "available_slices" => d.available_slices = value.parse().ok(),
            "gui_client_ips" => d.gui_client_ips = parse_csv(value),
            "gui_client_hosts" => d.gui_client_hosts = parse_csv(value),
            "gui_client_programs" => d.gui_client_programs = parse_csv(value),
            "gui_client_stations" => d.gui_client_stations = parse_csv(value),
            "gui_client_handles" => d.gui_client_handles = parse_csv(value),
            "min_software_version" => d.min_software_version = Some(value.to_string()),
            "discovery_protocol_version" => d.discovery_protocol_version = Some(value.to_string()),
            "external_port_link" => d.external_port_link = parse_bool(value),
            _ => log::debug!("discovery beacon: unknown key {key:?}"),
        }
    }
    d
}
