// Message context construction
//
// The envelope is assembled fresh for every send by `build`, which only maps
// and defaults values. The one place that touches the disk is
// `RawInputs::payload`, which reads the body from `--file` when one is given.

use crate::exchange::config::ClientConfig;
use crate::exchange::error::{ExchangeError, ExchangeResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::fs;
use std::path::{Path, PathBuf};

/// Publication status of an outbound message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Every message sent by this client is published immediately
    #[default]
    Published,
}

/// Envelope posted to the exchange.
///
/// Textual fields are `None` when unset and travel as `""` on the wire, so
/// every key is always present like the backend expects.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    #[serde(default)]
    pub status: MessageStatus,

    #[serde(default)]
    pub message: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub agent: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub format: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub delimiter: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub encoding: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub mime: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub label: Option<String>,

    // Encryption metadata is carried as-is, nothing is encrypted here
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub encryption: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub encryption_key: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub encryption_iv: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub private_key: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub public_key: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub hash_function: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub hash_value: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub mnemonic: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub int_network: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub int_address: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub ext_network: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub ext_address: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub host: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub lang: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub network_id: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub access_key: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub access_secret: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub protocol: Option<String>,

    #[serde(default)]
    pub time_to_live: i64,

    #[serde(default)]
    pub latitude: f64,

    #[serde(default)]
    pub longitude: f64,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub geohash: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub planet: Option<String>,
}

/// Message fields as given on the command line
#[derive(Debug, Clone, Default, Args)]
pub struct RawInputs {
    /// Message to send to the server
    #[arg(long)]
    pub message: Option<String>,

    /// Read the message from this file instead of '--message'
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Language
    #[arg(long, default_value = "english")]
    pub lang: Option<String>,

    /// Message type: text, json, xml, rfc5424 (syslog), ...
    #[arg(long, default_value = "text")]
    pub format: Option<String>,

    /// Delimiter: comma, pipeline, ...
    #[arg(long, default_value = "comma")]
    pub delimiter: Option<String>,

    /// Encoding: character set, encapsulation, ...
    #[arg(long, default_value = "utf-8")]
    pub encoding: Option<String>,

    /// Media type: text/plain, application/json, ...
    #[arg(long, visible_alias = "mine", default_value = "text/plain")]
    pub mime: Option<String>,

    /// Label(s), joined with the delimiter
    #[arg(long, visible_alias = "labels")]
    pub label: Option<String>,

    /// Custom agent name
    #[arg(long)]
    pub agent: Option<String>,

    /// Encryption algorithm: des, aes, ...
    #[arg(long, visible_alias = "enc")]
    pub encryption: Option<String>,

    /// Encryption key
    #[arg(long, visible_alias = "ekey")]
    pub encryption_key: Option<String>,

    /// Encryption IV
    #[arg(long, visible_alias = "eiv")]
    pub encryption_iv: Option<String>,

    /// Private key
    #[arg(long, visible_alias = "privkey")]
    pub private_key: Option<String>,

    /// Public key
    #[arg(long, visible_alias = "pubkey")]
    pub public_key: Option<String>,

    /// Hash function: md5, sha1, sha256, sha512
    #[arg(long, visible_alias = "hasher")]
    pub hash_function: Option<String>,

    /// Precomputed hash value(s), joined with the delimiter
    #[arg(long, visible_alias = "hash")]
    pub hash_value: Option<String>,

    /// Mnemonic
    #[arg(long)]
    pub mnemonic: Option<String>,

    /// Internal network name
    #[arg(long, visible_alias = "innet")]
    pub int_network: Option<String>,

    /// Address on the internal network
    #[arg(long, visible_alias = "inaddr")]
    pub int_address: Option<String>,

    /// External network name
    #[arg(long, visible_alias = "exnet")]
    pub ext_network: Option<String>,

    /// Address on the external network
    #[arg(long, visible_alias = "exaddr")]
    pub ext_address: Option<String>,

    /// Network ID
    #[arg(long, visible_alias = "netid")]
    pub network_id: Option<String>,

    /// Access key
    #[arg(long, visible_alias = "akey")]
    pub access_key: Option<String>,

    /// Access secret
    #[arg(long, visible_alias = "asec")]
    pub access_secret: Option<String>,

    /// Limits the number of reading devices
    #[arg(long, visible_alias = "ttl", default_value_t = 0)]
    pub time_to_live: i64,

    /// Latitude
    #[arg(long, visible_alias = "lat", default_value_t = 0.0, allow_negative_numbers = true,
          value_parser = parse_coordinate)]
    pub latitude: f64,

    /// Longitude
    #[arg(long, visible_alias = "lon", default_value_t = 0.0, allow_negative_numbers = true,
          value_parser = parse_coordinate)]
    pub longitude: f64,

    /// Geohash
    #[arg(long)]
    pub geohash: Option<String>,

    /// Planet
    #[arg(long)]
    pub planet: Option<String>,
}

/// Message body resolved from inline text or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Body as text (lossy for non UTF-8 files)
    pub text: String,
    /// Exact bytes, used for hashing
    pub bytes: Vec<u8>,
}

impl Payload {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let bytes = text.clone().into_bytes();
        Self { text, bytes }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Self { text, bytes }
    }

    /// Read the body from `path`
    pub fn read_file(path: &Path) -> ExchangeResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            ExchangeError::io(format!("Failed to read message file {}", path.display()), e)
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Pick the body: a file wins over inline text; `None` if neither is set
    pub fn resolve(message: Option<&str>, file: Option<&Path>) -> ExchangeResult<Option<Self>> {
        if let Some(path) = file {
            return Self::read_file(path).map(Some);
        }
        Ok(message
            .filter(|text| !text.is_empty())
            .map(Self::from_text))
    }
}

impl RawInputs {
    /// Body selected by '--file' / '--message'
    pub fn payload(&self) -> ExchangeResult<Option<Payload>> {
        Payload::resolve(self.message.as_deref(), self.file.as_deref())
    }

    /// Network ID, if a non-empty one was given
    pub fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Assemble the envelope for one send.
///
/// `host` and `protocol` are taken from the connection the message goes out on.
pub fn build(inputs: &RawInputs, payload: Payload, config: &ClientConfig) -> MessageContext {
    MessageContext {
        status: MessageStatus::Published,
        message: payload.text,
        agent: text(&inputs.agent),
        format: text(&inputs.format),
        delimiter: text(&inputs.delimiter),
        encoding: text(&inputs.encoding),
        mime: text(&inputs.mime),
        label: text(&inputs.label),
        encryption: text(&inputs.encryption),
        encryption_key: text(&inputs.encryption_key),
        encryption_iv: text(&inputs.encryption_iv),
        private_key: text(&inputs.private_key),
        public_key: text(&inputs.public_key),
        hash_function: text(&inputs.hash_function),
        hash_value: text(&inputs.hash_value),
        mnemonic: text(&inputs.mnemonic),
        int_network: text(&inputs.int_network),
        int_address: text(&inputs.int_address),
        ext_network: text(&inputs.ext_network),
        ext_address: text(&inputs.ext_address),
        host: Some(config.host.clone()).filter(|h| !h.is_empty()),
        lang: text(&inputs.lang),
        network_id: text(&inputs.network_id),
        access_key: text(&inputs.access_key),
        access_secret: text(&inputs.access_secret),
        protocol: Some(config.protocol.clone()).filter(|p| !p.is_empty()),
        time_to_live: inputs.time_to_live,
        latitude: inputs.latitude,
        longitude: inputs.longitude,
        geohash: text(&inputs.geohash),
        planet: text(&inputs.planet),
    }
}

/// Coordinates must be finite; JSON has no encoding for NaN or infinity
fn parse_coordinate(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("'{}' is not a finite coordinate", value))
    }
}

/// Empty strings count as unset
fn text(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
