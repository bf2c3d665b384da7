//! Response types for the device identity API.

use serde::Deserialize;

/// Bot detection verdict as reported on the wire.
///
/// The API may introduce new result strings; anything unrecognized
/// deserializes to `Unknown` rather than failing the whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BotVerdict {
    Detected,
    NotDetected,
    #[serde(other)]
    Unknown,
}

impl BotVerdict {
    pub fn is_detected(self) -> bool {
        matches!(self, BotVerdict::Detected)
    }
}

/// An identity event resolved from a request token.
///
/// Every nested field is optional on the wire; accessors encode the
/// defaulting policy so callers never poke through the raw structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityEvent {
    #[serde(default)]
    pub products: Products,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Products {
    #[serde(default)]
    pub identification: Option<IdentificationProduct>,
    #[serde(default)]
    pub botd: Option<BotdProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentificationProduct {
    #[serde(default)]
    pub data: Option<IdentificationData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentificationData {
    #[serde(rename = "visitorId", default)]
    pub visitor_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotdProduct {
    #[serde(default)]
    pub data: Option<BotdData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotdData {
    #[serde(default)]
    pub bot: Option<BotResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotResult {
    #[serde(default)]
    pub result: Option<BotVerdict>,
}

impl IdentityEvent {
    /// The visitor identifier, if identification data is present.
    pub fn visitor_id(&self) -> Option<&str> {
        self.products
            .identification
            .as_ref()
            .and_then(|p| p.data.as_ref())
            .and_then(|d| d.visitor_id.as_deref())
    }

    /// Collapsed bot verdict.
    ///
    /// Contract: an unknown result or absent bot detection data counts as
    /// `NotDetected`. Only an explicit `detected` result ever comes back
    /// as `Detected`.
    pub fn bot_verdict(&self) -> BotVerdict {
        let raw = self
            .products
            .botd
            .as_ref()
            .and_then(|p| p.data.as_ref())
            .and_then(|d| d.bot.as_ref())
            .and_then(|b| b.result);

        match raw {
            Some(BotVerdict::Detected) => BotVerdict::Detected,
            _ => BotVerdict::NotDetected,
        }
    }
}
