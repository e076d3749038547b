// Band classification
//
// Maps a controller-native radio identifier ("ra0", "wifi1", "na", ...) to
// the logical frequency band it serves. Used both when parsing the device
// list and when locating the radio-table entries to rewrite on a power change.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Logical wireless frequency band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(to_string = "2.4GHz", serialize = "2.4", serialize = "2g")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    #[strum(to_string = "5GHz", serialize = "5", serialize = "5g")]
    Ghz5,
    #[serde(rename = "6GHz")]
    #[strum(to_string = "6GHz", serialize = "6", serialize = "6g")]
    Ghz6,
}

impl Band {
    /// Slug used in entity unique ids: `"2_4"`, `"5"`, `"6"`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Ghz2_4 => "2_4",
            Self::Ghz5 => "5",
            Self::Ghz6 => "6",
        }
    }
}

/// Identifier fragments per band, in match priority order.
///
/// Order matters: the first band with a matching fragment wins.
const BAND_PATTERNS: &[(Band, &[&str])] = &[
    (Band::Ghz2_4, &["ra0", "wifi0", "ng"]),
    (Band::Ghz5, &["rai0", "wifi1", "na"]),
    (Band::Ghz6, &["ra6", "wifi2", "6e"]),
];

/// Classify a radio identifier into its band.
///
/// Case-insensitive substring match against [`BAND_PATTERNS`]. Returns `None`
/// for identifiers no pattern recognises.
pub fn classify(radio_identifier: &str) -> Option<Band> {
    let lowered = radio_identifier.to_lowercase();
    BAND_PATTERNS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lowered.contains(f)))
        .map(|(band, _)| *band)
}
