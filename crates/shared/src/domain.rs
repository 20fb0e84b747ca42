use std::fmt;

use serde::{
    de::{
        value::{MapAccessDeserializer, SeqAccessDeserializer},
        MapAccess, SeqAccess, Visitor,
    },
    Deserialize, Deserializer, Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    Slider,
}

impl ControlKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlKind::Button => "button",
            ControlKind::Slider => "slider",
        }
    }
}

/// One configured UI element.
///
/// `value` is never read from the configuration file; it is filled in by the
/// status merge on every render and stays 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ControlKind,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub min: i64,
    #[serde(default)]
    pub max: i64,
    #[serde(rename = "url")]
    pub target_url: String,
    #[serde(default, skip_deserializing)]
    pub value: i64,
}

impl Control {
    pub fn button(name: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ControlKind::Button,
            icon: String::new(),
            min: 0,
            max: 0,
            target_url: target_url.into(),
            value: 0,
        }
    }

    pub fn slider(
        name: impl Into<String>,
        target_url: impl Into<String>,
        min: i64,
        max: i64,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ControlKind::Slider,
            icon: String::new(),
            min,
            max,
            target_url: target_url.into(),
            value: 0,
        }
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.kind, ControlKind::Slider)
    }

    /// Slider bounds; buttons have none.
    pub fn range(&self) -> Option<(i64, i64)> {
        match self.kind {
            ControlKind::Slider => Some((self.min, self.max)),
            ControlKind::Button => None,
        }
    }
}

/// A configuration snapshot as read from the controls file.
///
/// Both the documented object form and a bare array of controls are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PanelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
    pub controls: Vec<Control>,
}

#[derive(Deserialize)]
struct PanelDocument {
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    controls: Vec<Control>,
}

impl<'de> Deserialize<'de> for PanelConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PanelConfigVisitor)
    }
}

struct PanelConfigVisitor;

impl<'de> Visitor<'de> for PanelConfigVisitor {
    type Value = PanelConfig;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of controls or an object with a `controls` list")
    }

    fn visit_seq<A>(self, seq: A) -> Result<PanelConfig, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let controls = Vec::<Control>::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(PanelConfig {
            status_url: None,
            controls,
        })
    }

    fn visit_map<A>(self, map: A) -> Result<PanelConfig, A::Error>
    where
        A: MapAccess<'de>,
    {
        let PanelDocument {
            status_url,
            controls,
        } = PanelDocument::deserialize(MapAccessDeserializer::new(map))?;
        Ok(PanelConfig {
            status_url,
            controls,
        })
    }
}

impl PanelConfig {
    /// Names that occur more than once, in order of their second occurrence.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for control in &self.controls {
            let name = control.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
