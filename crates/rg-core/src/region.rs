//! Region configuration and selector resolution.
//!
//! A [`Region`] is the unit of one extraction run: a bounding box plus the
//! [`NetworkType`] filter handed to the Network Source.  The
//! [`RegionRegistry`] maps operator-facing selectors to regions:
//!
//! | Selector      | Resolves to                                   |
//! |---------------|-----------------------------------------------|
//! | `all`         | every region, in registry order               |
//! | a region id   | that region                                   |
//! | a group name  | the group's members, in declaration order     |
//!
//! Regions are configuration data, not logic.  The built-in registry can be
//! replaced wholesale by a TOML file (see [`RegionRegistry::from_toml_str`]).

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CoreError, CoreResult};

/// Selector that expands to every configured region.
pub const ALL_SELECTOR: &str = "all";

/// Minimum Jaro–Winkler similarity for an unknown selector to get a
/// "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

// ── NetworkType ───────────────────────────────────────────────────────────────

/// Which road classes the Network Source includes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Public roads drivable by car.
    Drive,
    /// Every mapped highway, including footways, paths, and cycleways.
    #[default]
    All,
}

impl NetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Drive => "drive",
            NetworkType::All   => "all",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "drive" => Ok(NetworkType::Drive),
            "all"   => Ok(NetworkType::All),
            other   => Err(CoreError::Config(format!(
                "invalid network type {other:?}: expected \"drive\" or \"all\""
            ))),
        }
    }
}

// ── Region ────────────────────────────────────────────────────────────────────

/// A named extraction area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Short machine id; also names the output file (`<id>-graph.json`).
    pub id: String,
    /// Human-readable name used in log lines.
    pub name: String,
    pub bbox: BoundingBox,
    #[serde(default)]
    pub network_type: NetworkType,
}

impl Region {
    pub fn new(id: &str, name: &str, bbox: BoundingBox, network_type: NetworkType) -> Self {
        Self { id: id.to_owned(), name: name.to_owned(), bbox, network_type }
    }

    /// File name of this region's graph document.
    pub fn output_file_name(&self) -> String {
        format!("{}-graph.json", self.id)
    }
}

// ── RegionRegistry ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<String>>,
}

/// Validated set of regions and named region groups.
#[derive(Clone, Debug)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    groups:  BTreeMap<String, Vec<String>>,
}

impl RegionRegistry {
    /// Build a registry, rejecting inconsistent configuration.
    pub fn new(regions: Vec<Region>, groups: BTreeMap<String, Vec<String>>) -> CoreResult<Self> {
        let registry = Self { regions, groups };
        registry.validate()?;
        Ok(registry)
    }

    /// The regions shipped with the tool.
    pub fn builtin() -> Self {
        let regions = vec![
            Region::new(
                "vancouver",
                "Vancouver",
                BoundingBox::new(49.38, 49.00, -122.50, -123.28),
                NetworkType::All,
            ),
            Region::new(
                "toronto",
                "Toronto",
                BoundingBox::new(43.85, 43.55, -79.10, -79.65),
                NetworkType::All,
            ),
        ];
        let mut groups = BTreeMap::new();
        groups.insert("canada".to_owned(), vec!["vancouver".to_owned(), "toronto".to_owned()]);
        Self { regions, groups }
    }

    /// Parse a registry from TOML text.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let file: RegistryFile = toml::from_str(text)?;
        Self::new(file.regions, file.groups)
    }

    /// Load a registry from a TOML file on disk.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Expand a selector into the regions it names, in processing order.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownSelector`] if `selector` is neither `all`, a region
    /// id, nor a group name.
    pub fn resolve(&self, selector: &str) -> CoreResult<Vec<&Region>> {
        let selector = selector.trim();
        if selector == ALL_SELECTOR {
            return Ok(self.regions.iter().collect());
        }
        if let Some(region) = self.get(selector) {
            return Ok(vec![region]);
        }
        if let Some(members) = self.groups.get(selector) {
            let mut out: Vec<&Region> = Vec::with_capacity(members.len());
            for id in members {
                // Members were checked in `validate`.
                if let Some(region) = self.get(id) {
                    if !out.iter().any(|r| r.id == region.id) {
                        out.push(region);
                    }
                }
            }
            return Ok(out);
        }
        Err(CoreError::UnknownSelector {
            selector:   selector.to_owned(),
            suggestion: self.suggest(selector),
        })
    }

    /// Every selector `resolve` accepts.
    pub fn selectors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.regions.iter().map(|r| r.id.as_str()).collect();
        out.extend(self.groups.keys().map(String::as_str));
        out.push(ALL_SELECTOR);
        out
    }

    fn suggest(&self, selector: &str) -> Option<String> {
        let needle = selector.to_lowercase();
        self.selectors()
            .into_iter()
            .map(|candidate| (candidate, strsim::jaro_winkler(&needle, candidate)))
            .filter(|&(_, score)| score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.to_owned())
    }

    fn validate(&self) -> CoreResult<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let id = region.id.as_str();
            if id.trim().is_empty() {
                return Err(CoreError::Config("region id must not be empty".into()));
            }
            // Ids become file names under the output directory.
            if id == "." || id == ".." || id.contains(['/', '\\']) {
                return Err(CoreError::Config(format!(
                    "region id {id:?} must not contain path separators or be a relative path"
                )));
            }
            if id == ALL_SELECTOR {
                return Err(CoreError::Config(format!("region id {ALL_SELECTOR:?} is reserved")));
            }
            if seen.contains(&id) {
                return Err(CoreError::Config(format!("duplicate region id {id:?}")));
            }
            region
                .bbox
                .validate()
                .map_err(|msg| CoreError::Config(format!("region {id:?}: {msg}")))?;
            seen.push(id);
        }

        for (group, members) in &self.groups {
            if group == ALL_SELECTOR || seen.contains(&group.as_str()) {
                return Err(CoreError::Config(format!(
                    "group name {group:?} shadows a region or reserved selector"
                )));
            }
            if let Some(missing) = members.iter().find(|m| !seen.contains(&m.as_str())) {
                return Err(CoreError::Config(format!(
                    "group {group:?} references unknown region {missing:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
