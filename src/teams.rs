//! # Club roster
//!
//! Immutable table of Premier League clubs and the name variants used to
//! attribute articles to them.
//!
//! - Built-in 20-club table (`Roster::premier_league()`).
//! - Optional override from TOML or JSON (`$ROSTER_PATH`, then
//!   `config/roster.toml`, then `config/roster.json`).
//! - Loaded once per process and shared read-only.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_ROSTER_PATH: &str = "ROSTER_PATH";

/// League name stamped on every snapshot.
pub const LEAGUE: &str = "Premier League";

const BUILTIN: &[(&str, &[&str])] = &[
    ("Manchester City", &["Manchester City", "Man City", "MCFC", "City"]),
    ("Arsenal", &["Arsenal", "Gunners", "AFC"]),
    ("Liverpool", &["Liverpool", "LFC", "Reds"]),
    (
        "Manchester United",
        &["Manchester United", "Man United", "Man Utd", "MUFC", "United"],
    ),
    ("Chelsea", &["Chelsea", "CFC", "Blues"]),
    ("Tottenham", &["Tottenham", "Spurs", "THFC"]),
    ("Newcastle", &["Newcastle", "Newcastle United", "NUFC"]),
    ("Brighton", &["Brighton", "Brighton & Hove Albion", "Seagulls"]),
    ("Aston Villa", &["Aston Villa", "Villa", "AVFC"]),
    ("West Ham", &["West Ham", "West Ham United", "Hammers"]),
    ("Fulham", &["Fulham", "FFC"]),
    ("Brentford", &["Brentford", "Bees"]),
    ("Crystal Palace", &["Crystal Palace", "Palace", "CPFC", "Eagles"]),
    ("Nottingham Forest", &["Nottingham Forest", "Forest", "NFFC"]),
    ("Everton", &["Everton", "EFC", "Toffees"]),
    ("Bournemouth", &["Bournemouth", "AFC Bournemouth", "Cherries"]),
    ("Wolves", &["Wolves", "Wolverhampton", "Wanderers"]),
    ("Leicester", &["Leicester", "Leicester City", "LCFC", "Foxes"]),
    ("Ipswich", &["Ipswich", "Ipswich Town", "ITFC", "Tractor Boys"]),
    ("Southampton", &["Southampton", "Saints"]),
];

/// Generic football vocabulary that never counts as a key topic.
const GENERIC_TERMS: &[&str] = &[
    "premier league",
    "epl",
    "football",
    "soccer",
    "match",
    "game",
    "team",
    "club",
    "player",
    "players",
    "manager",
    "coach",
    "league",
    "season",
    "fans",
    "goal",
    "goals",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    #[serde(alias = "canonical_name")]
    pub name: String,
    pub variants: Vec<String>,
}

impl Club {
    pub fn new<S: Into<String>>(name: S, variants: &[&str]) -> Self {
        Self {
            name: name.into(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Ordered, immutable club table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    clubs: Vec<Club>,
}

impl Roster {
    pub fn premier_league() -> Self {
        Self {
            clubs: BUILTIN
                .iter()
                .map(|(name, variants)| Club::new(*name, variants))
                .collect(),
        }
    }

    /// Build a roster from an explicit club list (trimmed, empty variants dropped).
    pub fn from_clubs(clubs: Vec<Club>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(clubs.len());
        for c in clubs {
            let name = c.name.trim().to_string();
            if name.is_empty() {
                return Err(anyhow!("club with empty name in roster"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(anyhow!("duplicate club in roster: {name}"));
            }
            let mut variants: Vec<String> = c
                .variants
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            if variants.is_empty() {
                variants.push(name.clone());
            }
            out.push(Club { name, variants });
        }
        Ok(Self { clubs: out })
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Club> {
        self.clubs.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Lowercased names that must never surface as a club's key topic:
    /// generic vocabulary, the club's own variants, and every club's
    /// canonical name and variants.
    pub fn topic_denylist(&self, club: &Club) -> BTreeSet<String> {
        let mut deny: BTreeSet<String> = GENERIC_TERMS.iter().map(|t| t.to_string()).collect();
        deny.insert(club.name.to_lowercase());
        deny.extend(club.variants.iter().map(|v| v.to_lowercase()));
        for other in &self.clubs {
            deny.insert(other.name.to_lowercase());
            deny.extend(other.variants.iter().map(|v| v.to_lowercase()));
        }
        deny
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading roster from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let clubs = parse_roster(&content, ext.as_str())?;
        Self::from_clubs(clubs)
    }

    /// Load using env var + fallbacks:
    /// 1) $ROSTER_PATH
    /// 2) config/roster.toml
    /// 3) config/roster.json
    /// 4) built-in table
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_ROSTER_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("ROSTER_PATH points to non-existent path"));
        }
        for candidate in ["config/roster.toml", "config/roster.json"] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Ok(Self::premier_league())
    }
}

fn parse_roster(s: &str, hint_ext: &str) -> Result<Vec<Club>> {
    #[derive(Deserialize)]
    struct RosterFile {
        clubs: Vec<Club>,
    }

    if hint_ext == "toml" || s.contains("[[clubs]]") {
        if let Ok(v) = toml::from_str::<RosterFile>(s) {
            return Ok(v.clubs);
        }
    }
    if let Ok(v) = serde_json::from_str::<RosterFile>(s) {
        return Ok(v.clubs);
    }
    if let Ok(v) = serde_json::from_str::<Vec<Club>>(s) {
        return Ok(v);
    }
    Err(anyhow!("unsupported roster format"))
}
