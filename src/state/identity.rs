use std::hash::{Hash, Hasher};

/// Name of the cookie carrying the player's display name.
pub const NAME_COOKIE: &str = "name";
/// Name of the cookie carrying the team number.
pub const TEAM_COOKIE: &str = "team";

/// Identity of the player issuing a request: who they are and which team they play for.
///
/// Two identities are equal when they share a team number; the name is only
/// carried along for replay detection and audit lines.
#[derive(Debug, Clone)]
pub struct TeamIdentity {
    /// Display name chosen at registration.
    pub name: String,
    /// Team number, primary key for every stored flag.
    pub team: u32,
}

impl TeamIdentity {
    /// Build an identity from already validated parts.
    pub fn new(name: impl Into<String>, team: u32) -> Self {
        Self {
            name: name.into(),
            team,
        }
    }
}

impl PartialEq for TeamIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.team == other.team
    }
}

impl Eq for TeamIdentity {}

impl Hash for TeamIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.team.hash(state);
    }
}

/// Outcome of reading the caller's identity from its cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Both cookies are present and well formed.
    Registered(TeamIdentity),
    /// At least one cookie is missing or unreadable.
    Unregistered,
}

impl Registration {
    /// Interpret raw cookie values. A non-numeric team counts as unregistered.
    pub fn from_parts(name: Option<&str>, team: Option<&str>) -> Self {
        let (Some(name), Some(team)) = (name, team) else {
            return Registration::Unregistered;
        };
        if name.is_empty() {
            return Registration::Unregistered;
        }
        match team.trim().parse::<u32>() {
            Ok(team) => Registration::Registered(TeamIdentity::new(name, team)),
            Err(_) => Registration::Unregistered,
        }
    }

    /// Parse a raw `Cookie` header (`a=1; b=2`) into a registration.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Registration::Unregistered;
        };
        let mut name = None;
        let mut team = None;
        for pair in header.split(';') {
            let Some((key, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match key.trim() {
                NAME_COOKIE => name = Some(value.trim().trim_matches('"')),
                TEAM_COOKIE => team = Some(value.trim().trim_matches('"')),
                _ => {}
            }
        }
        Self::from_parts(name, team)
    }

    /// The identity, when registered.
    pub fn identity(&self) -> Option<&TeamIdentity> {
        match self {
            Registration::Registered(identity) => Some(identity),
            Registration::Unregistered => None,
        }
    }
}
