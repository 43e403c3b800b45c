//! Query by example
//!
//! A probe is a partially filled description of the rows wanted. Every
//! property that is set and not ignored becomes a condition; the conditions
//! are joined with `AND`. Association properties are reached through an
//! inner join, so a probe that names a team never matches members without
//! one.

use crate::entities::{Member, MemberWithTeam, Team};
use crate::value_objects::TeamId;

use super::field::{Field, MemberField};
use super::specification::{like_pattern, Specification, StringMatcher, Value};

/// Something that can describe itself as a list of optional property values
pub trait ExampleProbe {
    type Field: Field;

    /// Every probe property with its value, `None` when unset
    fn properties(&self) -> Vec<(Self::Field, Option<Value>)>;
}

/// Controls how a probe is turned into conditions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleMatcher {
    ignored_paths: Vec<String>,
    string_matcher: StringMatcher,
    ignore_case: bool,
}

impl ExampleMatcher {
    /// Exact, case-sensitive matching of every set property
    pub fn matching() -> Self {
        Self::default()
    }

    /// Skip the given property paths (`"age"`, `"team.name"`)
    pub fn with_ignore_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_string_matcher(mut self, matcher: StringMatcher) -> Self {
        self.string_matcher = matcher;
        self
    }

    pub fn with_ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_paths
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(path))
    }

    pub fn string_matcher(&self) -> StringMatcher {
        self.string_matcher
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }
}

/// A probe paired with its matcher
#[derive(Debug, Clone)]
pub struct Example<P> {
    probe: P,
    matcher: ExampleMatcher,
}

impl<P: ExampleProbe> Example<P> {
    /// Example with the default matcher
    pub fn of(probe: P) -> Self {
        Self::with_matcher(probe, ExampleMatcher::matching())
    }

    pub fn with_matcher(probe: P, matcher: ExampleMatcher) -> Self {
        Self { probe, matcher }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn matcher(&self) -> &ExampleMatcher {
        &self.matcher
    }

    /// Translate into a conjunction of conditions
    pub fn to_specification(&self) -> Specification<P::Field> {
        let matcher = &self.matcher;
        self.probe
            .properties()
            .into_iter()
            .filter(|(field, _)| !matcher.is_ignored(field.name()))
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .map(|(field, value)| match value {
                Value::Text(text) => match (matcher.string_matcher, matcher.ignore_case) {
                    (StringMatcher::Exact, false) => Specification::eq(field, text),
                    (StringMatcher::Exact, true) => Specification::eq_ignore_case(field, text),
                    (string_matcher, ignore_case) => {
                        Specification::like(field, like_pattern(&text, string_matcher), ignore_case)
                    }
                },
                other => Specification::eq(field, other),
            })
            .fold(Specification::all(), Specification::and)
    }
}

/// Probe over the team association of a member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamProbe {
    pub id: Option<TeamId>,
    pub name: Option<String>,
}

impl From<&Team> for TeamProbe {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: Some(team.name.clone()),
        }
    }
}

/// Probe over members.
///
/// `age` is a plain integer on the entity and therefore always set when the
/// probe is built from a [`Member`]; ignore the `"age"` path to leave it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberProbe {
    pub username: Option<String>,
    pub age: Option<i32>,
    pub team: Option<TeamProbe>,
}

impl MemberProbe {
    /// Builder-style team probe
    pub fn with_team(mut self, team: &Team) -> Self {
        self.team = Some(TeamProbe::from(team));
        self
    }
}

impl From<&Member> for MemberProbe {
    fn from(member: &Member) -> Self {
        Self {
            username: Some(member.username.clone()),
            age: Some(member.age),
            team: member.team_id.map(|id| TeamProbe {
                id: Some(id),
                name: None,
            }),
        }
    }
}

impl From<&MemberWithTeam> for MemberProbe {
    fn from(value: &MemberWithTeam) -> Self {
        let probe = Self::from(&value.member);
        match &value.team {
            Some(team) => probe.with_team(team),
            None => probe,
        }
    }
}

impl ExampleProbe for MemberProbe {
    type Field = MemberField;

    fn properties(&self) -> Vec<(MemberField, Option<Value>)> {
        let team = self.team.as_ref();
        vec![
            (MemberField::Username, self.username.clone().map(Value::from)),
            (MemberField::Age, self.age.map(Value::from)),
            (MemberField::TeamId, team.and_then(|t| t.id).map(Value::from)),
            (
                MemberField::TeamName,
                team.and_then(|t| t.name.clone()).map(Value::from),
            ),
        ]
    }
}
