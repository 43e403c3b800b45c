//! Reusable member specifications

use super::field::MemberField;
use super::specification::Specification;

type MemberSpec = Specification<MemberField>;

/// Members with exactly this username; blank input leaves the query unrestricted
pub fn username(username: &str) -> MemberSpec {
    if username.trim().is_empty() {
        return Specification::all();
    }
    Specification::eq(MemberField::Username, username)
}

/// Members of the named team. Reaching the team name joins the team table,
/// so members without a team never match.
pub fn team_name(team_name: &str) -> MemberSpec {
    if team_name.trim().is_empty() {
        return Specification::all();
    }
    Specification::eq(MemberField::TeamName, team_name)
}

pub fn age_greater_than(age: i32) -> MemberSpec {
    Specification::gt(MemberField::Age, age)
}

pub fn age_between(min: i32, max: i32) -> MemberSpec {
    Specification::ge(MemberField::Age, min).and(Specification::le(MemberField::Age, max))
}

pub fn without_team() -> MemberSpec {
    Specification::is_null(MemberField::TeamId)
}
