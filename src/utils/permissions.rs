use serenity::all::{Member, RoleId};

/// Check whether a member holds a resolved role. An unresolved role handle
/// never grants access.
pub fn has_role(member: &Member, role: Option<RoleId>) -> bool {
    role.is_some_and(|r| member.roles.contains(&r))
}

/// Check whether a member holds any of the resolved roles.
pub fn has_any_role(member: &Member, roles: &[Option<RoleId>]) -> bool {
    roles.iter().any(|r| has_role(member, *r))
}
