//! Well-known role names carried in access tokens.
//!
//! Users have a single `is_admin` flag in storage; the token role is
//! derived from it with [`role_for`].

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Map the stored admin flag to the role name embedded in tokens.
pub fn role_for(is_admin: bool) -> &'static str {
    if is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}

/// Anything that carries the stored admin flag.
pub trait Privileged {
    fn is_admin(&self) -> bool;

    fn role(&self) -> &'static str {
        role_for(self.is_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_flag_maps_to_role() {
        assert_eq!(role_for(true), ROLE_ADMIN);
        assert_eq!(role_for(false), ROLE_USER);
    }
}
