use tracing::warn;

use crate::user::User;

pub const NOT_ROOT_WARNING: &str = "Not running as root. Some features may not work.";

//Quota and affinity changes need root, but the privileged call itself reports
//the failure, so this only warns. Returns whether the user is Admin.
pub fn warn_if_unprivileged(user: &User) -> bool {
    if user.is_admin() {
        true
    } else {
        warn!(uid = user.id, user = %user.name, "{}", NOT_ROOT_WARNING);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Privilege;

    #[test]
    fn admin_passes_without_warning() {
        assert!(warn_if_unprivileged(&User::new(0, "root", Privilege::Admin)));
    }

    #[test]
    fn normal_user_is_flagged() {
        assert!(!warn_if_unprivileged(&User::new(1000, "bob", Privilege::Normal)));
    }
}
