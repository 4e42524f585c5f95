use nix::unistd::{self, Uid};

// Defines the privilege level of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Normal,
    Admin,
}

//Represents the effective user running lightlimit.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub privilege: Privilege,
}

impl User {
    pub fn new(id: u32, name: &str, privilege: Privilege) -> Self {
        User {
            id,
            name: name.to_string(),
            privilege,
        }
    }

    //Builds the user from the effective uid; root is the only Admin.
    pub fn current() -> Self {
        Self::from_uid(unistd::geteuid())
    }

    pub fn from_uid(uid: Uid) -> Self {
        let name = unistd::User::from_uid(uid)
            .ok()
            .flatten()
            .map(|u| u.name)
            .unwrap_or_else(|| uid.to_string());
        let privilege = if uid.is_root() {
            Privilege::Admin
        } else {
            Privilege::Normal
        };
        User::new(uid.as_raw(), &name, privilege)
    }

    pub fn is_admin(&self) -> bool {
        self.privilege == Privilege::Admin
    }
}
