use super::session::{Role, Session};

/// What a caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Edit,
    Delete,
    UseAi,
    ChangePassword,
}

impl Action {
    fn requires_admin(self) -> bool {
        matches!(self, Action::Delete | Action::ChangePassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    Unauthenticated,
    /// Signed in, but the role does not allow `Action`.
    Forbidden(Action),
}

/// Capability check over the decrypted session. Public reads never need one.
pub fn authorize(session: Option<&Session>, action: Action) -> Result<(), Denied> {
    if action == Action::Read {
        return Ok(());
    }
    let Some(session) = session else {
        return Err(Denied::Unauthenticated);
    };
    if action.requires_admin() && session.role != Role::Admin {
        return Err(Denied::Forbidden(action));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::new(None, None, role)
    }

    #[test]
    fn anonymous_may_only_read() {
        assert_eq!(authorize(None, Action::Read), Ok(()));
        for action in [
            Action::Create,
            Action::Edit,
            Action::Delete,
            Action::UseAi,
            Action::ChangePassword,
        ] {
            assert_eq!(authorize(None, action), Err(Denied::Unauthenticated));
        }
    }

    #[test]
    fn editor_cannot_delete_or_change_password() {
        let editor = session(Role::Editor);
        assert_eq!(authorize(Some(&editor), Action::Create), Ok(()));
        assert_eq!(authorize(Some(&editor), Action::Edit), Ok(()));
        assert_eq!(authorize(Some(&editor), Action::UseAi), Ok(()));
        assert_eq!(
            authorize(Some(&editor), Action::Delete),
            Err(Denied::Forbidden(Action::Delete))
        );
        assert_eq!(
            authorize(Some(&editor), Action::ChangePassword),
            Err(Denied::Forbidden(Action::ChangePassword))
        );
    }

    #[test]
    fn admin_may_do_everything() {
        let admin = session(Role::Admin);
        assert_eq!(authorize(Some(&admin), Action::Delete), Ok(()));
        assert_eq!(authorize(Some(&admin), Action::ChangePassword), Ok(()));
    }
}
