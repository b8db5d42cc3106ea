use crate::domain::user::{Role, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Anonymous,
    Authenticated,
}

/// In-memory view of who is signed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
            error: None,
        }
    }

    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            user: Some(user),
            loading: false,
            error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::sample_user;

    #[test]
    fn test_new_session_is_loading() {
        let session = Session::default();

        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_phase_follows_user_presence() {
        assert_eq!(Session::anonymous().phase(), SessionPhase::Anonymous);

        let session = Session::authenticated(sample_user(Role::Lawyer));
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.role(), Some(Role::Lawyer));
        assert!(!session.is_admin());
    }

    #[test]
    fn test_loading_takes_precedence_over_user() {
        let mut session = Session::authenticated(sample_user(Role::Admin));
        session.loading = true;

        assert_eq!(session.phase(), SessionPhase::Loading);
    }
}
