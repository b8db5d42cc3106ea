use crate::domain::session::{Session, SessionPhase};
use crate::domain::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Clients,
    Cases,
    Finance,
    Leads,
    Documents,
    Calendar,
    Templates,
    Users,
    Settings,
}

/// Menu order of the main section; `Users` is shown in the admin section.
const MAIN_MENU: [Route; 8] = [
    Route::Dashboard,
    Route::Clients,
    Route::Cases,
    Route::Finance,
    Route::Leads,
    Route::Documents,
    Route::Calendar,
    Route::Templates,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Clients => "/clients",
            Route::Cases => "/cases",
            Route::Finance => "/finance",
            Route::Leads => "/leads",
            Route::Documents => "/documents",
            Route::Calendar => "/calendar",
            Route::Templates => "/templates",
            Route::Users => "/users",
            Route::Settings => "/settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Dashboard => "Dashboard",
            Route::Clients => "Clients",
            Route::Cases => "Cases",
            Route::Finance => "Finance",
            Route::Leads => "Leads",
            Route::Documents => "Documents",
            Route::Calendar => "Calendar",
            Route::Templates => "Templates",
            Route::Users => "Users",
            Route::Settings => "Settings",
        }
    }

    /// Unknown paths resolve to the dashboard.
    pub fn resolve(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/clients" => Route::Clients,
            "/cases" => Route::Cases,
            "/finance" => Route::Finance,
            "/leads" => Route::Leads,
            "/documents" => Route::Documents,
            "/calendar" => Route::Calendar,
            "/templates" => Route::Templates,
            "/users" => Route::Users,
            "/settings" => Route::Settings,
            _ => Route::Dashboard,
        }
    }

    pub fn permits(self, role: Role) -> bool {
        match self {
            Route::Login
            | Route::Dashboard
            | Route::Clients
            | Route::Cases
            | Route::Documents
            | Route::Calendar
            | Route::Settings => true,
            Route::Finance | Route::Leads | Route::Templates => match role {
                Role::Admin | Role::Lawyer | Role::Secretary => true,
                Role::Intern => false,
            },
            Route::Users => match role {
                Role::Admin => true,
                Role::Lawyer | Role::Secretary | Role::Intern => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub main: Vec<Route>,
    pub admin: Vec<Route>,
    pub footer: Vec<Route>,
}

pub fn menu_for(role: Role) -> Menu {
    Menu {
        main: MAIN_MENU.into_iter().filter(|r| r.permits(role)).collect(),
        admin: [Route::Users].into_iter().filter(|r| r.permits(role)).collect(),
        footer: vec![Route::Settings],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Identity check still running; show a placeholder.
    Pending,
    Render,
    Redirect(Route),
}

pub fn guard(session: &Session, route: Route) -> GuardDecision {
    match (session.phase(), route) {
        (SessionPhase::Loading, _) => GuardDecision::Pending,
        (SessionPhase::Anonymous, Route::Login) => GuardDecision::Render,
        (SessionPhase::Anonymous, _) => GuardDecision::Redirect(Route::Login),
        (SessionPhase::Authenticated, Route::Login) => GuardDecision::Redirect(Route::Dashboard),
        (SessionPhase::Authenticated, route) => match session.role() {
            Some(role) if route.permits(role) => GuardDecision::Render,
            _ => GuardDecision::Redirect(Route::Dashboard),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::sample_user;

    #[test]
    fn test_resolve_known_and_unknown_paths() {
        assert_eq!(Route::resolve("/"), Route::Dashboard);
        assert_eq!(Route::resolve("/cases"), Route::Cases);
        assert_eq!(Route::resolve("/cases/"), Route::Cases);
        assert_eq!(Route::resolve("/login"), Route::Login);
        assert_eq!(Route::resolve("/no-such-page"), Route::Dashboard);
    }

    #[test]
    fn test_every_route_path_resolves_to_itself() {
        let routes = [
            Route::Login,
            Route::Dashboard,
            Route::Clients,
            Route::Cases,
            Route::Finance,
            Route::Leads,
            Route::Documents,
            Route::Calendar,
            Route::Templates,
            Route::Users,
            Route::Settings,
        ];
        for route in routes {
            assert_eq!(Route::resolve(route.path()), route);
        }
    }

    #[test]
    fn test_intern_menu_hides_finance_leads_templates() {
        let menu = menu_for(Role::Intern);

        assert_eq!(
            menu.main,
            vec![
                Route::Dashboard,
                Route::Clients,
                Route::Cases,
                Route::Documents,
                Route::Calendar
            ]
        );
        assert!(menu.admin.is_empty());
        assert_eq!(menu.footer, vec![Route::Settings]);
    }

    #[test]
    fn test_admin_menu_has_admin_section() {
        let menu = menu_for(Role::Admin);

        assert_eq!(menu.main.len(), MAIN_MENU.len());
        assert_eq!(menu.admin, vec![Route::Users]);
    }

    #[test]
    fn test_secretary_sees_finance_but_not_users() {
        let menu = menu_for(Role::Secretary);

        assert!(menu.main.contains(&Route::Finance));
        assert!(menu.admin.is_empty());
    }

    #[test]
    fn test_guard_waits_while_loading() {
        assert_eq!(guard(&Session::loading(), Route::Cases), GuardDecision::Pending);
        assert_eq!(guard(&Session::loading(), Route::Login), GuardDecision::Pending);
    }

    #[test]
    fn test_guard_sends_anonymous_users_to_login() {
        let session = Session::anonymous();

        assert_eq!(guard(&session, Route::Clients), GuardDecision::Redirect(Route::Login));
        assert_eq!(guard(&session, Route::Login), GuardDecision::Render);
    }

    #[test]
    fn test_guard_sends_signed_in_users_away_from_login() {
        let session = Session::authenticated(sample_user(Role::Lawyer));

        assert_eq!(guard(&session, Route::Login), GuardDecision::Redirect(Route::Dashboard));
        assert_eq!(guard(&session, Route::Cases), GuardDecision::Render);
    }

    #[test]
    fn test_guard_enforces_roles() {
        let intern = Session::authenticated(sample_user(Role::Intern));
        let lawyer = Session::authenticated(sample_user(Role::Lawyer));
        let admin = Session::authenticated(sample_user(Role::Admin));

        assert_eq!(guard(&intern, Route::Finance), GuardDecision::Redirect(Route::Dashboard));
        assert_eq!(guard(&lawyer, Route::Users), GuardDecision::Redirect(Route::Dashboard));
        assert_eq!(guard(&admin, Route::Users), GuardDecision::Render);
    }
}
