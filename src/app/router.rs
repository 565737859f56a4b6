//! Screen routing

use chrono::NaiveDate;

use crate::config::profile::UserProfile;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Login,
    TechSelection,
    Dashboard,
    /// Quiz for one day
    Query(NaiveDate),
    /// Shown after a fully correct submission
    Completion(NaiveDate),
    Stats,
    Certificate,
}

/// Something that moves the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    LoggedIn,
    TechnologyChosen,
    /// A clickable day was opened
    DayOpened(NaiveDate),
    /// The completion delay for a fully correct day elapsed
    DayCompleted(NaiveDate),
    OpenStats,
    /// Back to the calendar
    ViewCalendar,
    ChangeTechnology,
    LoggedOut,
    Reset,
}

impl Screen {
    /// Screen to show after hydrating from storage
    ///
    /// A stored profile alone is not enough to skip Login; a session must be
    /// present too.
    pub fn initial(profile: Option<&UserProfile>, logged_in: bool) -> Self {
        match profile {
            Some(profile) if logged_in => {
                if profile.technology.is_some() {
                    Screen::Dashboard
                } else {
                    Screen::TechSelection
                }
            }
            _ => Screen::Login,
        }
    }

    /// Apply an event; events that do not apply to the current screen leave it unchanged
    pub fn on(self, event: Event) -> Self {
        use Event::*;
        use Screen::*;

        match (self, event) {
            (_, LoggedOut | Reset) => Login,
            (Login, LoggedIn) => TechSelection,
            (TechSelection, TechnologyChosen) => Dashboard,
            (Dashboard, DayOpened(date)) => Query(date),
            (Query(_) | Dashboard, DayCompleted(date)) => Completion(date),
            (Dashboard, OpenStats) => Stats,
            (Query(_) | Completion(_) | Stats, ViewCalendar) => Dashboard,
            (Completion(_), ChangeTechnology) => TechSelection,
            (screen, _) => screen,
        }
    }

    /// Force the certificate once it has been earned
    pub fn route(self, eligible: bool) -> Self {
        if eligible && self != Screen::Login { Screen::Certificate } else { self }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Sign in",
            Screen::TechSelection => "Choose a technology",
            Screen::Dashboard => "Dashboard",
            Screen::Query(_) => "Daily query",
            Screen::Completion(_) => "Day complete",
            Screen::Stats => "Progress",
            Screen::Certificate => "Certificate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::{Technology, Track};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn initial_screen_depends_on_profile() {
        let mut profile = UserProfile::new("Ada", Track::Da, "DA-01");
        assert_eq!(Screen::initial(None, false), Screen::Login);
        assert_eq!(Screen::initial(Some(&profile), false), Screen::Login);
        assert_eq!(Screen::initial(Some(&profile), true), Screen::TechSelection);

        profile.technology = Some(Technology::Sql);
        assert_eq!(Screen::initial(Some(&profile), true), Screen::Dashboard);
    }

    #[test]
    fn complete_profile_without_session_needs_login() {
        let mut profile = UserProfile::new("Ada", Track::Da, "DA-01");
        profile.technology = Some(Technology::Sql);
        assert_eq!(Screen::initial(Some(&profile), false), Screen::Login);
        assert_eq!(Screen::initial(None, true), Screen::Login);
    }

    #[test]
    fn happy_path() {
        let screen = Screen::Login
            .on(Event::LoggedIn)
            .on(Event::TechnologyChosen)
            .on(Event::DayOpened(day(5)))
            .on(Event::DayCompleted(day(5)));
        assert_eq!(screen, Screen::Completion(day(5)));
        assert_eq!(screen.on(Event::ViewCalendar), Screen::Dashboard);
        assert_eq!(screen.on(Event::ChangeTechnology), Screen::TechSelection);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(Screen::Login.on(Event::DayOpened(day(1))), Screen::Login);
        assert_eq!(Screen::Stats.on(Event::OpenStats), Screen::Stats);
        assert_eq!(Screen::Certificate.on(Event::ViewCalendar), Screen::Certificate);
    }

    #[test]
    fn logout_from_anywhere() {
        for screen in [Screen::Dashboard, Screen::Query(day(2)), Screen::Certificate, Screen::Stats] {
            assert_eq!(screen.on(Event::LoggedOut), Screen::Login);
        }
        assert_eq!(Screen::Certificate.on(Event::Reset), Screen::Login);
    }

    #[test]
    fn eligibility_forces_certificate() {
        assert_eq!(Screen::Dashboard.route(true), Screen::Certificate);
        assert_eq!(Screen::Completion(day(3)).route(true), Screen::Certificate);
        assert_eq!(Screen::Dashboard.route(false), Screen::Dashboard);
        assert_eq!(Screen::Login.route(true), Screen::Login);
    }
}
