//! Navigation history.

use crate::session::Location;

/// History stack of locations.
#[derive(Debug, Clone)]
pub struct RouterState {
    history: Vec<Location>,
    current: usize,
    /// Bumped by every navigation, including ones that end up blocked.
    navigation_id: usize,
}

impl RouterState {
    /// History holding only `/`.
    pub fn new() -> Self {
        Self::with_initial(Location::default())
    }

    pub fn with_initial(location: Location) -> Self {
        Self {
            history: vec![location],
            current: 0,
            navigation_id: 0,
        }
    }

    /// Id of the latest navigation.
    pub fn navigation_id(&self) -> usize {
        self.navigation_id
    }

    /// Start a new navigation and return its id.
    pub fn start_navigation(&mut self) -> usize {
        self.navigation_id += 1;
        self.navigation_id
    }

    pub fn current(&self) -> &Location {
        &self.history[self.current]
    }

    pub fn current_path(&self) -> &str {
        &self.current().pathname
    }

    /// The entry `back` would move to.
    pub fn previous(&self) -> Option<&Location> {
        self.current.checked_sub(1).map(|i| &self.history[i])
    }

    /// The entry `forward` would move to.
    pub fn next(&self) -> Option<&Location> {
        self.history.get(self.current + 1)
    }

    /// Push a new entry, dropping forward history.
    pub fn push(&mut self, location: Location) {
        self.history.truncate(self.current + 1);
        self.history.push(location);
        self.current += 1;
    }

    /// Replace the current entry.
    pub fn replace(&mut self, location: Location) {
        self.history[self.current] = location;
    }

    /// Go back in history. `false` at the start.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Go forward in history. `false` at the end.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current < self.history.len() - 1
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TransferState;

    #[test]
    fn test_navigation() {
        let mut state = RouterState::new();
        assert_eq!(state.current_path(), "/");

        state.push(Location::new("/cluster"));
        assert_eq!(state.current_path(), "/cluster");

        state.push(Location::new("/cluster/7"));
        assert_eq!(state.current_path(), "/cluster/7");

        assert_eq!(state.previous().map(|l| l.pathname.as_str()), Some("/cluster"));
        assert!(state.back());
        assert_eq!(state.current_path(), "/cluster");
        assert_eq!(state.next().map(|l| l.pathname.as_str()), Some("/cluster/7"));

        assert!(state.forward());
        assert_eq!(state.current_path(), "/cluster/7");
        assert!(!state.forward());
        assert!(state.next().is_none());
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut state = RouterState::new();
        state.push(Location::new("/cluster"));
        state.replace(Location::new("/login").with_state(TransferState::new("/cluster")));

        assert_eq!(state.current_path(), "/login");
        assert_eq!(state.current().origin(), Some("/cluster"));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_push_drops_forward_history() {
        let mut state = RouterState::new();
        state.push(Location::new("/a"));
        state.push(Location::new("/b"));
        state.back();
        state.push(Location::new("/c"));
        assert_eq!(state.len(), 3);
        assert!(!state.can_go_forward());
    }

    #[test]
    fn test_navigation_ids_increase() {
        let mut state = RouterState::new();
        assert_eq!(state.navigation_id(), 0);
        assert_eq!(state.start_navigation(), 1);
        assert_eq!(state.start_navigation(), 2);
        assert_eq!(state.navigation_id(), 2);
        assert!(state.previous().is_none());
    }
}
