/// A command entered at the session prompt.
///
/// Card numbers are 1-based, as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleFilter,
    ToggleFavorite(usize),
    OpenLink(usize),
    Refresh,
    None,
}

impl From<&str> for Action {
    fn from(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let card = words.next().and_then(|w| w.parse::<usize>().ok());
        if words.next().is_some() {
            return Action::None;
        }

        match (command, card) {
            ("q" | "quit", None) => Action::Quit,
            ("t" | "toggle", None) => Action::ToggleFilter,
            ("f" | "fav", Some(n)) => Action::ToggleFavorite(n),
            ("o" | "open", Some(n)) => Action::OpenLink(n),
            ("" | "l" | "list", None) => Action::Refresh,
            _ => Action::None,
        }
    }
}
