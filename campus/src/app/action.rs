use crossterm::event::KeyEvent;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Something bad happened; display it to the user
    Problem(String),
}
