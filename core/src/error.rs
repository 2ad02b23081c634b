use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigError),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid state: {0}")]
    InvalidState(StateError),
    #[error("Cannot cash out: {0}")]
    InvalidCashout(CashoutError),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least 2x2")]
    BoardTooSmall,
    #[error("at least one mine is required")]
    NoMines,
    #[error("at least one safe tile is required")]
    TooManyMines,
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("board shape does not match declared size")]
    InvalidBoardShape,
    #[error("round was set up for a different board")]
    RoundMismatch,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("no round is being played")]
    NotPlaying,
    #[error("tile is already revealed")]
    AlreadyRevealed,
    #[error("a round is already in progress")]
    RoundInProgress,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CashoutError {
    #[error("no round is being played")]
    NotPlaying,
    #[error("no tile has been revealed yet")]
    NothingRevealed,
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

impl From<StateError> for GameError {
    fn from(err: StateError) -> Self {
        Self::InvalidState(err)
    }
}

impl From<CashoutError> for GameError {
    fn from(err: CashoutError) -> Self {
        Self::InvalidCashout(err)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
