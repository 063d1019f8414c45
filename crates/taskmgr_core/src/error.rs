use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    NotFound(String),
    NothingToUndo,
    InvalidInput(String),
    InvalidData(String),
    Io(String),
}

impl AppError {
    pub fn not_found<M: Into<String>>(title: M) -> Self {
        Self::NotFound(title.into())
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NothingToUndo => "nothing_to_undo",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NotFound(title) => format!("task not found: {title}"),
            Self::NothingToUndo => "no action to undo".to_string(),
            Self::InvalidInput(message) => message.clone(),
            Self::InvalidData(message) => message.clone(),
            Self::Io(message) => message.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
