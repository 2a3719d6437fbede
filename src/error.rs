/// Application error carrying an explicit process exit code.
///
/// Exit code conventions used across the pipeline:
/// - `2`: usage / IO / schema problems (missing file, missing column)
/// - `3`: no usable data remains after validation or cleanup
/// - `4`: model or numeric failure (non-finite prediction, empty forest)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// IO or schema problem (exit code 2).
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// No usable data (exit code 3).
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Model/numeric failure (exit code 4).
    pub fn model(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
