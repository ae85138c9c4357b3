#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Discord API error: {0}")]
    Discord(#[from] Box<serenity::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("user already has an open session")]
    AlreadyActive,

    #[error("no open session for this user")]
    NoActiveSession,

    #[error("session is already paused")]
    AlreadyPaused,

    #[error("session is not paused")]
    NotPaused,

    #[error("caller is missing the required role")]
    NotEligible,

    #[error("user already signed up for this event")]
    AlreadyJoined,

    #[error("event is at capacity")]
    Full,

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<serenity::Error> for Error {
    fn from(err: serenity::Error) -> Self {
        Error::Discord(Box::new(err))
    }
}

impl Error {
    /// Short notice shown to the interacting user as an ephemeral reply.
    pub fn user_message(&self) -> &str {
        match self {
            Error::Discord(_) => "❌ Falha ao falar com o Discord. Tente novamente.",
            Error::Config(msg) => msg,
            Error::Io(_) | Error::Json(_) => {
                "❌ Não foi possível processar sua solicitação. Tente novamente."
            }
            Error::AlreadyActive => "⚠️ Você já tem um ponto ativo!",
            Error::NoActiveSession => "⚠️ Nenhum ponto ativo encontrado.",
            Error::AlreadyPaused => "⚠️ Seu ponto já está pausado.",
            Error::NotPaused => "⚠️ Seu ponto não está pausado.",
            Error::NotEligible => "🚫 Você não tem permissão para usar isso.",
            Error::AlreadyJoined => "⚠️ Você já está inscrito.",
            Error::Full => "🚫 O evento já atingiu o limite de vagas.",
            Error::NotFound(_) => "❌ Não encontrado.",
        }
    }
}
