use thiserror::Error;

#[derive(Error, Debug)]
pub enum Word2VecError {
    #[error("token: {0} is not in the vocabulary")]
    UnknownToken(String),

    #[error("index out of bounds: {index} >= {max}")]
    IndexOutOfBounds { index: usize, max: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("softmax is undefined for the given scores")]
    UndefinedSoftmax,

    #[error("gradient check failed at {index:?}: analytic {analytic}, numeric {numeric}")]
    GradientCheck {
        index: (usize, usize),
        analytic: f64,
        numeric: f64,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("corpus error: {0}")]
    Corpus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write npy: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    #[error("could not read npy: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
