use thiserror::Error;

pub type IvResult<T> = Result<T, IvError>;

#[derive(Error, Debug)]
pub enum IvError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Cannot parse {what} from '{value}'")]
    Parse { what: &'static str, value: String },
}
