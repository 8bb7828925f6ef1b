use reqwest::StatusCode;
use rustyline::error::ReadlineError;
use serenity::http::error::Error as HttpError;
use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Serenity(serenity::Error),
    Rusqlite(rusqlite::Error),
    Url(url::ParseError),
    Reqwest(reqwest::Error),
    HttpStatus(StatusCode),
    Io(std::io::Error),
    Readline(ReadlineError),
    Internal(String),
    ConstStr(&'static str),
}

impl Error {
    /// Store failures and a platform that rejects our credentials end the
    /// run. Anything else is reported and control returns to the menu.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Rusqlite(_) => true,
            Error::Serenity(serenity::Error::Http(inner)) => match inner.as_ref() {
                HttpError::UnsuccessfulRequest(resp) => is_auth_failure(resp.status_code),
                _ => false,
            },
            _ => false,
        }
    }
}

#[inline]
fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serenity(inner) => fmt::Display::fmt(&inner, f),
            Error::Rusqlite(inner) => fmt::Display::fmt(&inner, f),
            Error::Url(inner) => fmt::Display::fmt(&inner, f),
            Error::Reqwest(inner) => fmt::Display::fmt(&inner, f),
            Error::HttpStatus(status) => write!(f, "unexpected http status {status}"),
            Error::Io(inner) => fmt::Display::fmt(&inner, f),
            Error::Readline(inner) => fmt::Display::fmt(&inner, f),
            Error::Internal(inner) => f.write_str(inner),
            Error::ConstStr(inner) => f.write_str(inner),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Serenity(inner) => Some(inner),
            Error::Rusqlite(inner) => Some(inner),
            Error::Url(inner) => Some(inner),
            Error::Reqwest(inner) => Some(inner),
            Error::Io(inner) => Some(inner),
            Error::Readline(inner) => Some(inner),
            Error::HttpStatus(_) | Error::Internal(_) | Error::ConstStr(_) => None,
        }
    }
}

impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Error {
        Error::Serenity(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        Error::Rusqlite(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<ReadlineError> for Error {
    fn from(e: ReadlineError) -> Error {
        Error::Readline(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_errors_are_fatal() {
        assert!(Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows).is_fatal());
        assert!(!Error::HttpStatus(StatusCode::NOT_FOUND).is_fatal());
        assert!(!Error::ConstStr("bad input").is_fatal());
        assert!(!Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_fatal());
        assert!(!Error::Serenity(serenity::Error::Other("gateway hiccup")).is_fatal());
    }

    async fn platform_error(status: u16) -> Error {
        let body = r#"{"code": 0, "message": "rejected"}"#;
        let resp = http::Response::builder().status(status).body(body).unwrap();
        let resp = serenity::http::error::ErrorResponse::from_response(resp.into()).await;
        Error::from(serenity::Error::Http(Box::new(HttpError::UnsuccessfulRequest(
            resp,
        ))))
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_fatal() {
        assert!(platform_error(401).await.is_fatal());
        assert!(platform_error(403).await.is_fatal());
    }

    #[tokio::test]
    async fn test_other_platform_errors_are_recoverable() {
        assert!(!platform_error(404).await.is_fatal());
        assert!(!platform_error(500).await.is_fatal());
    }
}
