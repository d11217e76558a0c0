use serde::Deserialize;

use crate::prelude::*;

/// Generic API envelope: `data` on success, `error.msg` on failure.
///
/// The backend is not strict about status codes, so the body is parsed
/// either way and the error branch wins.
#[derive(Deserialize)]
pub struct Envelope<R> {
    data: Option<R>,

    error: Option<EnvelopeError>,
}

#[derive(Deserialize)]
struct EnvelopeError {
    msg: Option<String>,
}

impl<R> From<Envelope<R>> for Result<R> {
    fn from(envelope: Envelope<R>) -> Self {
        if let Some(error) = envelope.error {
            match error.msg {
                Some(message) => bail!("metering cloud error: {message}"),
                None => bail!("metering cloud error (no message)"),
            }
        }
        envelope.data.context("the response carries neither data nor error")
    }
}
