//! HTTP translation providers.

mod google;
mod libretranslate;

use std::time::Duration;

use colore_core::error::ProviderError;

pub use google::{GOOGLE_ENDPOINT, GOOGLE_TIMEOUT, GoogleTranslate};
pub use libretranslate::{LIBRETRANSLATE_INSTANCES, LIBRETRANSLATE_TIMEOUT, LibreTranslate};

fn client_with_timeout(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn send_error(error: &reqwest::Error, timeout: Duration) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

fn status_error(response: &reqwest::Response) -> Option<ProviderError> {
    let status = response.status();
    (!status.is_success()).then(|| ProviderError::RequestFailed(format!("HTTP {status}")))
}
