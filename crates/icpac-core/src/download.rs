//! HTTP download session handed to the GeoNode adapter.

use reqwest::Client;

use crate::config::DownloadConfig;
use crate::AppError;

/// A download session scoped to one scraper run.
///
/// The session owns the configured [`reqwest::Client`]; adapters borrow it
/// for the duration of the run. Dropping the session ends it, whichever
/// way the run finished.
///
/// # Examples
///
/// ```no_run
/// use icpac_core::config::DownloadConfig;
/// use icpac_core::download::Download;
///
/// # fn example() -> Result<(), icpac_core::AppError> {
/// let downloader = Download::new(DownloadConfig::default())?;
/// assert!(downloader.verify_ssl());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Download {
    client: Client,
    config: DownloadConfig,
}

impl Download {
    /// Opens a download session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(config: DownloadConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        tracing::debug!(
            user_agent = %config.user_agent,
            verify_ssl = config.verify_ssl,
            "Opened download session"
        );

        Ok(Self { client, config })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn verify_ssl(&self) -> bool {
        self.config.verify_ssl
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }
}

impl Drop for Download {
    fn drop(&mut self) {
        tracing::debug!("Closed download session");
    }
}
