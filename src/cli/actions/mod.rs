mod run;

use crate::{alert::SmtpConfig, check::CheckRequest, tls::TlsConfig};

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Check {
        request: CheckRequest,
        tls: TlsConfig,
        smtp: SmtpConfig,
        json: bool,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate check fails
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
