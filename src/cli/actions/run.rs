use super::Action;
use crate::{
    alert::{Alerter, SmtpAlerter},
    check::{self, CheckReport, CheckRequest},
    tls::{CertificateSource, Clock, SystemClock, TlsProbe},
};
use std::io::Write;

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> anyhow::Result<()> {
    match action {
        Action::Check {
            request,
            tls,
            smtp,
            json,
        } => {
            let probe = TlsProbe::new(tls);
            let alerter = SmtpAlerter::new(smtp);

            check_and_report(
                &probe,
                &alerter,
                &SystemClock,
                &request,
                json,
                &mut std::io::stdout(),
            )
            .await
        }
    }
}

/// Run one check and, when `json` is set, write the report as a single line
async fn check_and_report<S, A, C, W>(
    source: &S,
    alerter: &A,
    clock: &C,
    request: &CheckRequest,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: CertificateSource + ?Sized,
    A: Alerter + ?Sized,
    C: Clock,
    W: Write,
{
    let outcome = check::run(source, alerter, clock, request).await?;

    if json {
        let report = CheckReport::new(request, &outcome, clock.now());
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    }

    Ok(())
}
