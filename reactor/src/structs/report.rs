use crate::errors::{Error, Result};

use std::fmt::{self, Display};

/// Tally of how every reaction task of one dispatch ended.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub message_id: String,
    pub succeeded: usize,
    pub rate_limited: usize,
    pub remote_errors: usize,
    pub transport_errors: usize,
    /// Tasks that died before reporting back
    pub lost: usize,
}

impl DispatchReport {
    pub fn new(message_id: impl Into<String>) -> DispatchReport {
        DispatchReport {
            message_id: message_id.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &Result<()>) {
        match outcome {
            Ok(()) => self.succeeded += 1,
            Err(Error::RateLimited(_)) => self.rate_limited += 1,
            Err(Error::UnknownRemote(_)) => self.remote_errors += 1,
            // url errors can only come from building the request, count them with transport
            Err(Error::Transport(_) | Error::Url(_) | Error::Config(_)) => {
                self.transport_errors += 1
            }
        }
    }

    pub fn record_lost(&mut self) {
        self.lost += 1;
    }

    pub const fn failed(&self) -> usize {
        self.rate_limited + self.remote_errors + self.transport_errors + self.lost
    }

    pub const fn total(&self) -> usize {
        self.succeeded + self.failed()
    }
}

impl Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message {}: {}/{} reactions applied ({} rate limited, {} remote errors, {} transport errors, {} lost)",
            self.message_id,
            self.succeeded,
            self.total(),
            self.rate_limited,
            self.remote_errors,
            self.transport_errors,
            self.lost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_record_categories() {
        let mut report = DispatchReport::new("M1");
        report.record(&Ok(()));
        report.record(&Ok(()));
        report.record(&Err(Error::RateLimited(Duration::from_secs(1))));
        report.record(&Err(Error::UnknownRemote(403)));
        report.record(&Err(Error::Transport("connection reset".into())));

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.rate_limited, 1);
        assert_eq!(report.remote_errors, 1);
        assert_eq!(report.transport_errors, 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.total(), 5);

        report.record_lost();
        assert_eq!(report.lost, 1);
        assert_eq!(report.failed(), 4);
        assert_eq!(report.total(), 6);
    }

    #[test]
    fn test_display() {
        let mut report = DispatchReport::new("M1");
        report.record(&Ok(()));
        assert_eq!(
            report.to_string(),
            "message M1: 1/1 reactions applied (0 rate limited, 0 remote errors, 0 transport errors, 0 lost)"
        );
    }
}
