use std::time::Duration;

use crate::shared::logging::{log_processing_poll, log_processing_timeout};

use super::{GenerativeProvider, ProviderError, ProviderFile};
use crate::domain::models::FileState;

/// Fixed-interval, bounded polling of a file's processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 30,
        }
    }
}

/// Poll until the provider reports the file ready.
///
/// Returns `ProcessingFailed` as soon as the provider reports `FAILED`, and
/// `ProcessingTimeout` when the file is still not ready after
/// `max_attempts` status checks.
pub async fn wait_until_active(
    provider: &dyn GenerativeProvider,
    file: ProviderFile,
    policy: PollPolicy,
) -> Result<ProviderFile, ProviderError> {
    let mut current = file;
    let mut attempt = 0;

    loop {
        match current.state {
            FileState::Active => return Ok(current),
            FileState::Failed => return Err(ProviderError::ProcessingFailed(current.name)),
            FileState::Processing | FileState::StateUnspecified => {}
        }

        if attempt >= policy.max_attempts {
            log_processing_timeout(&current.name, attempt);
            return Err(ProviderError::ProcessingTimeout { attempts: attempt });
        }

        attempt += 1;
        tokio::time::sleep(policy.interval).await;
        current = provider.get_file(&current.name).await?;
        log_processing_poll(&current.name, attempt, &format!("{:?}", current.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::provider::scripted::ScriptedProvider;

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    fn processing_file() -> ProviderFile {
        ScriptedProvider::file("files/abc", FileState::Processing)
    }

    #[tokio::test]
    async fn test_ready_file_needs_no_poll() {
        let provider = ScriptedProvider::new();
        let file = ScriptedProvider::file("files/abc", FileState::Active);
        let ready = wait_until_active(&provider, file, fast(3)).await.unwrap();
        assert_eq!(ready.name, "files/abc");
        assert_eq!(provider.poll_count(), 0);
    }

    #[tokio::test]
    async fn test_becomes_active_after_polls() {
        let provider = ScriptedProvider::new()
            .with_poll_states(vec![FileState::Processing, FileState::Active]);
        let ready = wait_until_active(&provider, processing_file(), fast(5))
            .await
            .unwrap();
        assert!(ready.state.is_ready());
        assert_eq!(provider.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_times_out_when_stuck_processing() {
        let provider = ScriptedProvider::new().with_poll_states(vec![FileState::Processing]);
        let error = wait_until_active(&provider, processing_file(), fast(3))
            .await
            .unwrap_err();
        assert_eq!(error, ProviderError::ProcessingTimeout { attempts: 3 });
        assert_eq!(provider.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_state_stops_polling() {
        let provider = ScriptedProvider::new().with_poll_states(vec![FileState::Failed]);
        let error = wait_until_active(&provider, processing_file(), fast(10))
            .await
            .unwrap_err();
        assert_eq!(error, ProviderError::ProcessingFailed("files/abc".to_string()));
        assert_eq!(provider.poll_count(), 1);
    }
}
