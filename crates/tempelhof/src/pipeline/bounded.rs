//! Bounded execution of extraction strategies.
//!
//! OCR and malformed-PDF parsing can run arbitrarily long on pathological
//! input, so every strategy invocation is raced against a per-invocation
//! wall-clock deadline. Each concurrent request carries its own timer; no
//! global alarm-style state is shared between invocations.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::types::ExtractionOutcome;

/// Run exactly one extraction strategy under a hard deadline.
///
/// If the strategy does not complete in time the call returns
/// [`ExtractionOutcome::TimedOut`] and the in-flight work is abandoned: a
/// strategy parked on the blocking thread pool may run to completion in the
/// background, but it can no longer block the caller.
pub async fn run_bounded<F>(deadline: Duration, strategy: F) -> ExtractionOutcome
where
    F: Future<Output = Result<String>>,
{
    match tokio::time::timeout(deadline, strategy).await {
        Ok(Ok(text)) => ExtractionOutcome::Completed(text),
        Ok(Err(error)) => ExtractionOutcome::Failed(error),
        Err(_elapsed) => {
            tracing::warn!("Extraction strategy exceeded {:?} deadline, abandoning", deadline);
            ExtractionOutcome::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TempelhofError;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fast_strategy_completes() {
        let outcome = run_bounded(Duration::from_secs(1), async { Ok("done".to_string()) }).await;
        assert!(matches!(outcome, ExtractionOutcome::Completed(text) if text == "done"));
    }

    #[tokio::test]
    async fn test_slow_strategy_times_out_within_bound() {
        let deadline = Duration::from_millis(100);
        let started = Instant::now();

        let outcome = run_bounded(deadline, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("never".to_string())
        })
        .await;

        assert!(matches!(outcome, ExtractionOutcome::TimedOut));
        // The call must return promptly after the deadline, not after the
        // strategy's own runtime.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_failing_strategy_reports_failure() {
        let outcome = run_bounded(Duration::from_secs(1), async {
            Err(TempelhofError::parsing("corrupt input"))
        })
        .await;

        match outcome {
            ExtractionOutcome::Failed(TempelhofError::Parsing { message, .. }) => {
                assert_eq!(message, "corrupt input");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blocking_strategy_is_abandoned_not_awaited() {
        let deadline = Duration::from_millis(100);
        let started = Instant::now();

        let outcome = run_bounded(deadline, async {
            tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(3));
                Ok("late".to_string())
            })
            .await
            .map_err(|e| TempelhofError::Other(e.to_string()))?
        })
        .await;

        assert!(matches!(outcome, ExtractionOutcome::TimedOut));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_concurrent_invocations_have_independent_deadlines() {
        let slow = run_bounded(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok("slow".to_string())
        });
        let fast = run_bounded(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("fast".to_string())
        });

        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert!(matches!(slow_outcome, ExtractionOutcome::TimedOut));
        assert!(matches!(fast_outcome, ExtractionOutcome::Completed(text) if text == "fast"));
    }
}
