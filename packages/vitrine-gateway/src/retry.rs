use std::{future::Future, time::Duration};

const MAX_BACKOFF_MS: u64 = 30_000;

/// Capped doubling: base, 2x, 4x, ... up to 30s.
pub fn backoff_for_attempt(attempt: u32, base_ms: u64) -> Duration {
	let exp = attempt.max(1).saturating_sub(1).min(6);
	let capped = base_ms.saturating_mul(1 << exp).min(MAX_BACKOFF_MS);

	Duration::from_millis(capped)
}

/// Runs `op` up to `max_attempts` times, sleeping a capped exponential
/// backoff between attempts. The last error is returned once the budget is
/// spent; the caller decides whether the operation is ever tried again.
pub async fn with_backoff<T, E, F, Fut>(max_attempts: u32, base_ms: u64, mut op: F) -> Result<T, E>
where
	F: FnMut(u32) -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: std::fmt::Display,
{
	let max_attempts = max_attempts.max(1);
	let mut attempt = 1;

	loop {
		match op(attempt).await {
			Ok(value) => return Ok(value),
			Err(err) => {
				if attempt >= max_attempts {
					return Err(err);
				}

				tracing::warn!(attempt, error = %err, "Attempt failed. Backing off.");
				tokio::time::sleep(backoff_for_attempt(attempt, base_ms)).await;

				attempt += 1;
			},
		}
	}
}
