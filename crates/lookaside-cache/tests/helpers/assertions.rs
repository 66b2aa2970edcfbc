//! Polling assertions for asynchronous effects.

use std::future::Future;
use std::time::Duration;

/// Espera hasta que la condicion sea verdadera o expire el timeout.
/// Retorna `true` si la condicion se cumplio dentro del plazo.
pub async fn wait_until<F, Fut>(mut condition: F, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Plazo por defecto para efectos asincronos (write-back, shutdown).
pub fn effect_timeout() -> Duration {
    Duration::from_millis(500)
}
