use std::time::Duration;

use time::OffsetDateTime;
use uuid::Uuid;

pub mod assets;
pub mod version;

/// Short unique id such as `toast-1f0c…`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Time since `then`, clamped to zero when the clock moved backwards.
pub fn elapsed_since(then: OffsetDateTime) -> Duration {
    let elapsed = OffsetDateTime::now_utc() - then;
    if elapsed.is_negative() {
        Duration::ZERO
    } else {
        elapsed.unsigned_abs()
    }
}

/// Compact age such as `45s`, `12m`, `3h` or `2d`.
pub fn humanize_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Sleep without blocking the UI thread on either target.
pub async fn delay(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(duration).await;
    }
}
