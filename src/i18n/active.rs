//! The locale active for the current task.
//!
//! Link generation without an explicit locale falls back to this value, and
//! then to the configured default locale. The value is scoped to a task (or a
//! synchronous closure), so it follows a request across `.await` points and
//! worker threads.

use std::future::Future;

tokio::task_local! {
    static ACTIVE_LOCALE: Option<String>;
}

/// Run `future` with `locale` active. `None` clears any outer value.
pub async fn with_active_locale<F>(locale: Option<String>, future: F) -> F::Output
where
    F: Future,
{
    ACTIVE_LOCALE.scope(locale, future).await
}

/// Run `f` with `locale` active, for synchronous callers.
pub fn sync_with_active_locale<R>(locale: Option<String>, f: impl FnOnce() -> R) -> R {
    ACTIVE_LOCALE.sync_scope(locale, f)
}

/// The locale active in the current scope, if any.
pub fn active_locale() -> Option<String> {
    ACTIVE_LOCALE.try_with(Clone::clone).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_no_scope_is_none() {
        assert_eq!(active_locale(), None);
    }

    #[test]
    fn test_sync_scope_nests_and_restores() {
        sync_with_active_locale(Some("es".to_string()), || {
            assert_eq!(active_locale().as_deref(), Some("es"));
            sync_with_active_locale(None, || assert_eq!(active_locale(), None));
            sync_with_active_locale(Some("pt-PT".to_string()), || {
                assert_eq!(active_locale().as_deref(), Some("pt-PT"));
            });
            assert_eq!(active_locale().as_deref(), Some("es"));
        });
        assert_eq!(active_locale(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_locale_survives_await_across_workers() {
        let handles: Vec<_> = (0..200)
            .map(|i| {
                let locale = if i % 2 == 0 { "es" } else { "pt-PT" };
                tokio::spawn(with_active_locale(Some(locale.to_string()), async move {
                    tokio::task::yield_now().await;
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    active_locale().as_deref() == Some(locale)
                }))
            })
            .collect();

        for handle in handles {
            assert!(handle.await.expect("task panicked"));
        }
        assert_eq!(active_locale(), None);
    }
}
