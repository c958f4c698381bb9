// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification dispatch
//!
//! Lifecycle notices are fire-and-forget: they are sent on a spawned task and
//! failures are logged, never returned to the caller and never retried.

use isched_adapters::{Notice, NotifyAdapter, NotifyError};

#[derive(Clone, Debug)]
pub(crate) struct NoticeDispatcher<N> {
    notifier: N,
}

impl<N: NotifyAdapter> NoticeDispatcher<N> {
    pub(crate) fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Send in the background
    pub(crate) fn dispatch(&self, notice: Notice) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(
                    kind = notice.kind.name(),
                    installation = %notice.installation.id,
                    error = %e,
                    "no runtime to deliver notice, dropped"
                );
                return;
            }
        };

        let notifier = self.notifier.clone();
        handle.spawn(async move {
            if let Err(e) = notifier.send(&notice).await {
                tracing::warn!(
                    kind = notice.kind.name(),
                    installation = %notice.installation.id,
                    error = %e,
                    "notification failed"
                );
            }
        });
    }

    /// Send and wait for the outcome
    pub(crate) async fn deliver(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.notifier.send(notice).await
    }
}
