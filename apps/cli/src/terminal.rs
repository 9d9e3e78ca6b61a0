use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use shared_utils::platform::{Navigator, Notifier, Page, Toast, ToastKind};

/// Reports page changes on stdout. Delayed changes run on the runtime and
/// are awaited by `settle` before the process exits.
#[derive(Default)]
pub struct TerminalNavigator {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn settle(&self) {
        let pending = std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in pending {
            if let Err(err) = handle.await {
                debug!("Redirect task ended early: {}", err);
            }
        }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, page: Page, delay: Duration) {
        let Ok(runtime) = Handle::try_current() else {
            println!("→ {}", page);
            return;
        };

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            println!("→ {}", page);
        });
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }
}

/// Prints toasts to stderr, one line each.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        let marker = match toast.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
            ToastKind::Info => "i",
        };
        eprintln!("[{}] {}: {}", marker, toast.title, toast.message);
    }
}
